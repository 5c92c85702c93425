//! Wasmtime host that runs guest modules with the clock imports linked.
//!
//! # Usage
//!
//! ```ignore
//! let mut host = ClockHost::new(ClockConfig::default())?;
//! host.load_module(&std::fs::read("guest.wat")?)?;
//! let results = host.call_entry("main")?;
//! ```

use crate::wasm_imports::{register_clock_functions, ClockHostState};
use anyhow::{anyhow, bail, Context, Result};
use clock_common::config::ClockConfig;
use tracing::{debug, info};
use wasmtime::{Config, Engine, Instance, Linker, Module, OptLevel, Store};

pub use wasmtime::Val;

/// Runs a single guest instance against the clock bindings.
pub struct ClockHost {
    engine: Engine,
    linker: Linker<ClockHostState>,
    store: Store<ClockHostState>,
    instance: Option<Instance>,
}

impl std::fmt::Debug for ClockHost {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClockHost")
            .field("module_loaded", &self.instance.is_some())
            .field("state", self.store.data())
            .finish()
    }
}

impl ClockHost {
    /// Create a host whose guests sleep under `config`.
    pub fn new(config: ClockConfig) -> Result<Self> {
        let mut wasm_config = Config::new();
        wasm_config.cranelift_opt_level(OptLevel::Speed);

        let engine = Engine::new(&wasm_config).context("Failed to create Wasmtime engine")?;
        let mut linker = Linker::new(&engine);
        register_clock_functions(&mut linker).context("Failed to register clock imports")?;
        let store = Store::new(&engine, ClockHostState::new(config));

        Ok(Self {
            engine,
            linker,
            store,
            instance: None,
        })
    }

    /// Compile and instantiate a module given as Wasm binary or WAT text.
    pub fn load_module(&mut self, source: &[u8]) -> Result<()> {
        let bytes = wat::parse_bytes(source).context("Failed to parse module")?;
        let module = Module::new(&self.engine, &bytes).context("Failed to compile module")?;

        let imports: Vec<String> = module
            .imports()
            .map(|i| format!("{}.{}", i.module(), i.name()))
            .collect();
        debug!(?imports, "Module imports");

        let instance = self
            .linker
            .instantiate(&mut self.store, &module)
            .context("Failed to instantiate module")?;
        self.instance = Some(instance);

        info!(size = bytes.len(), "Guest module loaded");
        Ok(())
    }

    /// Call an exported function that takes no parameters, returning its results.
    pub fn call_entry(&mut self, name: &str) -> Result<Vec<Val>> {
        let instance = self
            .instance
            .ok_or_else(|| anyhow!("no module loaded"))?;
        let func = instance
            .get_func(&mut self.store, name)
            .ok_or_else(|| anyhow!("module has no exported function `{name}`"))?;

        let ty = func.ty(&self.store);
        if ty.params().next().is_some() {
            bail!("entry function `{name}` must take no parameters");
        }

        let mut results = vec![Val::I32(0); ty.results().len()];
        func.call(&mut self.store, &[], &mut results)
            .with_context(|| format!("Guest trapped in `{name}`"))?;
        debug!(name, results = results.len(), "Entry function returned");
        Ok(results)
    }

    /// Host state, including call counters.
    pub fn state(&self) -> &ClockHostState {
        self.store.data()
    }
}
