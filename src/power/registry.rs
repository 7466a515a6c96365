//! Backend registry: maps a backend name to its constructor.
//! Built once at startup and passed by reference to whoever resolves backends.

use std::collections::BTreeMap;
use std::sync::Arc;

use anyhow::{anyhow, Context, Result};
use tracing::info;

use super::{CommandBackend, IpmiBackend, PowerBackend};
use crate::config::types::BackendSettings;

pub type BackendFactory = fn(&BackendSettings) -> Result<Arc<dyn PowerBackend>>;

pub struct BackendRegistry {
    factories: BTreeMap<&'static str, BackendFactory>,
}

impl BackendRegistry {
    pub fn empty() -> Self {
        Self {
            factories: BTreeMap::new(),
        }
    }

    /// Registry holding every backend shipped with the agent.
    pub fn builtin() -> Self {
        let mut registry = Self::empty();
        registry.register("ipmi", |settings| Ok(Arc::new(IpmiBackend::new(settings))));
        registry.register("command", |settings| Ok(Arc::new(CommandBackend::new(settings)?)));
        registry
    }

    pub fn register(&mut self, name: &'static str, factory: BackendFactory) {
        self.factories.insert(name, factory);
    }

    pub fn names(&self) -> Vec<&'static str> {
        self.factories.keys().copied().collect()
    }

    pub fn resolve(&self, name: &str, settings: &BackendSettings) -> Result<Arc<dyn PowerBackend>> {
        let factory = self.factories.get(name).ok_or_else(|| {
            anyhow!(
                "Can't find the {:?} backend among the built-in backends (available backends: {})",
                name,
                self.names().join(", ")
            )
        })?;

        let backend = factory(settings).with_context(|| format!("Error during {:?} backend initialization", name))?;
        info!("Using {} backend", backend.name());
        Ok(backend)
    }
}
