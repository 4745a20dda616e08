use std::sync::Arc;

use crate::{
    error::PlatformError,
    handler::MessageHandlerRef,
    messenger::BinaryMessenger,
};

/// Handle given to a plugin so it can register its channels.
///
/// Every registrar wraps the same shared messenger, so channel names, not
/// plugin keys, are the namespace.
#[derive(Clone)]
pub struct Registrar {
    plugin_key: String,
    messenger: Arc<dyn BinaryMessenger>,
}

impl Registrar {
    pub fn new(plugin_key: impl Into<String>, messenger: Arc<dyn BinaryMessenger>) -> Self {
        Self {
            plugin_key: plugin_key.into(),
            messenger,
        }
    }

    /// Key of the plugin this registrar was handed to.
    pub fn plugin_key(&self) -> &str {
        &self.plugin_key
    }

    /// The shared messenger.
    pub fn messenger(&self) -> Arc<dyn BinaryMessenger> {
        self.messenger.clone()
    }

    /// Shorthand for `messenger().set_handler(..)`.
    pub fn set_handler(
        &self,
        channel: &str,
        handler: Option<MessageHandlerRef>,
    ) -> Result<(), PlatformError> {
        self.messenger.set_handler(channel, handler)
    }
}

impl std::fmt::Debug for Registrar {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Registrar")
            .field("plugin_key", &self.plugin_key)
            .finish_non_exhaustive()
    }
}

/// Implemented by every plugin that wants to receive platform messages.
pub trait Plugin: Send + Sync {
    /// Stable key, e.g. the plugin's package name.
    fn key(&self) -> &str;

    /// Registers the plugin's channel handlers through `registrar`.
    fn register_with(&self, registrar: &Registrar) -> anyhow::Result<()>;
}
