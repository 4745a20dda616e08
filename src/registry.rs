use std::sync::{Arc, Mutex};

use anyhow::{Context, Result};
use platform_channel::{BinaryMessenger, Plugin, Registrar};
use tracing::{info, warn};

use crate::router::ChannelRouter;

/// Hands out registrars onto the one shared router and wires the router into
/// the host transport.
#[derive(Clone)]
pub struct PluginRegistry {
    router: ChannelRouter,
    plugins: Arc<Mutex<Vec<String>>>,
}

impl PluginRegistry {
    pub fn new(router: ChannelRouter) -> Self {
        Self {
            router,
            plugins: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn router(&self) -> &ChannelRouter {
        &self.router
    }

    /// Returns a registrar for `plugin_key`.
    ///
    /// The key only labels the registrar: every plugin gets the same router
    /// and therefore shares one channel namespace.
    pub fn registrar_for(&self, plugin_key: &str) -> Registrar {
        let messenger: Arc<dyn BinaryMessenger> = Arc::new(self.router.clone());
        Registrar::new(plugin_key, messenger)
    }

    /// Installs the router as the transport's receiver for platform messages.
    ///
    /// Calling it again simply re-installs; only the latest installation is live.
    pub fn register_message_handler(&self) {
        info!("installing plugin router as platform message handler");
        self.router
            .transport()
            .install_message_handler(Arc::new(self.router.clone()));
    }

    /// Lets `plugin` register its channels and records its key.
    pub fn register_plugin(&self, plugin: &dyn Plugin) -> Result<()> {
        let key = plugin.key().to_string();
        let registrar = self.registrar_for(&key);
        plugin
            .register_with(&registrar)
            .with_context(|| format!("plugin `{key}` failed to register"))?;

        let mut plugins = self
            .plugins
            .lock()
            .map_err(|_| anyhow::anyhow!("plugin list lock poisoned"))?;
        if plugins.contains(&key) {
            warn!(plugin = %key, "plugin registered more than once");
        } else {
            info!(plugin = %key, "registered plugin");
            plugins.push(key);
        }
        Ok(())
    }

    /// Registers every plugin in order, stopping at the first failure.
    pub fn register_plugins<'a, I>(&self, plugins: I) -> Result<()>
    where
        I: IntoIterator<Item = &'a Box<dyn Plugin>>,
    {
        for plugin in plugins {
            self.register_plugin(plugin.as_ref())?;
        }
        Ok(())
    }

    /// Keys of the registered plugins, in registration order.
    pub fn plugins(&self) -> Vec<String> {
        self.plugins
            .lock()
            .map(|plugins| plugins.clone())
            .unwrap_or_default()
    }
}
