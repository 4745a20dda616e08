use std::sync::Arc;

use anyhow::Result;
use platform_channel::{ErrorReporter, Plugin, PlatformTransport};
use tracing::info;

use crate::{registry::PluginRegistry, router::ChannelRouter};

/// Process startup: one router, one registry, plugins registered, router
/// installed into the transport.
pub struct App {
    registry: PluginRegistry,
}

impl App {
    pub fn bootstrap(
        transport: Arc<dyn PlatformTransport>,
        reporter: Arc<dyn ErrorReporter>,
        plugins: &[Box<dyn Plugin>],
    ) -> Result<Self> {
        let router = ChannelRouter::new(transport, reporter);
        let registry = PluginRegistry::new(router);

        registry.register_plugins(plugins)?;
        registry.register_message_handler();

        info!(
            plugins = registry.plugins().len(),
            channels = registry.router().channels().len(),
            "plugin bridge ready"
        );
        Ok(Self { registry })
    }

    pub fn registry(&self) -> &PluginRegistry {
        &self.registry
    }

    pub fn router(&self) -> &ChannelRouter {
        self.registry.router()
    }
}
