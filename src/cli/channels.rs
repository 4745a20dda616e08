use std::sync::Arc;

use clap::Args;
use platform_channel::TracingErrorReporter;
use plugin_bridge::{
    ChannelRouter, PluginRegistry, plugins::builtin_plugins, transport::InMemoryTransport,
};

#[derive(Args, Debug)]
pub struct ChannelsArgs {}

pub async fn execute(_args: ChannelsArgs) -> anyhow::Result<()> {
    for plugin in builtin_plugins() {
        // one scratch router per plugin shows exactly what that plugin registers
        let router = ChannelRouter::new(
            Arc::new(InMemoryTransport::new()),
            Arc::new(TracingErrorReporter),
        );
        PluginRegistry::new(router.clone()).register_plugin(plugin.as_ref())?;
        println!("{}: {}", plugin.key(), router.channels().join(", "));
    }
    Ok(())
}
