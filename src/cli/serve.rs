use std::sync::Arc;

use clap::Args;
use plugin_bridge::{App, plugins::builtin_plugins, transport::StdioTransport};
use platform_channel::TracingErrorReporter;
use tracing::info;

#[derive(Args, Debug)]
pub struct ServeArgs {}

pub async fn execute(_args: ServeArgs) -> anyhow::Result<()> {
    let transport = StdioTransport::new(tokio::io::stdout());
    let plugins = builtin_plugins();
    let _app = App::bootstrap(
        Arc::new(transport.clone()),
        Arc::new(TracingErrorReporter),
        &plugins,
    )?;

    info!("serving platform messages on stdin/stdout");
    transport.run(tokio::io::stdin()).await?;
    info!("stdin closed, shutting down");
    Ok(())
}
