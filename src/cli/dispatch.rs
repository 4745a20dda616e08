use std::sync::Arc;

use clap::Args;
use plugin_bridge::{App, plugins::builtin_plugins, transport::InMemoryTransport};
use platform_channel::{TracingErrorReporter, message::describe_payload};

#[derive(Args, Debug)]
pub struct DispatchArgs {
    /// Channel to deliver the message on
    #[arg(long)]
    pub channel: String,

    /// Message payload as text; omitted means no payload
    #[arg(long)]
    pub payload: Option<String>,
}

pub async fn execute(args: DispatchArgs) -> anyhow::Result<()> {
    let transport = InMemoryTransport::new();
    let plugins = builtin_plugins();
    let _app = App::bootstrap(
        Arc::new(transport.clone()),
        Arc::new(TracingErrorReporter),
        &plugins,
    )?;

    let payload = args.payload.map(String::into_bytes);
    let reply = transport
        .deliver_platform_message(&args.channel, payload)
        .await;
    println!("{}", describe_payload(&reply));
    Ok(())
}
