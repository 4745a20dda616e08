use platform_channel::{Payload, Plugin, Registrar, handler_fn};

pub const CHANNEL: &str = "plugin_bridge/echo";

/// Replies with whatever it receives.
pub struct EchoPlugin;

impl Plugin for EchoPlugin {
    fn key(&self) -> &str {
        "echo"
    }

    fn register_with(&self, registrar: &Registrar) -> anyhow::Result<()> {
        registrar.set_handler(CHANNEL, Some(handler_fn(|payload: Payload| async move { Ok(payload) })))?;
        Ok(())
    }
}
