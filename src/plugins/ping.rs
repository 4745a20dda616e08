use platform_channel::{Plugin, Registrar, handler_fn};

pub const CHANNEL: &str = "ping";

/// Answers `pong` to anything sent on `ping`.
pub struct PingPlugin;

impl Plugin for PingPlugin {
    fn key(&self) -> &str {
        "ping"
    }

    fn register_with(&self, registrar: &Registrar) -> anyhow::Result<()> {
        registrar.set_handler(CHANNEL, Some(handler_fn(|_| async { Ok(Some(b"pong".to_vec())) })))?;
        Ok(())
    }
}
