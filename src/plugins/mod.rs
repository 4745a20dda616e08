pub mod echo;
pub mod ping;

use echo::EchoPlugin;
use ping::PingPlugin;
use platform_channel::Plugin;

/// Plugins that ship with the binary. New built-ins are added here.
pub fn builtin_plugins() -> Vec<Box<dyn Plugin>> {
    vec![Box::new(EchoPlugin), Box::new(PingPlugin)]
}
