pub mod app;
pub mod config;
pub mod logger;
pub mod plugins;
pub mod registry;
pub mod router;
pub mod transport;

pub use app::App;
pub use registry::PluginRegistry;
pub use router::ChannelRouter;
