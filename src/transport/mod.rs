//! Host transports the router can be installed into.

pub mod in_memory;
pub mod stdio;

pub use in_memory::InMemoryTransport;
pub use stdio::{Frame, FrameKind, StdioTransport};
