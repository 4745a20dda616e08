pub mod error;
pub mod handler;
pub mod message;
pub mod messenger;
pub mod registrar;
pub mod report;
pub mod runtime;

#[cfg(feature = "test-utils")]
pub mod test_util;

pub use error::PlatformError;
pub use handler::{handler_fn, same_handler, MessageHandler, MessageHandlerRef};
pub use message::{MessageOrigin, Payload, ReplyCallback};
pub use messenger::{BinaryMessenger, PlatformMessageHandler, PlatformTransport};
pub use registrar::{Plugin, Registrar};
pub use report::{ErrorReport, ErrorReporter, TracingErrorReporter};
