use thiserror::Error;

/// Errors surfaced synchronously to callers of the messenger API.
///
/// Handler failures never show up here: they are reported through an
/// [`ErrorReporter`](crate::report::ErrorReporter) and degrade to an empty reply.
#[derive(Error, Debug)]
pub enum PlatformError {
    /// Mock handlers only make sense on the framework side of the boundary.
    #[error(
        "setting mock handlers is not supported on a platform message handler; \
         use the framework-side binary messenger to mock platform channels in tests"
    )]
    MockHandlersUnsupported,

    /// Channel names are the routing key and must not be empty.
    #[error("channel name must not be empty")]
    EmptyChannelName,

    /// The transport dropped the reply callback of a pending send without firing it.
    #[error("reply for channel `{0}` was dropped before it completed")]
    ReplyDropped(String),

    /// The underlying transport failed.
    #[error("transport error: {0}")]
    Transport(String),
}

impl From<std::io::Error> for PlatformError {
    fn from(err: std::io::Error) -> PlatformError {
        PlatformError::Transport(err.to_string())
    }
}
