use std::sync::Arc;

use async_trait::async_trait;

use crate::{
    error::PlatformError,
    handler::MessageHandlerRef,
    message::{Payload, ReplyCallback},
};

/// Channel-keyed, bidirectional messenger seen by plugin code.
///
/// Inbound messages (framework → plugin) are routed to the handler registered
/// for their channel; outbound messages (plugin → framework) are forwarded to
/// the transport.
#[async_trait]
pub trait BinaryMessenger: Send + Sync {
    /// Registers `handler` for `channel`, replacing any previous one.
    /// `None` removes the registration.
    fn set_handler(
        &self,
        channel: &str,
        handler: Option<MessageHandlerRef>,
    ) -> Result<(), PlatformError>;

    /// Whether `handler` is the exact handler currently registered for `channel`.
    fn has_handler(&self, channel: &str, handler: &MessageHandlerRef) -> bool;

    /// Runs the handler for `channel` and resolves with its reply.
    ///
    /// Never fails: unregistered channels and failing handlers both resolve
    /// with `None`.
    async fn dispatch_inbound(&self, channel: &str, payload: Payload) -> Payload;

    /// Sends `payload` to the framework on `channel` and waits for the reply.
    async fn send(&self, channel: &str, payload: Payload) -> Result<Payload, PlatformError>;

    /// Always fails with [`PlatformError::MockHandlersUnsupported`].
    fn set_mock_handler(
        &self,
        channel: &str,
        handler: Option<MessageHandlerRef>,
    ) -> Result<(), PlatformError>;

    /// Always fails with [`PlatformError::MockHandlersUnsupported`].
    fn has_mock_handler(
        &self,
        channel: &str,
        handler: Option<&MessageHandlerRef>,
    ) -> Result<bool, PlatformError>;
}

/// The entry point a transport calls for every platform message it does not
/// handle itself.
pub trait PlatformMessageHandler: Send + Sync {
    /// Must invoke `reply` exactly once, possibly after the call returns.
    fn on_platform_message(&self, channel: String, payload: Payload, reply: ReplyCallback);
}

/// The host side of the boundary.
pub trait PlatformTransport: Send + Sync {
    /// Makes `handler` the process-wide receiver of inbound platform messages.
    /// A later call replaces the earlier one.
    fn install_message_handler(&self, handler: Arc<dyn PlatformMessageHandler>);

    /// Hands a plugin-originated message to the framework. `reply` is fired
    /// once the framework answers.
    fn push_to_framework(&self, channel: &str, payload: Payload, reply: ReplyCallback);
}
