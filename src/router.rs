use std::{panic::AssertUnwindSafe, sync::Arc};

use anyhow::anyhow;
use async_trait::async_trait;
use dashmap::DashMap;
use futures::FutureExt;
use platform_channel::{
    BinaryMessenger, ErrorReport, ErrorReporter, MessageHandlerRef, MessageOrigin,
    PlatformError, PlatformMessageHandler, PlatformTransport, Payload, ReplyCallback,
    runtime::spawn_detached, same_handler,
};
use tokio::sync::oneshot;
use tracing::{debug, trace};

/// Routes platform messages to plugin handlers by channel name, and plugin
/// messages back to the framework through the transport.
///
/// Cloning is cheap and every clone shares the same handler table, so one
/// router per process is created at startup and handed to whoever needs it.
#[derive(Clone)]
pub struct ChannelRouter {
    handlers: Arc<DashMap<String, MessageHandlerRef>>,
    transport: Arc<dyn PlatformTransport>,
    reporter: Arc<dyn ErrorReporter>,
}

impl ChannelRouter {
    pub fn new(transport: Arc<dyn PlatformTransport>, reporter: Arc<dyn ErrorReporter>) -> Self {
        Self {
            handlers: Arc::new(DashMap::new()),
            transport,
            reporter,
        }
    }

    pub fn transport(&self) -> Arc<dyn PlatformTransport> {
        self.transport.clone()
    }

    /// Names of all channels that currently have a handler, sorted.
    pub fn channels(&self) -> Vec<String> {
        let mut names: Vec<String> = self.handlers.iter().map(|kv| kv.key().clone()).collect();
        names.sort();
        names
    }

    fn report(&self, error: anyhow::Error, origin: MessageOrigin) {
        self.reporter.report(ErrorReport::new(error, origin));
    }
}

#[async_trait]
impl BinaryMessenger for ChannelRouter {
    fn set_handler(
        &self,
        channel: &str,
        handler: Option<MessageHandlerRef>,
    ) -> Result<(), PlatformError> {
        if channel.is_empty() {
            return Err(PlatformError::EmptyChannelName);
        }
        match handler {
            Some(handler) => {
                debug!(channel, "registering platform message handler");
                self.handlers.insert(channel.to_string(), handler);
            }
            None => {
                debug!(channel, "removing platform message handler");
                self.handlers.remove(channel);
            }
        }
        Ok(())
    }

    fn has_handler(&self, channel: &str, handler: &MessageHandlerRef) -> bool {
        self.handlers
            .get(channel)
            .is_some_and(|current| same_handler(current.value(), handler))
    }

    async fn dispatch_inbound(&self, channel: &str, payload: Payload) -> Payload {
        // clone the handle out so the shard lock is not held across the await
        let handler = match self.handlers.get(channel) {
            Some(entry) => entry.value().clone(),
            None => return None,
        };

        let outcome = AssertUnwindSafe(async move { handler.handle(payload).await })
            .catch_unwind()
            .await;

        match outcome {
            Ok(Ok(reply)) => reply,
            Ok(Err(err)) => {
                self.report(
                    err.context(format!("handler for channel `{channel}` failed")),
                    MessageOrigin::FrameworkToPlugin,
                );
                None
            }
            Err(panic) => {
                self.report(
                    anyhow!(
                        "handler for channel `{channel}` panicked: {}",
                        panic_message(panic.as_ref())
                    ),
                    MessageOrigin::FrameworkToPlugin,
                );
                None
            }
        }
    }

    async fn send(&self, channel: &str, payload: Payload) -> Result<Payload, PlatformError> {
        let (tx, rx) = oneshot::channel::<Payload>();
        let reporter = self.reporter.clone();
        let reply_channel = channel.to_string();

        let reply: ReplyCallback = Box::new(move |reply| {
            if tx.send(reply).is_err() {
                reporter.report(ErrorReport::new(
                    anyhow!("could not complete pending send on channel `{reply_channel}`: the sender stopped waiting"),
                    MessageOrigin::PluginToFramework,
                ));
            }
        });

        trace!(channel, "forwarding plugin message to the framework");
        self.transport.push_to_framework(channel, payload, reply);

        rx.await
            .map_err(|_| PlatformError::ReplyDropped(channel.to_string()))
    }

    fn set_mock_handler(
        &self,
        _channel: &str,
        _handler: Option<MessageHandlerRef>,
    ) -> Result<(), PlatformError> {
        Err(PlatformError::MockHandlersUnsupported)
    }

    fn has_mock_handler(
        &self,
        _channel: &str,
        _handler: Option<&MessageHandlerRef>,
    ) -> Result<bool, PlatformError> {
        Err(PlatformError::MockHandlersUnsupported)
    }
}

impl PlatformMessageHandler for ChannelRouter {
    fn on_platform_message(&self, channel: String, payload: Payload, reply: ReplyCallback) {
        let router = self.clone();
        spawn_detached(async move {
            let response = router.dispatch_inbound(&channel, payload).await;
            reply(response);
        });
    }
}

/// Best-effort text of a panic payload.
fn panic_message(panic: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = panic.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = panic.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic payload".to_string()
    }
}
