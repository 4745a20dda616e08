use std::sync::{Arc, RwLock};

use dashmap::DashMap;
use platform_channel::{
    MessageHandlerRef, Payload, PlatformMessageHandler, PlatformTransport, ReplyCallback,
    runtime::spawn_detached,
};
use tokio::sync::oneshot;
use tracing::warn;

/// In-process host: platform messages are delivered by calling
/// [`deliver_platform_message`](Self::deliver_platform_message), and messages
/// pushed to the framework are answered by per-channel framework listeners.
#[derive(Clone, Default)]
pub struct InMemoryTransport {
    installed: Arc<RwLock<Option<Arc<dyn PlatformMessageHandler>>>>,
    framework_listeners: Arc<DashMap<String, MessageHandlerRef>>,
}

impl InMemoryTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Delivers a platform message to whatever handler is installed and
    /// resolves with its reply. Without an installed handler the reply is empty.
    pub async fn deliver_platform_message(&self, channel: &str, payload: Payload) -> Payload {
        let handler = self
            .installed
            .read()
            .ok()
            .and_then(|installed| installed.clone());
        let Some(handler) = handler else {
            return None;
        };

        let (tx, rx) = oneshot::channel();
        handler.on_platform_message(
            channel.to_string(),
            payload,
            Box::new(move |reply| {
                let _ = tx.send(reply);
            }),
        );
        rx.await.unwrap_or(None)
    }

    /// Sets the framework-side receiver for `channel`; `None` removes it.
    pub fn set_framework_listener(&self, channel: &str, listener: Option<MessageHandlerRef>) {
        match listener {
            Some(listener) => {
                self.framework_listeners.insert(channel.to_string(), listener);
            }
            None => {
                self.framework_listeners.remove(channel);
            }
        }
    }
}

impl PlatformTransport for InMemoryTransport {
    fn install_message_handler(&self, handler: Arc<dyn PlatformMessageHandler>) {
        match self.installed.write() {
            Ok(mut installed) => *installed = Some(handler),
            Err(poisoned) => *poisoned.into_inner() = Some(handler),
        }
    }

    fn push_to_framework(&self, channel: &str, payload: Payload, reply: ReplyCallback) {
        let listener = self
            .framework_listeners
            .get(channel)
            .map(|entry| entry.value().clone());
        let channel = channel.to_string();

        spawn_detached(async move {
            let response = match listener {
                Some(listener) => match listener.handle(payload).await {
                    Ok(response) => response,
                    Err(err) => {
                        warn!(%channel, "framework listener failed: {err:#}");
                        None
                    }
                },
                None => None,
            };
            reply(response);
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::router::ChannelRouter;
    use platform_channel::{BinaryMessenger, TracingErrorReporter, handler_fn};

    fn make_router(transport: &InMemoryTransport) -> ChannelRouter {
        ChannelRouter::new(Arc::new(transport.clone()), Arc::new(TracingErrorReporter))
    }

    #[tokio::test]
    async fn nothing_installed_means_empty_reply() {
        let transport = InMemoryTransport::new();
        let reply = transport.deliver_platform_message("ping", Some(b"hi".to_vec())).await;
        assert_eq!(reply, None);
    }

    #[tokio::test]
    async fn delivers_to_installed_router() {
        let transport = InMemoryTransport::new();
        let router = make_router(&transport);
        router
            .set_handler("ping", Some(handler_fn(|_| async { Ok(Some(b"pong".to_vec())) })))
            .unwrap();
        transport.install_message_handler(Arc::new(router));

        let reply = transport.deliver_platform_message("ping", Some(b"hi".to_vec())).await;
        assert_eq!(reply, Some(b"pong".to_vec()));
    }

    #[tokio::test]
    async fn latest_install_wins() {
        let transport = InMemoryTransport::new();

        let first = make_router(&transport);
        first
            .set_handler("who", Some(handler_fn(|_| async { Ok(Some(b"first".to_vec())) })))
            .unwrap();
        let second = make_router(&transport);
        second
            .set_handler("who", Some(handler_fn(|_| async { Ok(Some(b"second".to_vec())) })))
            .unwrap();

        transport.install_message_handler(Arc::new(first));
        transport.install_message_handler(Arc::new(second));

        let reply = transport.deliver_platform_message("who", None).await;
        assert_eq!(reply, Some(b"second".to_vec()));
    }

    #[tokio::test]
    async fn send_reaches_framework_listener() {
        let transport = InMemoryTransport::new();
        let router = make_router(&transport);
        transport.set_framework_listener(
            "lifecycle",
            Some(handler_fn(|payload: Payload| async move {
                Ok(payload.map(|p| [b"ack:".to_vec(), p].concat()))
            })),
        );

        let reply = router.send("lifecycle", Some(b"resumed".to_vec())).await.unwrap();
        assert_eq!(reply, Some(b"ack:resumed".to_vec()));

        let unheard = router.send("nobody", Some(b"x".to_vec())).await.unwrap();
        assert_eq!(unheard, None);
    }
}
