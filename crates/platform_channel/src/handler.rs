use std::{future::Future, sync::Arc};

use async_trait::async_trait;

use crate::message::Payload;

/// Processes the inbound payloads of one channel.
///
/// Returning `Err` (or panicking) never reaches the sender: the router reports
/// the failure and replies with an empty payload instead.
#[async_trait]
pub trait MessageHandler: Send + Sync {
    async fn handle(&self, payload: Payload) -> anyhow::Result<Payload>;
}

/// Shared handle to a registered handler. Registration identity is the
/// identity of this allocation.
pub type MessageHandlerRef = Arc<dyn MessageHandler>;

/// True when both handles point at the same handler allocation.
///
/// Only the data pointer is compared, vtables of the same type can differ
/// between codegen units.
pub fn same_handler(a: &MessageHandlerRef, b: &MessageHandlerRef) -> bool {
    std::ptr::addr_eq(Arc::as_ptr(a), Arc::as_ptr(b))
}

/// Adapter that turns an async closure into a [`MessageHandler`].
pub struct FnHandler<F> {
    f: F,
}

#[async_trait]
impl<F, Fut> MessageHandler for FnHandler<F>
where
    F: Fn(Payload) -> Fut + Send + Sync,
    Fut: Future<Output = anyhow::Result<Payload>> + Send,
{
    async fn handle(&self, payload: Payload) -> anyhow::Result<Payload> {
        (self.f)(payload).await
    }
}

/// Wraps `f` into a ready-to-register handler.
///
/// ```ignore
/// let pong = handler_fn(|_payload| async { Ok(Some(b"pong".to_vec())) });
/// router.set_handler("ping", Some(pong))?;
/// ```
pub fn handler_fn<F, Fut>(f: F) -> MessageHandlerRef
where
    F: Fn(Payload) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = anyhow::Result<Payload>> + Send + 'static,
{
    Arc::new(FnHandler { f })
}
