//! JSON-lines host transport.
//!
//! Each line is one [`Frame`]. The peer sends `request` frames for platform
//! messages and gets `reply` frames back with the same id; plugin messages go
//! the other way round. Ids are chosen by whoever sends the request.
//!
//! ```text
//! → {"id":1,"kind":"request","channel":"ping","payload":"hello"}
//! ← {"id":1,"kind":"reply","channel":"ping","payload":"pong"}
//! ```

use std::{
    collections::HashMap,
    sync::{
        Arc, Mutex, RwLock,
        atomic::{AtomicU64, Ordering},
    },
};

use anyhow::Result;
use platform_channel::{
    Payload, PlatformError, PlatformMessageHandler, PlatformTransport, ReplyCallback,
    runtime::spawn_detached,
};
use serde::{Deserialize, Serialize};
use tokio::{
    io::{AsyncBufReadExt, AsyncRead, AsyncWrite, AsyncWriteExt, BufReader, BufWriter},
    sync::{mpsc, oneshot},
    task::JoinSet,
};
use tracing::{debug, error, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FrameKind {
    Request,
    Reply,
}

/// One line on the wire. Payloads travel as UTF-8 text; `null` is the empty payload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Frame {
    pub id: u64,
    pub kind: FrameKind,
    #[serde(default)]
    pub channel: String,
    #[serde(default)]
    pub payload: Option<String>,
}

impl Frame {
    pub fn request(id: u64, channel: &str, payload: &Payload) -> Self {
        Self {
            id,
            kind: FrameKind::Request,
            channel: channel.to_string(),
            payload: payload_to_text(payload),
        }
    }

    pub fn reply(id: u64, channel: &str, payload: &Payload) -> Self {
        Self {
            id,
            kind: FrameKind::Reply,
            channel: channel.to_string(),
            payload: payload_to_text(payload),
        }
    }

    pub fn payload_bytes(&self) -> Payload {
        self.payload.as_ref().map(|text| text.as_bytes().to_vec())
    }
}

fn payload_to_text(payload: &Payload) -> Option<String> {
    payload
        .as_ref()
        .map(|bytes| String::from_utf8_lossy(bytes).into_owned())
}

enum Outgoing {
    Line(String),
    Flush(oneshot::Sender<()>),
}

/// Host transport speaking [`Frame`]s over an async reader/writer pair.
#[derive(Clone)]
pub struct StdioTransport {
    outgoing: mpsc::UnboundedSender<Outgoing>,
    installed: Arc<RwLock<Option<Arc<dyn PlatformMessageHandler>>>>,
    inflight: Arc<Mutex<HashMap<u64, ReplyCallback>>>,
    next_id: Arc<AtomicU64>,
}

impl StdioTransport {
    /// Creates the transport and starts the writer task on `writer`.
    pub fn new<W>(writer: W) -> Self
    where
        W: AsyncWrite + Unpin + Send + 'static,
    {
        let (tx, mut rx) = mpsc::unbounded_channel::<Outgoing>();
        spawn_detached(async move {
            let mut w = BufWriter::new(writer);
            while let Some(item) = rx.recv().await {
                match item {
                    Outgoing::Line(line) => {
                        if let Err(e) = w.write_all(line.as_bytes()).await {
                            error!("stdio transport write error: {e}");
                            break;
                        }
                        if let Err(e) = w.flush().await {
                            error!("stdio transport flush error: {e}");
                            break;
                        }
                    }
                    Outgoing::Flush(done) => {
                        let _ = w.flush().await;
                        let _ = done.send(());
                    }
                }
            }
        });

        Self {
            outgoing: tx,
            installed: Arc::new(RwLock::new(None)),
            inflight: Arc::new(Mutex::new(HashMap::new())),
            next_id: Arc::new(AtomicU64::new(1)),
        }
    }

    /// Reads frames from `reader` until it closes.
    ///
    /// On return every inbound request has been answered, every pending
    /// outbound send has been completed (with an empty reply if the peer never
    /// answered) and all written frames are flushed. A read error ends the loop
    /// like end of input and is returned after that cleanup.
    pub async fn run<R>(&self, reader: R) -> Result<()>
    where
        R: AsyncRead + Unpin,
    {
        let mut reader = BufReader::new(reader);
        let mut buf = Vec::new();
        let mut inbound = JoinSet::new();
        let mut read_error = None;

        loop {
            buf.clear();
            match reader.read_until(b'\n', &mut buf).await {
                Ok(0) => break,
                Ok(_) => {}
                Err(e) => {
                    error!("stdio transport read error: {e}");
                    read_error = Some(PlatformError::from(e));
                    break;
                }
            }
            while inbound.try_join_next().is_some() {}

            let line = match std::str::from_utf8(&buf) {
                Ok(line) => line.trim(),
                Err(e) => {
                    warn!("skipping frame that is not UTF-8: {e}");
                    continue;
                }
            };
            if line.is_empty() {
                continue;
            }
            let frame = match serde_json::from_str::<Frame>(line) {
                Ok(frame) => frame,
                Err(e) => {
                    warn!("skipping malformed frame: {e}");
                    continue;
                }
            };

            match frame.kind {
                FrameKind::Request => {
                    let reply = self.accept_request(&frame);
                    let outgoing = self.outgoing.clone();
                    inbound.spawn(async move {
                        let payload = reply.await.unwrap_or(None);
                        let reply = Frame::reply(frame.id, &frame.channel, &payload);
                        send_frame(&outgoing, &reply);
                    });
                }
                FrameKind::Reply => self.complete(frame),
            }
        }

        while inbound.join_next().await.is_some() {}
        self.fail_pending();
        self.flush().await;
        match read_error {
            Some(err) => Err(err.into()),
            None => Ok(()),
        }
    }

    /// Waits until everything queued so far has been written.
    pub async fn flush(&self) {
        let (tx, rx) = oneshot::channel();
        if self.outgoing.send(Outgoing::Flush(tx)).is_ok() {
            let _ = rx.await;
        }
    }

    /// Hands an inbound request to the installed handler and returns the
    /// receiver its reply will arrive on.
    fn accept_request(&self, frame: &Frame) -> oneshot::Receiver<Payload> {
        let (tx, rx) = oneshot::channel();
        let handler = self
            .installed
            .read()
            .ok()
            .and_then(|installed| installed.clone());

        match handler {
            Some(handler) => handler.on_platform_message(
                frame.channel.clone(),
                frame.payload_bytes(),
                Box::new(move |reply| {
                    let _ = tx.send(reply);
                }),
            ),
            None => {
                debug!(channel = %frame.channel, "no platform message handler installed");
                let _ = tx.send(None);
            }
        }
        rx
    }

    fn complete(&self, frame: Frame) {
        let callback = self
            .inflight
            .lock()
            .ok()
            .and_then(|mut inflight| inflight.remove(&frame.id));
        match callback {
            Some(callback) => callback(frame.payload_bytes()),
            None => warn!(id = frame.id, "reply for unknown request"),
        }
    }

    fn fail_pending(&self) {
        let pending: Vec<(u64, ReplyCallback)> = match self.inflight.lock() {
            Ok(mut inflight) => inflight.drain().collect(),
            Err(_) => return,
        };
        for (id, callback) in pending {
            debug!(id, "peer closed before replying");
            callback(None);
        }
    }
}

fn send_frame(outgoing: &mpsc::UnboundedSender<Outgoing>, frame: &Frame) {
    match serde_json::to_string(frame) {
        Ok(json) => {
            let _ = outgoing.send(Outgoing::Line(format!("{json}\n")));
        }
        Err(e) => error!("failed to encode frame: {e}"),
    }
}

impl PlatformTransport for StdioTransport {
    fn install_message_handler(&self, handler: Arc<dyn PlatformMessageHandler>) {
        match self.installed.write() {
            Ok(mut installed) => *installed = Some(handler),
            Err(poisoned) => *poisoned.into_inner() = Some(handler),
        }
    }

    fn push_to_framework(&self, channel: &str, payload: Payload, reply: ReplyCallback) {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        match self.inflight.lock() {
            Ok(mut inflight) => {
                inflight.insert(id, reply);
            }
            Err(_) => {
                error!(id, "in-flight table poisoned, replying empty");
                reply(None);
                return;
            }
        }
        send_frame(&self.outgoing, &Frame::request(id, channel, &payload));
    }
}
