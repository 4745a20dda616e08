use std::{
    collections::VecDeque,
    sync::{
        Arc, Mutex,
        atomic::{AtomicUsize, Ordering},
    },
};

use crate::{
    message::{MessageOrigin, Payload, ReplyCallback},
    messenger::{PlatformMessageHandler, PlatformTransport},
    report::{ErrorReport, ErrorReporter},
};

/// Reporter that keeps every report so tests can assert on them.
#[derive(Clone, Default)]
pub struct RecordingErrorReporter {
    reports: Arc<Mutex<Vec<(MessageOrigin, String)>>>,
}

impl RecordingErrorReporter {
    pub fn new() -> Self {
        Self::default()
    }

    /// `(origin, error message)` pairs in report order.
    pub fn reports(&self) -> Vec<(MessageOrigin, String)> {
        self.reports.lock().unwrap().clone()
    }

    pub fn count(&self) -> usize {
        self.reports.lock().unwrap().len()
    }
}

impl ErrorReporter for RecordingErrorReporter {
    fn report(&self, report: ErrorReport) {
        self.reports
            .lock()
            .unwrap()
            .push((report.origin, format!("{:#}", report.error)));
    }
}

/// Transport that records outbound traffic and lets the test decide when,
/// and whether, the framework answers.
#[derive(Clone, Default)]
pub struct RecordingTransport {
    sent: Arc<Mutex<Vec<(String, Payload)>>>,
    pending: Arc<Mutex<VecDeque<ReplyCallback>>>,
    installed: Arc<Mutex<Option<Arc<dyn PlatformMessageHandler>>>>,
    installs: Arc<AtomicUsize>,
}

impl RecordingTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every `(channel, payload)` pushed to the framework so far.
    pub fn sent(&self) -> Vec<(String, Payload)> {
        self.sent.lock().unwrap().clone()
    }

    /// Number of replies still waiting for the framework.
    pub fn pending(&self) -> usize {
        self.pending.lock().unwrap().len()
    }

    /// Answers the oldest pending send. Returns false when nothing is pending.
    pub fn complete_next(&self, reply: Payload) -> bool {
        let next = self.pending.lock().unwrap().pop_front();
        match next {
            Some(callback) => {
                callback(reply);
                true
            }
            None => false,
        }
    }

    /// Drops every pending reply callback without firing it.
    pub fn drop_pending(&self) {
        self.pending.lock().unwrap().clear();
    }

    /// The most recently installed inbound handler.
    pub fn installed(&self) -> Option<Arc<dyn PlatformMessageHandler>> {
        self.installed.lock().unwrap().clone()
    }

    pub fn install_count(&self) -> usize {
        self.installs.load(Ordering::SeqCst)
    }
}

impl PlatformTransport for RecordingTransport {
    fn install_message_handler(&self, handler: Arc<dyn PlatformMessageHandler>) {
        *self.installed.lock().unwrap() = Some(handler);
        self.installs.fetch_add(1, Ordering::SeqCst);
    }

    fn push_to_framework(&self, channel: &str, payload: Payload, reply: ReplyCallback) {
        self.sent.lock().unwrap().push((channel.to_string(), payload));
        self.pending.lock().unwrap().push_back(reply);
    }
}
