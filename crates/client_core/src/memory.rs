//! In-process channel: records outbound events and delivers inbound ones on demand.

use std::sync::{
    atomic::{AtomicBool, Ordering},
    Mutex, PoisonError,
};

use serde_json::Value;
use shared::protocol::Frame;
use tracing::{debug, warn};

use crate::channel::{Channel, Handler, Subscriptions};

pub struct MemoryChannel {
    topic: String,
    connected: AtomicBool,
    sent: Mutex<Vec<Frame>>,
    subscriptions: Subscriptions,
}

impl MemoryChannel {
    pub fn new(topic: impl Into<String>) -> Self {
        Self {
            topic: topic.into(),
            connected: AtomicBool::new(true),
            sent: Mutex::new(Vec::new()),
            subscriptions: Subscriptions::default(),
        }
    }

    pub fn set_connected(&self, connected: bool) {
        self.connected.store(connected, Ordering::SeqCst);
    }

    pub fn is_connected(&self) -> bool {
        self.connected.load(Ordering::SeqCst)
    }

    /// Outbound frames in send order.
    pub fn sent(&self) -> Vec<Frame> {
        self.sent
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn take_sent(&self) -> Vec<Frame> {
        std::mem::take(&mut *self.sent.lock().unwrap_or_else(PoisonError::into_inner))
    }

    pub fn sent_event_names(&self) -> Vec<String> {
        self.sent().into_iter().map(|frame| frame.event).collect()
    }

    /// Delivers one inbound event. Dropped while disconnected.
    pub fn deliver(&self, event: &str, payload: Value) -> usize {
        if !self.is_connected() {
            debug!(topic = %self.topic, event, "channel disconnected; inbound event lost");
            return 0;
        }
        self.subscriptions.dispatch(event, &payload)
    }

    pub fn deliver_frame(&self, frame: Frame) -> usize {
        if frame.topic != self.topic {
            warn!(
                expected = %self.topic,
                actual = %frame.topic,
                event = %frame.event,
                "dropping frame for another topic"
            );
            return 0;
        }
        self.deliver(&frame.event, frame.payload)
    }
}

impl Channel for MemoryChannel {
    fn topic(&self) -> &str {
        &self.topic
    }

    fn send(&self, event: &str, payload: Value) {
        if !self.is_connected() {
            debug!(topic = %self.topic, event, "channel disconnected; dropping outbound event");
            return;
        }
        self.sent
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(Frame::new(self.topic.as_str(), event, payload));
    }

    fn subscribe(&self, event: &str, handler: Handler) {
        self.subscriptions.add(event, handler);
    }
}
