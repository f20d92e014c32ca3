use std::sync::Arc;

use shared::domain::DisplayState;
use tokio::sync::watch;
use tracing::info;

use crate::{
    channel::Channel,
    emitter::{ButtonEdgeEmitter, ButtonLayout},
    reconciler::Reconciler,
};

/// One client session on one topic.
///
/// Owns the session's only [`Reconciler`]; nothing is kept once the session
/// is dropped.
pub struct WatchSession {
    channel: Arc<dyn Channel>,
    reconciler: Arc<Reconciler>,
    emitter: ButtonEdgeEmitter,
}

impl WatchSession {
    pub fn join(channel: Arc<dyn Channel>) -> Self {
        Self::join_with_layout(channel, ButtonLayout::default())
    }

    pub fn join_with_layout(channel: Arc<dyn Channel>, layout: ButtonLayout) -> Self {
        let reconciler = Reconciler::new();
        reconciler.attach(channel.as_ref());
        channel.listen();
        info!(topic = channel.topic(), "watch session joined");

        let emitter = ButtonEdgeEmitter::with_layout(Arc::clone(&channel), layout);
        Self {
            channel,
            reconciler,
            emitter,
        }
    }

    pub fn topic(&self) -> &str {
        self.channel.topic()
    }

    pub fn state(&self) -> DisplayState {
        self.reconciler.snapshot()
    }

    pub fn watch(&self) -> watch::Receiver<DisplayState> {
        self.reconciler.watch()
    }

    pub fn emitter(&mut self) -> &mut ButtonEdgeEmitter {
        &mut self.emitter
    }
}

#[cfg(test)]
#[path = "tests/session_tests.rs"]
mod tests;
