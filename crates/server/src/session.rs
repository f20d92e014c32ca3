use std::sync::Arc;

use axum::extract::ws::{Message, WebSocket};
use chrono::{Local, NaiveDateTime};
use futures::{SinkExt, StreamExt};
use shared::protocol::{ControllerEvent, Frame};
use tokio::{
    sync::mpsc::{self, error::TrySendError},
    time::MissedTickBehavior,
};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::{
    app_state::AppState,
    controller::{EdgeTracker, EdgeVerdict, WatchController},
};

/// Events queued for a face that is not reading before new ones are dropped.
pub(crate) const OUTBOUND_CAPACITY: usize = 64;

fn local_now() -> NaiveDateTime {
    Local::now().naive_local()
}

/// Handles one text message from the face and returns the display events
/// to push back. Nothing in here ends the session.
pub(crate) fn handle_inbound(
    text: &str,
    topic: &str,
    edges: &mut EdgeTracker,
    controller: &mut dyn WatchController,
) -> Vec<ControllerEvent> {
    let frame = match Frame::decode_for_topic(text, topic) {
        Ok(frame) => frame,
        Err(error) => {
            warn!(%error, code = ?error.code(), "ignoring inbound frame");
            return Vec::new();
        }
    };
    let event = match frame.button_event() {
        Ok(event) => event,
        Err(error) => {
            warn!(%error, "ignoring unknown client event");
            return Vec::new();
        }
    };

    match edges.observe(event) {
        EdgeVerdict::Accepted => {
            debug!(event = event.event_name(), "button edge");
            controller.on_button(event)
        }
        EdgeVerdict::Duplicate => {
            warn!(
                event = event.event_name(),
                held = edges.is_held(event.button),
                "out-of-order button edge; treating as no-op"
            );
            Vec::new()
        }
    }
}

pub(crate) async fn run_session(state: Arc<AppState>, socket: WebSocket, topic: String) {
    let session_id = Uuid::new_v4();
    info!(%session_id, %topic, "watch session joined");

    let (mut sender, mut receiver) = socket.split();
    let (outbound, mut outbound_rx) = mpsc::channel::<ControllerEvent>(OUTBOUND_CAPACITY);

    let frame_topic = topic.clone();
    let send_task = tokio::spawn(async move {
        while let Some(event) = outbound_rx.recv().await {
            let text = match Frame::controller(frame_topic.as_str(), &event).encode() {
                Ok(text) => text,
                Err(error) => {
                    warn!(%error, event = event.name(), "dropping unencodable event");
                    continue;
                }
            };
            if sender.send(Message::Text(text)).await.is_err() {
                break;
            }
        }
    });

    let mut controller = (state.new_controller)();
    let mut edges = EdgeTracker::default();
    push(&outbound, controller.on_join(local_now()));

    let mut ticker = tokio::time::interval(state.settings.tick_interval());
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
    ticker.tick().await;

    loop {
        tokio::select! {
            _ = ticker.tick() => push(&outbound, controller.on_tick(local_now())),
            message = receiver.next() => match message {
                Some(Ok(Message::Text(text))) => push(
                    &outbound,
                    handle_inbound(&text, &topic, &mut edges, controller.as_mut()),
                ),
                Some(Ok(Message::Close(_))) | None => break,
                Some(Ok(_)) => {}
                Some(Err(error)) => {
                    warn!(%session_id, %error, "websocket receive failed");
                    break;
                }
            },
        }
    }

    drop(outbound);
    let _ = send_task.await;
    info!(%session_id, %topic, "watch session closed");
}

/// Queues events without waiting on the socket. A full queue drops the
/// event; a closed one drops the rest.
fn push(outbound: &mpsc::Sender<ControllerEvent>, events: Vec<ControllerEvent>) {
    for event in events {
        match outbound.try_send(event) {
            Ok(()) => {}
            Err(TrySendError::Full(event)) => {
                warn!(event = event.name(), "outbound queue full; dropping event");
            }
            Err(TrySendError::Closed(_)) => return,
        }
    }
}

#[cfg(test)]
#[path = "tests/session_tests.rs"]
mod tests;
