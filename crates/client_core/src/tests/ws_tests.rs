use std::{collections::HashMap, sync::Arc, time::Duration};

use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        Query, State,
    },
    response::IntoResponse,
    routing::get,
    Router,
};
use serde_json::json;
use shared::{
    domain::{ButtonId, DisplayState},
    protocol::{ControllerEvent, Frame},
};
use tokio::{net::TcpListener, sync::mpsc, time::timeout};

use crate::{Channel, ConnectionStatus, WatchSession, WsChannel};

const TOPIC: &str = "watch:test";

#[derive(Clone)]
struct ScriptState {
    script: Arc<Vec<String>>,
    close_immediately: bool,
    received: mpsc::UnboundedSender<(Option<String>, String)>,
}

async fn ws_handler(
    ws: WebSocketUpgrade,
    State(state): State<ScriptState>,
    Query(query): Query<HashMap<String, String>>,
) -> impl IntoResponse {
    let topic = query.get("topic").cloned();
    ws.on_upgrade(move |socket| scripted_session(state, socket, topic))
}

/// Replies to every inbound text message with the whole script.
async fn scripted_session(state: ScriptState, mut socket: WebSocket, topic: Option<String>) {
    if state.close_immediately {
        let _ = socket.send(Message::Close(None)).await;
        return;
    }
    while let Some(Ok(message)) = socket.recv().await {
        if let Message::Text(text) = message {
            let _ = state.received.send((topic.clone(), text));
            for frame in state.script.iter() {
                if socket.send(Message::Text(frame.clone())).await.is_err() {
                    return;
                }
            }
        }
    }
}

async fn spawn_server(
    script: Vec<String>,
    close_immediately: bool,
) -> (String, mpsc::UnboundedReceiver<(Option<String>, String)>) {
    let (received, received_rx) = mpsc::unbounded_channel();
    let state = ScriptState {
        script: Arc::new(script),
        close_immediately,
        received,
    };
    let app = Router::new()
        .route("/ws", get(ws_handler))
        .with_state(state);
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("addr");
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });
    (format!("http://{addr}"), received_rx)
}

fn controller_frame(topic: &str, event: ControllerEvent) -> String {
    Frame::controller(topic, &event).encode().expect("encode")
}

#[test]
fn socket_url_maps_http_schemes() {
    let url = WsChannel::socket_url("http://127.0.0.1:4000/", TOPIC).expect("url");
    assert_eq!(url.as_str(), "ws://127.0.0.1:4000/ws?topic=watch%3Atest");

    let url = WsChannel::socket_url("https://watch.example", "lobby").expect("url");
    assert_eq!(url.as_str(), "wss://watch.example/ws?topic=lobby");

    let url = WsChannel::socket_url("ws://localhost:9", "lobby").expect("url");
    assert_eq!(url.as_str(), "ws://localhost:9/ws?topic=lobby");

    assert!(WsChannel::socket_url("ftp://watch.example", "lobby").is_err());
}

#[tokio::test]
async fn reconciles_frames_pushed_over_websocket() {
    let script = vec![
        controller_frame(
            TOPIC,
            ControllerEvent::SetTimeDisplay {
                time: "07:45:12".into(),
            },
        ),
        controller_frame(
            TOPIC,
            ControllerEvent::SetDateDisplay {
                date: "12/JAN/24".into(),
            },
        ),
        controller_frame(
            "watch:other",
            ControllerEvent::SetTimeDisplay {
                time: "99:99:99".into(),
            },
        ),
        "not json".to_string(),
        Frame::new(TOPIC, "setTimeDisplay", json!({})).encode().expect("encode"),
        Frame::new(TOPIC, "foo", json!({ "bar": true })).encode().expect("encode"),
        controller_frame(TOPIC, ControllerEvent::SetIndiglo),
    ];
    let (server_url, mut received) = spawn_server(script, false).await;

    let channel = Arc::new(WsChannel::connect(&server_url, TOPIC).await.expect("connect"));
    let mut session = WatchSession::join(channel.clone());
    let mut watcher = session.watch();

    let (x, y) = session
        .emitter()
        .layout()
        .region(ButtonId::TopLeft)
        .expect("region")
        .center();
    session.emitter().pointer_down(1, x, y).expect("pressed");

    let (topic, text) = timeout(Duration::from_secs(5), received.recv())
        .await
        .expect("server receive timeout")
        .expect("server receive");
    assert_eq!(topic.as_deref(), Some(TOPIC));
    let frame = Frame::decode(&text).expect("frame");
    assert_eq!(frame.topic, TOPIC);
    assert_eq!(frame.event, "top-left-pressed");
    assert_eq!(frame.payload, json!({}));

    timeout(Duration::from_secs(5), watcher.wait_for(|state| state.backlight_on))
        .await
        .expect("state timeout")
        .expect("watch");

    assert_eq!(
        session.state(),
        DisplayState {
            time: "07:45:12".to_string(),
            date: "12/JAN/24".to_string(),
            backlight_on: true,
        }
    );
    assert_eq!(channel.status(), ConnectionStatus::Connected);
}

#[tokio::test]
async fn send_after_server_close_is_a_no_op() {
    let (server_url, _received) = spawn_server(Vec::new(), true).await;

    let channel = Arc::new(WsChannel::connect(&server_url, TOPIC).await.expect("connect"));
    let session = WatchSession::join(channel.clone());
    let mut status = channel.watch_status();

    timeout(
        Duration::from_secs(5),
        status.wait_for(|status| *status == ConnectionStatus::Disconnected),
    )
    .await
    .expect("disconnect timeout")
    .expect("status");

    channel.send("top-left-pressed", json!({}));
    assert_eq!(session.state(), DisplayState::default());
}
