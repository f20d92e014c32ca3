//! WebSocket transport for [`Channel`].

use std::sync::{Arc, Mutex, PoisonError};

use futures::{stream::SplitStream, SinkExt, StreamExt};
use serde_json::Value;
use shared::protocol::Frame;
use tokio::{
    net::TcpStream,
    runtime::Handle,
    sync::{mpsc, watch},
};
use tokio_tungstenite::{connect_async, tungstenite::Message, MaybeTlsStream, WebSocketStream};
use tracing::{debug, info, warn};
use url::Url;

use crate::{
    channel::{Channel, Handler, Subscriptions},
    error::ChannelError,
};

type SocketReader = SplitStream<WebSocketStream<MaybeTlsStream<TcpStream>>>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConnectionStatus {
    Connected,
    Disconnected,
}

pub struct WsChannel {
    topic: String,
    outbound: mpsc::UnboundedSender<Frame>,
    subscriptions: Arc<Subscriptions>,
    status_tx: Arc<watch::Sender<ConnectionStatus>>,
    status: watch::Receiver<ConnectionStatus>,
    pending_reader: Mutex<Option<SocketReader>>,
    runtime: Handle,
}

impl WsChannel {
    /// Builds `<server_url>/ws?topic=<topic>` with a websocket scheme.
    pub fn socket_url(server_url: &str, topic: &str) -> Result<Url, ChannelError> {
        let server_url = server_url.trim_end_matches('/');
        let ws_url = if let Some(rest) = server_url.strip_prefix("https://") {
            format!("wss://{rest}")
        } else if let Some(rest) = server_url.strip_prefix("http://") {
            format!("ws://{rest}")
        } else if server_url.starts_with("ws://") || server_url.starts_with("wss://") {
            server_url.to_string()
        } else {
            return Err(ChannelError::UnsupportedScheme(server_url.to_string()));
        };

        let mut url = Url::parse(&ws_url)?;
        url.path_segments_mut()
            .map_err(|_| ChannelError::CannotBeABase(ws_url.clone()))?
            .pop_if_empty()
            .push("ws");
        url.query_pairs_mut().append_pair("topic", topic);
        Ok(url)
    }

    /// Opens the socket and starts the writer. Inbound frames are held back
    /// until [`Channel::listen`] is called.
    pub async fn connect(server_url: &str, topic: impl Into<String>) -> Result<Self, ChannelError> {
        let topic = topic.into();
        let url = Self::socket_url(server_url, &topic)?;
        let (stream, _) = connect_async(url.as_str()).await?;
        info!(%url, %topic, "websocket channel connected");

        let (mut writer, reader) = stream.split();
        let (outbound, mut outbound_rx) = mpsc::unbounded_channel::<Frame>();
        let (status_tx, status) = watch::channel(ConnectionStatus::Connected);
        let status_tx = Arc::new(status_tx);

        let writer_status = Arc::clone(&status_tx);
        tokio::spawn(async move {
            while let Some(frame) = outbound_rx.recv().await {
                let text = match frame.encode() {
                    Ok(text) => text,
                    Err(error) => {
                        warn!(%error, event = %frame.event, "dropping unencodable frame");
                        continue;
                    }
                };
                if let Err(error) = writer.send(Message::Text(text)).await {
                    warn!(%error, "websocket send failed");
                    break;
                }
            }
            writer_status.send_replace(ConnectionStatus::Disconnected);
            let _ = writer.close().await;
        });

        Ok(Self {
            topic,
            outbound,
            subscriptions: Arc::new(Subscriptions::default()),
            status_tx,
            status,
            pending_reader: Mutex::new(Some(reader)),
            runtime: Handle::current(),
        })
    }

    pub fn status(&self) -> ConnectionStatus {
        *self.status.borrow()
    }

    pub fn watch_status(&self) -> watch::Receiver<ConnectionStatus> {
        self.status.clone()
    }
}

async fn read_frames(
    mut reader: SocketReader,
    topic: String,
    subscriptions: Arc<Subscriptions>,
    status_tx: Arc<watch::Sender<ConnectionStatus>>,
) {
    while let Some(message) = reader.next().await {
        match message {
            Ok(Message::Text(text)) => match Frame::decode_for_topic(&text, &topic) {
                Ok(frame) => {
                    debug!(event = %frame.event, "inbound frame");
                    subscriptions.dispatch(&frame.event, &frame.payload);
                }
                Err(error) => {
                    warn!(%error, code = ?error.code(), "skipping inbound frame");
                }
            },
            Ok(Message::Close(_)) => break,
            Ok(_) => {}
            Err(error) => {
                warn!(%error, "websocket receive failed");
                break;
            }
        }
    }
    info!(%topic, "websocket channel closed");
    status_tx.send_replace(ConnectionStatus::Disconnected);
}

impl Channel for WsChannel {
    fn topic(&self) -> &str {
        &self.topic
    }

    fn send(&self, event: &str, payload: Value) {
        if self.status() == ConnectionStatus::Disconnected {
            debug!(topic = %self.topic, event, "transport unavailable; dropping outbound event");
            return;
        }
        if self
            .outbound
            .send(Frame::new(self.topic.as_str(), event, payload))
            .is_err()
        {
            debug!(topic = %self.topic, event, "writer stopped; dropping outbound event");
        }
    }

    fn subscribe(&self, event: &str, handler: Handler) {
        self.subscriptions.add(event, handler);
    }

    fn listen(&self) {
        let Some(reader) = self
            .pending_reader
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take()
        else {
            return;
        };
        self.runtime.spawn(read_frames(
            reader,
            self.topic.clone(),
            Arc::clone(&self.subscriptions),
            Arc::clone(&self.status_tx),
        ));
    }
}
