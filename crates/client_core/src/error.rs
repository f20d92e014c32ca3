use thiserror::Error;

#[derive(Debug, Error)]
pub enum ChannelError {
    #[error("server_url must start with http://, https://, ws:// or wss://, got {0:?}")]
    UnsupportedScheme(String),
    #[error("invalid server url: {0}")]
    InvalidUrl(#[from] url::ParseError),
    #[error("server url {0:?} cannot carry a path")]
    CannotBeABase(String),
    #[error("failed to connect websocket: {0}")]
    Connect(#[from] tokio_tungstenite::tungstenite::Error),
}
