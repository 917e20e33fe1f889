/// Errors that can occur in the transport layer.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    /// Binding the listening socket failed.
    #[error("bind to {addr} failed: {source}")]
    BindFailed {
        addr: String,
        #[source]
        source: std::io::Error,
    },

    /// Accepting a connection failed.
    #[error("accept failed: {0}")]
    AcceptFailed(#[source] std::io::Error),

    /// Sending data failed.
    #[error("send failed: {0}")]
    SendFailed(#[source] std::io::Error),

    /// Receiving data failed.
    #[error("receive failed: {0}")]
    ReceiveFailed(#[source] std::io::Error),

    /// The peer sent a line that is not UTF-8. The line has been consumed
    /// and the connection is still usable.
    #[error("line is not valid UTF-8")]
    InvalidUtf8,

    /// The peer sent a line longer than the transport accepts.
    #[error("line exceeds {limit} bytes")]
    LineTooLong { limit: usize },

    /// A WebSocket handshake or frame error.
    #[cfg(feature = "websocket")]
    #[error("websocket error: {0}")]
    WebSocket(#[from] tokio_tungstenite::tungstenite::Error),
}

impl TransportError {
    /// Whether the connection can keep receiving after this error.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Self::InvalidUtf8)
    }
}
