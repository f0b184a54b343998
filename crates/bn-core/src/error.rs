/// Failure while moving a request body to the node and reading the reply.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("could not connect to node: {0}")]
    Connect(#[source] Box<dyn std::error::Error + Send + Sync>),

    #[error("request to node timed out")]
    Timeout,

    #[error("node replied with HTTP {status} and no body")]
    Status { status: u16 },

    #[error("transport failure: {0}")]
    Other(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl From<reqwest::Error> for TransportError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout
        } else if err.is_connect() {
            Self::Connect(Box::new(err))
        } else {
            Self::Other(Box::new(err))
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error(transparent)]
    Transport(#[from] TransportError),

    #[error("RPC call cancelled")]
    Cancelled,

    #[error("RPC error {code}: {message}")]
    Rpc { code: i64, message: String },

    #[error("could not decode `{method}` response: {message}")]
    Decode { method: String, message: String },

    #[error("invalid transaction data: {0}")]
    InvalidTxData(String),

    #[error("invalid parameters: {0}")]
    InvalidParams(String),

    #[error("invalid client configuration: {0}")]
    Config(String),
}

impl CoreError {
    pub(crate) fn decode(method: &str, message: impl Into<String>) -> Self {
        Self::Decode {
            method: method.to_owned(),
            message: message.into(),
        }
    }

    /// Returns the node's error code when the node itself rejected the call.
    pub fn rpc_code(&self) -> Option<i64> {
        match self {
            Self::Rpc { code, .. } => Some(*code),
            _ => None,
        }
    }

    /// True for connection-level failures where the request may never have
    /// reached the node, including gateway errors from a proxy in front of
    /// it. Broadcast callers should still check the mempool before resending.
    pub fn is_retryable_transport(&self) -> bool {
        matches!(
            self,
            Self::Transport(
                TransportError::Connect(_)
                    | TransportError::Timeout
                    | TransportError::Status {
                        status: 502 | 503 | 504
                    }
            )
        )
    }
}
