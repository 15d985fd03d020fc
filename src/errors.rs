use thiserror::Error;

/// Application-wide error type - single point of truth
#[derive(Error, Debug)]
pub enum IndexerError {
    /// Malformed caller input (wallet address, signature, cursor)
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Configuration issues
    #[error("Configuration error: {0}")]
    Config(String),

    /// Network-layer failures (transient I/O, rate limits, timeouts)
    #[error("RPC error: {0}")]
    Rpc(#[from] RpcError),

    /// Non-retryable remote failure (malformed response, non-transient status)
    #[error("Upstream error: {0}")]
    Upstream(String),

    /// Data validation/parsing
    #[error("Invalid data: {0}")]
    InvalidData(String),
}

/// RPC error types
#[derive(Error, Debug)]
pub enum RpcError {
    /// Failed to establish connection to the RPC endpoint
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    /// Transient network failure on a single request
    #[error("Network error: {0}")]
    Network(String),

    /// Explicit throttling signal from the endpoint
    #[error("Rate limited: {0}")]
    RateLimited(String),

    /// RPC request timed out
    #[error("Request timeout: {timeout_seconds}s for {operation}")]
    Timeout {
        timeout_seconds: u64,
        operation: String,
    },

    /// Retry limit exceeded for RPC operation
    #[error("Max retries exceeded: {operation}")]
    MaxRetriesExceeded { operation: String },

    /// RPC returned unexpected or malformed response data
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Non-retryable remote failure (4xx other than 429, RPC-level error object)
    #[error("Upstream failure: {method} - {message}")]
    Upstream { method: String, message: String },
}

impl RpcError {
    /// Whether the request layer should retry after this error
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            RpcError::Network(_) | RpcError::RateLimited(_) | RpcError::Timeout { .. }
        )
    }
}

/// Application-wide result type - single point of truth
pub type IndexerResult<T> = Result<T, IndexerError>;

/// Result type for RPC operations
pub type RpcResult<T> = Result<T, RpcError>;

// Additional From implementations for common error types
impl From<serde_json::Error> for IndexerError {
    fn from(err: serde_json::Error) -> Self {
        IndexerError::InvalidData(format!("JSON error: {}", err))
    }
}

impl From<reqwest::Error> for RpcError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            RpcError::Timeout {
                timeout_seconds: 0,
                operation: "http".to_string(),
            }
        } else if err.is_connect() {
            RpcError::ConnectionFailed(err.to_string())
        } else {
            RpcError::Network(err.to_string())
        }
    }
}
