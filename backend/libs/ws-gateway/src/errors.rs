use thiserror::Error;

/// Failure of a single call against the API Gateway Management API
#[derive(Error, Debug)]
pub enum GatewayError {
    #[error("Connection is gone: {0}")]
    Gone(String),

    #[error("Failed to delete connection {connection_id}: {message}")]
    DeleteConnection {
        connection_id: String,
        message: String,
    },

    #[error("Failed to post to connection {connection_id}: {message}")]
    PostToConnection {
        connection_id: String,
        message: String,
    },

    #[error("Failed to serialize payload: {0}")]
    Serialization(String),

    #[error("Gateway configuration error: {0}")]
    Config(String),
}

impl From<serde_json::Error> for GatewayError {
    fn from(err: serde_json::Error) -> Self {
        GatewayError::Serialization(err.to_string())
    }
}

impl From<GatewayError> for String {
    fn from(err: GatewayError) -> Self {
        err.to_string()
    }
}
