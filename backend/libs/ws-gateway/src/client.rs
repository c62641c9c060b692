use std::sync::Arc;

use aws_config::BehaviorVersion;
use aws_sdk_apigatewaymanagement::config::Region;
use aws_sdk_apigatewaymanagement::error::DisplayErrorContext;
use aws_sdk_apigatewaymanagement::primitives::Blob;
use aws_sdk_apigatewaymanagement::Client;
use tracing::info;

use crate::config::GatewayConfig;
use crate::errors::GatewayError;

/// Remote operations exposed by the connection management service
#[cfg_attr(test, mockall::automock)]
#[async_trait::async_trait]
pub trait ConnectionApi: Send + Sync {
    /// Terminates the session identified by `connection_id`
    async fn delete_connection(&self, connection_id: &str) -> Result<(), GatewayError>;

    /// Delivers `data` unmodified to the session identified by `connection_id`
    async fn post_to_connection(&self, connection_id: &str, data: &[u8])
        -> Result<(), GatewayError>;
}

pub type DynConnectionApi = Arc<dyn ConnectionApi>;

/// API Gateway Management API client
#[derive(Clone, Debug)]
pub struct ApiGatewayClient {
    inner: Client,
    endpoint: String,
}

impl ApiGatewayClient {
    /// Creates a client using the default AWS credential chain
    ///
    /// The endpoint is the stage's connection management URL; the region is
    /// taken from `config.region` when set.
    pub async fn new(config: &GatewayConfig) -> Result<Self, GatewayError> {
        if config.endpoint.trim().is_empty() {
            return Err(GatewayError::Config("endpoint must not be empty".to_string()));
        }

        let mut loader = aws_config::defaults(BehaviorVersion::latest());
        if let Some(region) = &config.region {
            loader = loader.region(Region::new(region.clone()));
        }
        let sdk_config = loader.load().await;

        let client_config = aws_sdk_apigatewaymanagement::config::Builder::from(&sdk_config)
            .endpoint_url(config.endpoint.clone())
            .build();

        info!(
            endpoint = %config.endpoint,
            region = ?sdk_config.region(),
            "Initialized API Gateway Management client"
        );

        Ok(Self {
            inner: Client::from_conf(client_config),
            endpoint: config.endpoint.clone(),
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Underlying SDK client
    pub fn inner(&self) -> &Client {
        &self.inner
    }
}

#[async_trait::async_trait]
impl ConnectionApi for ApiGatewayClient {
    async fn delete_connection(&self, connection_id: &str) -> Result<(), GatewayError> {
        self.inner
            .delete_connection()
            .connection_id(connection_id)
            .send()
            .await
            .map_err(|e| {
                let gone = e
                    .as_service_error()
                    .map(|se| se.is_gone_exception())
                    .unwrap_or(false);
                if gone {
                    GatewayError::Gone(connection_id.to_string())
                } else {
                    GatewayError::DeleteConnection {
                        connection_id: connection_id.to_string(),
                        message: DisplayErrorContext(&e).to_string(),
                    }
                }
            })?;

        Ok(())
    }

    async fn post_to_connection(
        &self,
        connection_id: &str,
        data: &[u8],
    ) -> Result<(), GatewayError> {
        self.inner
            .post_to_connection()
            .connection_id(connection_id)
            .data(Blob::new(data))
            .send()
            .await
            .map_err(|e| {
                let gone = e
                    .as_service_error()
                    .map(|se| se.is_gone_exception())
                    .unwrap_or(false);
                if gone {
                    GatewayError::Gone(connection_id.to_string())
                } else {
                    GatewayError::PostToConnection {
                        connection_id: connection_id.to_string(),
                        message: DisplayErrorContext(&e).to_string(),
                    }
                }
            })?;

        Ok(())
    }
}
