use std::sync::Arc;

use anyhow::{Context, Result};
use futures::future::join_all;
use serde::Serialize;
use tracing::{debug, error};

use crate::client::{ApiGatewayClient, DynConnectionApi};
use crate::config::GatewayConfig;
use crate::errors::GatewayError;
use crate::models::{DeliveryOutcome, MulticastOutcome};

/// Best-effort push facade over the connection management API
///
/// None of the delivery methods return errors. Failures are dropped, and
/// logged at `ERROR` when `dev` is set; a non-dev notifier emits nothing.
#[derive(Clone)]
pub struct Notifier {
    client: DynConnectionApi,
    dev: bool,
}

impl Notifier {
    /// Create a notifier backed by the AWS API Gateway Management API
    pub async fn new(config: GatewayConfig) -> Result<Self> {
        let client = ApiGatewayClient::new(&config)
            .await
            .context("Failed to initialize API Gateway Management client")?;

        Ok(Self::with_client(Arc::new(client), config.dev))
    }

    /// Create a notifier from `WS_GATEWAY_*` environment variables
    pub async fn from_env() -> Result<Self> {
        let config = GatewayConfig::from_env().context("Invalid gateway configuration")?;
        Self::new(config).await
    }

    /// Wrap an existing connection client
    pub fn with_client(client: DynConnectionApi, dev: bool) -> Self {
        Self { client, dev }
    }

    pub fn is_dev(&self) -> bool {
        self.dev
    }

    pub fn client(&self) -> &DynConnectionApi {
        &self.client
    }

    /// Disconnect a connection
    pub async fn disconnect(&self, connection_id: &str) {
        match self.client.delete_connection(connection_id).await {
            Ok(()) => {
                if self.dev {
                    debug!(connection_id = %connection_id, "Connection disconnected");
                }
            }
            Err(e) => self.report("Error disconnecting", connection_id, &e),
        }
    }

    /// Send data to a connection
    pub async fn send_data(&self, connection_id: &str, data: &[u8]) {
        self.deliver(connection_id, data).await;
    }

    /// Send data to every connection concurrently and wait for all attempts
    ///
    /// One connection failing does not stop delivery to the others.
    pub async fn send_data_to_multiple<S>(&self, connection_ids: &[S], data: &[u8])
    where
        S: AsRef<str>,
    {
        if connection_ids.is_empty() {
            return;
        }

        join_all(
            connection_ids
                .iter()
                .map(|connection_id| self.send_data(connection_id.as_ref(), data)),
        )
        .await;
    }

    /// Same fan-out as [`Notifier::send_data_to_multiple`], keeping the
    /// per-connection outcome in input order
    pub async fn send_data_to_multiple_with_results<S>(
        &self,
        connection_ids: &[S],
        data: &[u8],
    ) -> MulticastOutcome
    where
        S: AsRef<str>,
    {
        if connection_ids.is_empty() {
            return MulticastOutcome::default();
        }

        let results = join_all(
            connection_ids
                .iter()
                .map(|connection_id| self.deliver(connection_id.as_ref(), data)),
        )
        .await;

        let outcome = MulticastOutcome::from_results(results);
        if self.dev {
            debug!(
                success_count = outcome.success_count,
                failure_count = outcome.failure_count,
                "Multicast send finished"
            );
        }
        outcome
    }

    /// Serialize `value` as JSON and send it to a connection
    pub async fn send_json<T>(&self, connection_id: &str, value: &T)
    where
        T: Serialize + ?Sized,
    {
        match serde_json::to_vec(value) {
            Ok(data) => self.send_data(connection_id, &data).await,
            Err(e) => self.report("Error sending data", connection_id, &e.into()),
        }
    }

    /// Serialize `value` once and fan it out to every connection
    pub async fn send_json_to_multiple<S, T>(&self, connection_ids: &[S], value: &T)
    where
        S: AsRef<str>,
        T: Serialize + ?Sized,
    {
        match serde_json::to_vec(value) {
            Ok(data) => self.send_data_to_multiple(connection_ids, &data).await,
            Err(e) => {
                if self.dev {
                    let err = GatewayError::from(e);
                    error!(
                        connections = connection_ids.len(),
                        error = %err,
                        "Error sending data to multiple connections"
                    );
                }
            }
        }
    }

    async fn deliver(&self, connection_id: &str, data: &[u8]) -> DeliveryOutcome {
        match self.client.post_to_connection(connection_id, data).await {
            Ok(()) => {
                if self.dev {
                    debug!(
                        connection_id = %connection_id,
                        bytes = data.len(),
                        "Data sent to connection"
                    );
                }
                DeliveryOutcome::delivered(connection_id)
            }
            Err(e) => {
                self.report("Error sending data", connection_id, &e);
                DeliveryOutcome::failed(connection_id, e.to_string())
            }
        }
    }

    fn report(&self, context: &str, connection_id: &str, err: &GatewayError) {
        if self.dev {
            error!(connection_id = %connection_id, error = %err, "{}", context);
        }
    }
}

impl std::fmt::Debug for Notifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Notifier").field("dev", &self.dev).finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::MockConnectionApi;
    use std::collections::HashMap;

    fn post_failed(connection_id: &str) -> GatewayError {
        GatewayError::PostToConnection {
            connection_id: connection_id.to_string(),
            message: "simulated failure".to_string(),
        }
    }

    #[tokio::test]
    async fn test_disconnect_success_and_failure() {
        let mut mock = MockConnectionApi::new();
        mock.expect_delete_connection()
            .withf(|id| id == "alive")
            .times(1)
            .returning(|_| Ok(()));
        mock.expect_delete_connection()
            .withf(|id| id == "gone")
            .times(1)
            .returning(|id| Err(GatewayError::Gone(id.to_string())));

        let notifier = Notifier::with_client(Arc::new(mock), true);
        notifier.disconnect("alive").await;
        notifier.disconnect("gone").await;
    }

    #[tokio::test]
    async fn test_send_data_swallows_failure() {
        let mut mock = MockConnectionApi::new();
        mock.expect_post_to_connection()
            .withf(|id, data| id == "conn-1" && data == b"payload")
            .times(1)
            .returning(|id, _| Err(post_failed(id)));

        let notifier = Notifier::with_client(Arc::new(mock), false);
        notifier.send_data("conn-1", b"payload").await;
    }

    #[tokio::test]
    async fn test_multiple_attempts_every_connection() {
        let mut mock = MockConnectionApi::new();
        mock.expect_post_to_connection()
            .times(3)
            .returning(|id, _| if id == "b" { Err(post_failed(id)) } else { Ok(()) });

        let notifier = Notifier::with_client(Arc::new(mock), false);
        notifier
            .send_data_to_multiple(&["a", "b", "c"], b"hello")
            .await;
    }

    #[tokio::test]
    async fn test_multiple_empty_makes_no_calls() {
        let mock = MockConnectionApi::new();
        let notifier = Notifier::with_client(Arc::new(mock), true);

        let ids: Vec<String> = Vec::new();
        notifier.send_data_to_multiple(&ids, b"hello").await;
        let outcome = notifier.send_data_to_multiple_with_results(&ids, b"hello").await;
        assert_eq!(outcome, MulticastOutcome::default());
    }

    #[tokio::test]
    async fn test_multiple_with_results_keeps_order() {
        let mut mock = MockConnectionApi::new();
        mock.expect_post_to_connection()
            .times(4)
            .returning(|id, _| {
                if id.starts_with("stale") {
                    Err(GatewayError::Gone(id.to_string()))
                } else {
                    Ok(())
                }
            });

        let notifier = Notifier::with_client(Arc::new(mock), false);
        let ids = vec![
            "live-1".to_string(),
            "stale-1".to_string(),
            "live-2".to_string(),
            "stale-2".to_string(),
        ];
        let outcome = notifier
            .send_data_to_multiple_with_results(&ids, b"{}")
            .await;

        assert_eq!(outcome.success_count, 2);
        assert_eq!(outcome.failure_count, 2);
        let order: Vec<&str> = outcome
            .results
            .iter()
            .map(|r| r.connection_id.as_str())
            .collect();
        assert_eq!(order, vec!["live-1", "stale-1", "live-2", "stale-2"]);
        assert_eq!(outcome.failed_connections(), vec!["stale-1", "stale-2"]);
        assert_eq!(
            outcome.results[1].error.as_deref(),
            Some("Connection is gone: stale-1")
        );
    }

    #[tokio::test]
    async fn test_send_json_serializes_payload() {
        let mut mock = MockConnectionApi::new();
        mock.expect_post_to_connection()
            .withf(|id, data| id == "conn-1" && data == br#"{"type":"ping"}"#)
            .times(1)
            .returning(|_, _| Ok(()));

        let notifier = Notifier::with_client(Arc::new(mock), false);
        notifier
            .send_json("conn-1", &serde_json::json!({ "type": "ping" }))
            .await;
    }

    #[tokio::test]
    async fn test_send_json_unserializable_makes_no_calls() {
        let mock = MockConnectionApi::new();
        let notifier = Notifier::with_client(Arc::new(mock), true);

        // JSON object keys must be strings
        let value: HashMap<(u8, u8), u8> = HashMap::from([((1, 2), 3)]);
        notifier.send_json("conn-1", &value).await;
        notifier.send_json_to_multiple(&["a", "b"], &value).await;
    }

    #[test]
    fn test_debug_hides_client() {
        let notifier = Notifier::with_client(Arc::new(MockConnectionApi::new()), true);
        assert!(notifier.is_dev());
        assert_eq!(format!("{:?}", notifier), "Notifier { dev: true }");
    }
}
