//! WebSocket push helpers for API Gateway connections
//!
//! Wraps the AWS API Gateway Management API with a small [`Notifier`] facade:
//! - Disconnect a client by connection ID
//! - Push a payload to one connection
//! - Fan a payload out to many connections concurrently
//!
//! Delivery is best effort. Failures are never returned to the caller; when the
//! notifier is built with `dev` enabled they are logged through `tracing`.
//!
//! # Example
//!
//! ```no_run
//! use ws_gateway::{GatewayConfig, Notifier};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = GatewayConfig::new(
//!         "https://abc123.execute-api.us-east-1.amazonaws.com/prod".to_string(),
//!     )
//!     .with_dev(true);
//!     let notifier = Notifier::new(config).await?;
//!
//!     notifier.send_data("L0SM9cOFvHcCIhw=", b"{\"type\":\"ping\"}").await;
//!     notifier
//!         .send_data_to_multiple(&["conn-a".to_string(), "conn-b".to_string()], b"hello")
//!         .await;
//!     notifier.disconnect("L0SM9cOFvHcCIhw=").await;
//!
//!     Ok(())
//! }
//! ```

pub mod client;
pub mod config;
pub mod errors;
pub mod models;
pub mod notifier;

pub use client::{ApiGatewayClient, ConnectionApi, DynConnectionApi};
pub use config::GatewayConfig;
pub use errors::GatewayError;
pub use models::{DeliveryOutcome, MulticastOutcome};
pub use notifier::Notifier;
