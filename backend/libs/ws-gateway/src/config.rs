use serde::{Deserialize, Serialize};

use crate::errors::GatewayError;

/// API Gateway Management API configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GatewayConfig {
    /// Connection management endpoint, e.g.
    /// `https://{api-id}.execute-api.{region}.amazonaws.com/{stage}`
    pub endpoint: String,
    /// AWS region; falls back to the default provider chain when unset
    pub region: Option<String>,
    /// Log swallowed delivery failures
    pub dev: bool,
}

impl GatewayConfig {
    /// Create new gateway configuration
    pub fn new(endpoint: String) -> Self {
        Self {
            endpoint,
            region: None,
            dev: false,
        }
    }

    /// Set AWS region
    pub fn with_region(mut self, region: String) -> Self {
        self.region = Some(region);
        self
    }

    /// Enable or disable diagnostic logging
    pub fn with_dev(mut self, dev: bool) -> Self {
        self.dev = dev;
        self
    }

    /// Load gateway configuration from environment variables
    ///
    /// - `WS_GATEWAY_ENDPOINT` (required)
    /// - `AWS_REGION` (optional)
    /// - `WS_GATEWAY_DEV` (optional, `true`/`1`/`yes`)
    pub fn from_env() -> Result<Self, GatewayError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup<F>(lookup: F) -> Result<Self, GatewayError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let endpoint = lookup("WS_GATEWAY_ENDPOINT")
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .ok_or_else(|| GatewayError::Config("WS_GATEWAY_ENDPOINT is not set".to_string()))?;

        let region = lookup("AWS_REGION").filter(|v| !v.trim().is_empty());

        let dev = lookup("WS_GATEWAY_DEV")
            .map(|v| parse_flag(&v))
            .unwrap_or(false);

        Ok(Self {
            endpoint,
            region,
            dev,
        })
    }
}

fn parse_flag(value: &str) -> bool {
    matches!(
        value.trim().to_ascii_lowercase().as_str(),
        "true" | "1" | "yes"
    )
}
