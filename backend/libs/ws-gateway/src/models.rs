use serde::{Deserialize, Serialize};

/// Result of one delivery attempt
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeliveryOutcome {
    pub connection_id: String,
    pub success: bool,
    pub error: Option<String>,
}

impl DeliveryOutcome {
    pub fn delivered(connection_id: &str) -> Self {
        Self {
            connection_id: connection_id.to_string(),
            success: true,
            error: None,
        }
    }

    pub fn failed(connection_id: &str, error: String) -> Self {
        Self {
            connection_id: connection_id.to_string(),
            success: false,
            error: Some(error),
        }
    }
}

/// Result of a fan-out send; `results` follows the input order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MulticastOutcome {
    pub success_count: usize,
    pub failure_count: usize,
    pub results: Vec<DeliveryOutcome>,
}

impl MulticastOutcome {
    pub fn from_results(results: Vec<DeliveryOutcome>) -> Self {
        let success_count = results.iter().filter(|r| r.success).count();
        Self {
            success_count,
            failure_count: results.len() - success_count,
            results,
        }
    }

    /// Connection IDs whose delivery failed
    pub fn failed_connections(&self) -> Vec<&str> {
        self.results
            .iter()
            .filter(|r| !r.success)
            .map(|r| r.connection_id.as_str())
            .collect()
    }
}
