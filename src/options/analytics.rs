use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, JsonSchema)]
#[schemars(title = "Analytics", inline)]
#[serde(default)]
/// Request logger options.
pub struct AnalyticsOptions {
    /// Zero the host part of client addresses before logging.
    #[schemars(title = "Anonymize IP")]
    pub anonymize_ip: bool,
    /// Emit a performance record for each completed card sequence.
    #[schemars(title = "Sequence Metrics")]
    pub sequence_metrics: bool,
}

impl Default for AnalyticsOptions {
    fn default() -> Self {
        Self {
            anonymize_ip: true,
            sequence_metrics: true,
        }
    }
}
