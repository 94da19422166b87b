//! Structured records the request logger emits.

use std::net::IpAddr;

use serde::{Deserialize, Serialize};

/// What the logger needs to know about an incoming request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestInfo {
    /// Request path.
    pub path: String,
    /// HTTP method.
    pub method: String,
    /// `User-Agent` header.
    pub user_agent: Option<String>,
    /// Client address.
    pub ip: Option<IpAddr>,
    /// `Referer` header.
    pub referrer: Option<String>,
    /// Session identifier, when the site keeps one.
    pub session_id: Option<String>,
}

impl RequestInfo {
    /// Request with only a method and path.
    pub fn new(method: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            method: method.into(),
            path: path.into(),
            ..Self::default()
        }
    }
}

/// One page view.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageView {
    /// Unix milliseconds.
    pub timestamp: u64,
    /// Request path.
    pub path: String,
    /// HTTP method.
    pub method: String,
    /// `User-Agent` header.
    pub user_agent: Option<String>,
    /// Client address, anonymized when configured.
    pub ip: Option<String>,
    /// `Referer` header or `"direct"`.
    pub referrer: String,
    /// Session identifier.
    pub session_id: Option<String>,
}

/// An error raised while serving a request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorReport {
    /// Unix milliseconds.
    pub timestamp: u64,
    /// Error message.
    pub error: String,
    /// Source chain, outermost first.
    pub stack: Vec<String>,
    /// Request path, when a request was in flight.
    pub path: Option<String>,
    /// HTTP method.
    pub method: Option<String>,
    /// `User-Agent` header.
    pub user_agent: Option<String>,
    /// Client address, anonymized when configured.
    pub ip: Option<String>,
}

/// Timing of a served request or a completed page sequence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PerformanceMetric {
    /// Unix milliseconds.
    pub timestamp: u64,
    /// Request path, or `animation/<sequence>` for page sequences.
    pub path: String,
    /// HTTP method (`"-"` for page sequences).
    pub method: String,
    /// Elapsed milliseconds.
    pub response_time: f64,
    /// HTTP status.
    pub status_code: Option<u16>,
    /// Response body length in bytes.
    pub content_length: Option<u64>,
}
