//! Shared wire types for the Paddock racing-database admin backend.
//!
//! Every HTTP endpoint — the dynamic execution route and the fixed listing
//! routes — speaks the same JSON envelope, and the console crate deserializes
//! the same shape on the client side. Keeping the envelope here means the
//! server and console crates agree on it by construction.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A single result row: column name → value, shaped entirely by the SQL
/// that produced it.
pub type Row = Map<String, Value>;

/// Outcome discriminant carried in every response envelope.
///
/// `Fail` marks a rejected request (the caller's fault, HTTP 400);
/// `Error` marks an execution failure (HTTP 500).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Success,
    Fail,
    Error,
}

/// The JSON envelope returned by every endpoint.
///
/// Optional fields are omitted from the serialized form when absent, so a
/// failure response is just `{"status":"error","message":"..."}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Envelope {
    pub status: Status,

    /// Row count for reads, rows affected for writes.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub results: Option<u64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Vec<Row>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl Envelope {
    /// A successful envelope carrying rows.
    pub fn success(results: u64, data: Vec<Row>) -> Self {
        Self {
            status: Status::Success,
            results: Some(results),
            data: Some(data),
            message: None,
        }
    }

    /// A rejected-request envelope (HTTP 400).
    pub fn fail(message: impl Into<String>) -> Self {
        Self {
            status: Status::Fail,
            results: None,
            data: None,
            message: Some(message.into()),
        }
    }

    /// An execution-failure envelope (HTTP 500).
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            status: Status::Error,
            results: None,
            data: None,
            message: Some(message.into()),
        }
    }
}

/// Body of the dynamic execution endpoint.
///
/// `query` is an `Option` so that a present-but-null field and an absent
/// field both deserialize instead of rejecting at the extractor; the handler
/// turns `None` (and empty strings) into a 400 `fail` envelope.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExecuteRequest {
    #[serde(default)]
    pub query: Option<String>,
}
