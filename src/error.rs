//! Error types for snapshot fetching, validation and configuration.

use thiserror::Error;

/// Failure while retrieving a snapshot from the upstream API.
///
/// The core is never invoked when any of these occurs.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),

    #[error("{endpoint} request failed: {source}")]
    Request {
        endpoint: &'static str,
        #[source]
        source: reqwest::Error,
    },

    #[error("no level data returned for the lookback window")]
    NoLevelData,

    #[error("snapshot rejected: {0}")]
    Invalid(#[from] SnapshotError),
}

/// Contract violations in a network snapshot.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum SnapshotError {
    #[error("point {id} has invalid capacity {capacity}")]
    InvalidCapacity { id: String, capacity: f64 },

    #[error("duplicate point id {0}")]
    DuplicatePoint(String),

    #[error("point id {0} collides with the depot id")]
    DepotCollision(String),

    #[error("edge {from} -> {to} has invalid travel time {minutes}")]
    InvalidEdge {
        from: String,
        to: String,
        minutes: f64,
    },
}

#[derive(Debug, Error, Clone, PartialEq)]
pub enum ConfigError {
    #[error("{key} has invalid value {value:?}")]
    Invalid { key: &'static str, value: String },
}
