//! Seams between the planner and its collaborators.
//!
//! The route builder and schedule projector only need travel times, and the
//! refresh scheduler only needs something that produces snapshots. Tests and
//! alternative transports plug in here.

use crate::error::FetchError;
use crate::model::NetworkSnapshot;

/// Travel time lookup between two node ids.
pub trait TravelTimes {
    /// Minutes from `from` to `to`; `f64::INFINITY` when no path exists or
    /// either id is unknown.
    fn minutes(&self, from: &str, to: &str) -> f64;
}

/// Produces one consistent snapshot per refresh cycle.
///
/// Implementations must either return every input from the same cycle or
/// fail; partial snapshots are never handed to the core.
pub trait SnapshotSource: Send + Sync {
    fn fetch_snapshot(&self) -> Result<NetworkSnapshot, FetchError>;
}
