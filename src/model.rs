//! Snapshot inputs and routing outputs.
//!
//! Everything here is plain data. A `NetworkSnapshot` is built once per
//! refresh cycle and only read afterwards.

use std::collections::{BTreeMap, HashMap, HashSet};

use chrono::{DateTime, NaiveDateTime};
use serde::{Deserialize, Deserializer, Serialize};

use crate::error::SnapshotError;
use crate::graph::TravelMatrix;

/// A collection point ("cauldron").
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub latitude: f64,
    #[serde(default)]
    pub longitude: f64,
    /// Capacity in liters. Missing values default to 0, which makes the
    /// point due immediately as soon as it fills at all.
    #[serde(rename = "max_volume", alias = "capacity", default)]
    pub capacity: f64,
}

/// The single start/end location of every route ("market").
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Depot {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub latitude: f64,
    #[serde(default)]
    pub longitude: f64,
}

/// Undirected weighted edge.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Edge {
    pub from: String,
    pub to: String,
    pub travel_time_minutes: f64,
}

/// Body of the network endpoint.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct NetworkInfo {
    #[serde(default)]
    pub edges: Vec<Edge>,
}

/// One observation of every point's level at a single instant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LevelSnapshot {
    /// Unix seconds.
    #[serde(deserialize_with = "unix_seconds")]
    pub timestamp: i64,
    #[serde(default)]
    pub cauldron_levels: HashMap<String, f64>,
}

/// A courier's record of a collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransportTicket {
    #[serde(default)]
    pub ticket_id: String,
    pub cauldron_id: String,
    pub amount_collected: f64,
    #[serde(default)]
    pub courier_id: String,
    /// Either a bare date or an ISO timestamp; only the date part is used.
    pub date: String,
}

/// Immutable input of one planning cycle.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NetworkSnapshot {
    pub points: Vec<Point>,
    pub depot: Depot,
    #[serde(default)]
    pub edges: Vec<Edge>,
    #[serde(default)]
    pub levels: Vec<LevelSnapshot>,
}

impl NetworkSnapshot {
    /// Build a snapshot; level observations are ordered by timestamp.
    pub fn new(
        points: Vec<Point>,
        depot: Depot,
        edges: Vec<Edge>,
        mut levels: Vec<LevelSnapshot>,
    ) -> Self {
        levels.sort_by_key(|snapshot| snapshot.timestamp);
        Self {
            points,
            depot,
            edges,
            levels,
        }
    }

    /// Depot id followed by every point id, in input order.
    pub fn node_ids(&self) -> Vec<String> {
        std::iter::once(self.depot.id.clone())
            .chain(self.points.iter().map(|point| point.id.clone()))
            .collect()
    }

    /// Reject snapshots that break the data-model contract.
    pub fn validate(&self) -> Result<(), SnapshotError> {
        let mut seen = HashSet::new();
        for point in &self.points {
            if point.id == self.depot.id {
                return Err(SnapshotError::DepotCollision(point.id.clone()));
            }
            if !seen.insert(point.id.as_str()) {
                return Err(SnapshotError::DuplicatePoint(point.id.clone()));
            }
            if !(point.capacity >= 0.0) || !point.capacity.is_finite() {
                return Err(SnapshotError::InvalidCapacity {
                    id: point.id.clone(),
                    capacity: point.capacity,
                });
            }
        }

        for edge in &self.edges {
            if !(edge.travel_time_minutes > 0.0) || !edge.travel_time_minutes.is_finite() {
                return Err(SnapshotError::InvalidEdge {
                    from: edge.from.clone(),
                    to: edge.to.clone(),
                    minutes: edge.travel_time_minutes,
                });
            }
        }

        Ok(())
    }
}

/// Ordered visitation sequence, bounded by the depot at both ends.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Route {
    pub stops: Vec<String>,
    /// Elapsed minutes including the return leg.
    pub duration_minutes: f64,
}

impl Route {
    /// Non-depot stops in visitation order.
    pub fn visits(&self) -> &[String] {
        if self.stops.len() < 2 {
            return &[];
        }
        &self.stops[1..self.stops.len() - 1]
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScheduledStop {
    pub id: String,
    /// Rounded minutes since the route left the depot.
    pub eta_minutes: i64,
}

/// Per-stop arrival estimates of one route.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Schedule {
    pub stops: Vec<ScheduledStop>,
    /// Rounded arrival back at the depot.
    pub return_minutes: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum UnroutableReason {
    /// No path connects the point to the depot.
    Unreachable,
    /// The point cannot be reached within the route duration budget.
    ExceedsRouteBudget,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UnroutablePoint {
    pub id: String,
    pub reason: UnroutableReason,
}

/// Output of one planning cycle.
#[derive(Debug, Clone, Serialize)]
pub struct RoutingResult {
    /// Estimated fill rate per point, liters per hour.
    pub fill_rates: BTreeMap<String, f64>,
    /// Minutes to overflow per point; `null` in JSON when infinite.
    pub deadlines: BTreeMap<String, f64>,
    pub travel_matrix: TravelMatrix,
    pub routes: Vec<Route>,
    /// Parallel to `routes`.
    pub schedules: Vec<Schedule>,
    /// Points visited after their overflow deadline.
    pub overdue: Vec<String>,
    pub unroutable: Vec<UnroutablePoint>,
}

impl RoutingResult {
    /// Every non-depot point that was placed on a route.
    pub fn assigned_ids(&self) -> impl Iterator<Item = &str> {
        self.routes
            .iter()
            .flat_map(|route| route.visits().iter().map(String::as_str))
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawTimestamp {
    Seconds(i64),
    Fractional(f64),
    Text(String),
}

fn unix_seconds<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    match RawTimestamp::deserialize(deserializer)? {
        RawTimestamp::Seconds(seconds) => Ok(seconds),
        RawTimestamp::Fractional(seconds) => Ok(seconds.floor() as i64),
        RawTimestamp::Text(text) => parse_timestamp(&text).ok_or_else(|| {
            serde::de::Error::custom(format!("unrecognised timestamp {text:?}"))
        }),
    }
}

/// Accepts unix seconds, RFC 3339, or a naive ISO timestamp read as UTC.
pub fn parse_timestamp(text: &str) -> Option<i64> {
    let text = text.trim();
    if let Ok(seconds) = text.parse::<i64>() {
        return Some(seconds);
    }
    if let Ok(parsed) = DateTime::parse_from_rfc3339(text) {
        return Some(parsed.timestamp());
    }
    ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"]
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(text, format).ok())
        .map(|naive| naive.and_utc().timestamp())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn point(id: &str, capacity: f64) -> Point {
        Point {
            id: id.to_string(),
            name: id.to_string(),
            latitude: 0.0,
            longitude: 0.0,
            capacity,
        }
    }

    fn depot() -> Depot {
        Depot {
            id: "market_001".to_string(),
            name: "Market".to_string(),
            latitude: 0.0,
            longitude: 0.0,
        }
    }

    #[test]
    fn test_timestamp_formats() {
        assert_eq!(parse_timestamp("1761782400"), Some(1761782400));
        assert_eq!(parse_timestamp("2025-10-30T00:00:00Z"), Some(1761782400));
        assert_eq!(parse_timestamp("2025-10-30T00:00:00+00:00"), Some(1761782400));
        assert_eq!(parse_timestamp("2025-10-30T00:00:00"), Some(1761782400));
        assert_eq!(parse_timestamp("yesterday"), None);
    }

    #[test]
    fn test_level_snapshot_accepts_string_and_numeric_timestamps() {
        let numeric: LevelSnapshot =
            serde_json::from_str(r#"{"timestamp": 60, "cauldron_levels": {"c1": 1.5}}"#).unwrap();
        assert_eq!(numeric.timestamp, 60);
        assert_eq!(numeric.cauldron_levels["c1"], 1.5);

        let text: LevelSnapshot =
            serde_json::from_str(r#"{"timestamp": "2025-10-30T00:01:00Z", "cauldron_levels": {}}"#)
                .unwrap();
        assert_eq!(text.timestamp, 1761782460);
    }

    #[test]
    fn test_point_reads_max_volume() {
        let parsed: Point = serde_json::from_str(
            r#"{"id": "cauldron_001", "name": "A", "latitude": 33.1, "longitude": -96.7, "max_volume": 1000}"#,
        )
        .unwrap();
        assert_eq!(parsed.capacity, 1000.0);
    }

    #[test]
    fn test_new_sorts_levels() {
        let levels = vec![
            LevelSnapshot { timestamp: 120, cauldron_levels: HashMap::new() },
            LevelSnapshot { timestamp: 0, cauldron_levels: HashMap::new() },
        ];
        let snapshot = NetworkSnapshot::new(vec![], depot(), vec![], levels);
        assert_eq!(snapshot.levels[0].timestamp, 0);
        assert_eq!(snapshot.node_ids(), vec!["market_001".to_string()]);
    }

    #[test]
    fn test_validate_rejects_contract_violations() {
        let negative = NetworkSnapshot::new(vec![point("a", -1.0)], depot(), vec![], vec![]);
        assert!(matches!(
            negative.validate(),
            Err(SnapshotError::InvalidCapacity { .. })
        ));

        let duplicate =
            NetworkSnapshot::new(vec![point("a", 1.0), point("a", 2.0)], depot(), vec![], vec![]);
        assert_eq!(
            duplicate.validate(),
            Err(SnapshotError::DuplicatePoint("a".to_string()))
        );

        let collision = NetworkSnapshot::new(vec![point("market_001", 1.0)], depot(), vec![], vec![]);
        assert!(matches!(collision.validate(), Err(SnapshotError::DepotCollision(_))));

        let bad_edge = NetworkSnapshot::new(
            vec![point("a", 1.0)],
            depot(),
            vec![Edge {
                from: "a".to_string(),
                to: "market_001".to_string(),
                travel_time_minutes: 0.0,
            }],
            vec![],
        );
        assert!(matches!(bad_edge.validate(), Err(SnapshotError::InvalidEdge { .. })));
    }

    #[test]
    fn test_route_visits_excludes_depot() {
        let route = Route {
            stops: vec!["d".into(), "a".into(), "b".into(), "d".into()],
            duration_minutes: 30.0,
        };
        assert_eq!(route.visits(), &["a".to_string(), "b".to_string()]);
    }
}
