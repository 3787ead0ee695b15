//! Test fixtures for courier-planner.
//!
//! Provides:
//! - A realistic cauldron network (`cauldron_network`)
//! - Builders turning fixture data into planner snapshots

#![allow(dead_code)]

pub mod cauldron_network;

use std::collections::HashMap;

use courier_planner::model::{Depot, Edge, LevelSnapshot, NetworkSnapshot, Point};

pub use cauldron_network::*;

/// Start of the fixture observation window (2025-10-30T00:00:00Z).
pub const WINDOW_START: i64 = 1761782400;

/// Liters removed per minute during a fixture collection.
pub const COLLECTION_RATE: f64 = 30.0;

pub fn point(site: &Site) -> Point {
    Point {
        id: site.id.to_string(),
        name: site.name.to_string(),
        latitude: site.lat,
        longitude: site.lng,
        capacity: site.max_volume,
    }
}

pub fn depot(site: &Site) -> Depot {
    Depot {
        id: site.id.to_string(),
        name: site.name.to_string(),
        latitude: site.lat,
        longitude: site.lng,
    }
}

pub fn edge(from: &str, to: &str, minutes: f64) -> Edge {
    Edge {
        from: from.to_string(),
        to: to.to_string(),
        travel_time_minutes: minutes,
    }
}

pub fn road_edges() -> Vec<Edge> {
    ROADS
        .iter()
        .map(|&(from, to, minutes)| edge(from, to, minutes))
        .collect()
}

/// Level of a fill profile at `minute` into the window.
pub fn profile_level(start: f64, per_minute: f64, collected: bool, minute: i64) -> f64 {
    let filled = start + per_minute * minute as f64;
    if !collected || minute < 30 {
        return filled;
    }
    let drained_minutes = (minute - 29).min(5) as f64;
    filled - COLLECTION_RATE * drained_minutes
}

/// One snapshot per minute over the past hour for every fill profile.
pub fn hour_of_levels() -> Vec<LevelSnapshot> {
    (0..=60)
        .map(|minute| LevelSnapshot {
            timestamp: WINDOW_START + minute * 60,
            cauldron_levels: FILL_PROFILES
                .iter()
                .map(|&(id, start, per_minute, collected)| {
                    (id.to_string(), profile_level(start, per_minute, collected, minute))
                })
                .collect(),
        })
        .collect()
}

pub fn fixture_snapshot() -> NetworkSnapshot {
    NetworkSnapshot::new(
        CAULDRONS.iter().map(point).collect(),
        depot(&MARKET),
        road_edges(),
        hour_of_levels(),
    )
}

/// Two snapshots `minutes` apart that give each point the requested
/// current level and hourly fill rate.
pub fn levels_for(current: &[(&str, f64, f64)], minutes: i64) -> Vec<LevelSnapshot> {
    let earlier: HashMap<String, f64> = current
        .iter()
        .map(|&(id, level, rate_per_hour)| {
            (id.to_string(), level - rate_per_hour / 60.0 * minutes as f64)
        })
        .collect();
    let now: HashMap<String, f64> = current
        .iter()
        .map(|&(id, level, _)| (id.to_string(), level))
        .collect();
    vec![
        LevelSnapshot {
            timestamp: WINDOW_START,
            cauldron_levels: earlier,
        },
        LevelSnapshot {
            timestamp: WINDOW_START + minutes * 60,
            cauldron_levels: now,
        },
    ]
}
