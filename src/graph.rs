//! All-pairs shortest travel times over the undirected road graph.
//!
//! Point counts are in the tens, so each source runs the plain O(V²)
//! label-setting search with a linear scan for the closest unvisited node.

use std::collections::HashMap;

use rayon::prelude::*;
use serde::Serialize;
use tracing::debug;

use crate::model::Edge;
use crate::traits::TravelTimes;

/// Dense travel-time matrix in minutes, addressed by node id.
///
/// Symmetric with a zero diagonal. Unreachable pairs hold `f64::INFINITY`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TravelMatrix {
    ids: Vec<String>,
    #[serde(skip)]
    index: HashMap<String, usize>,
    minutes: Vec<Vec<f64>>,
}

impl TravelMatrix {
    /// Run a shortest-path search from every id over `edges`.
    ///
    /// Duplicate ids keep their first position. Edges naming unknown ids or
    /// carrying a non-positive weight are ignored.
    pub fn build(ids: &[String], edges: &[Edge]) -> Self {
        let mut unique = Vec::with_capacity(ids.len());
        let mut index = HashMap::with_capacity(ids.len());
        for id in ids {
            if !index.contains_key(id) {
                index.insert(id.clone(), unique.len());
                unique.push(id.clone());
            }
        }

        let adjacency = adjacency(&index, edges);
        let mut minutes: Vec<Vec<f64>> = (0..unique.len())
            .into_par_iter()
            .map(|source| shortest_from(source, &adjacency))
            .collect();

        // Path sums accumulate in opposite order from either end; pin both
        // halves to the same value so lookups are exactly symmetric.
        for i in 0..unique.len() {
            for j in (i + 1)..unique.len() {
                let best = minutes[i][j].min(minutes[j][i]);
                minutes[i][j] = best;
                minutes[j][i] = best;
            }
        }

        Self {
            ids: unique,
            index,
            minutes,
        }
    }

    pub fn ids(&self) -> &[String] {
        &self.ids
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn index_of(&self, id: &str) -> Option<usize> {
        self.index.get(id).copied()
    }

    /// Minutes between two matrix indices.
    ///
    /// # Panics
    ///
    /// Panics if either index is out of bounds.
    pub fn get(&self, from: usize, to: usize) -> f64 {
        self.minutes[from][to]
    }

    pub fn is_reachable(&self, from: &str, to: &str) -> bool {
        self.minutes(from, to).is_finite()
    }
}

impl TravelTimes for TravelMatrix {
    fn minutes(&self, from: &str, to: &str) -> f64 {
        match (self.index_of(from), self.index_of(to)) {
            (Some(i), Some(j)) => self.minutes[i][j],
            _ => f64::INFINITY,
        }
    }
}

fn adjacency(index: &HashMap<String, usize>, edges: &[Edge]) -> Vec<Vec<(usize, f64)>> {
    let mut adjacency = vec![Vec::new(); index.len()];
    for edge in edges {
        let weight = edge.travel_time_minutes;
        if !(weight > 0.0) || !weight.is_finite() {
            debug!(from = %edge.from, to = %edge.to, weight, "skipping edge with invalid weight");
            continue;
        }
        match (index.get(&edge.from), index.get(&edge.to)) {
            (Some(&a), Some(&b)) => {
                adjacency[a].push((b, weight));
                adjacency[b].push((a, weight));
            }
            _ => debug!(from = %edge.from, to = %edge.to, "skipping edge with unknown endpoint"),
        }
    }
    adjacency
}

fn shortest_from(source: usize, adjacency: &[Vec<(usize, f64)>]) -> Vec<f64> {
    let n = adjacency.len();
    let mut dist = vec![f64::INFINITY; n];
    let mut visited = vec![false; n];
    dist[source] = 0.0;

    for _ in 0..n {
        let closest = (0..n)
            .filter(|&v| !visited[v] && dist[v].is_finite())
            .min_by(|&a, &b| dist[a].total_cmp(&dist[b]));
        let Some(u) = closest else {
            break;
        };
        visited[u] = true;

        for &(v, weight) in &adjacency[u] {
            let candidate = dist[u] + weight;
            if candidate < dist[v] {
                dist[v] = candidate;
            }
        }
    }

    dist
}
