//! Periodic recomputation driven by a snapshot source.
//!
//! Each cycle takes a generation number before fetching. Results are only
//! published when their generation is newer than the last published one, so
//! a slow cycle finishing after a faster, newer one is dropped.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;

use parking_lot::{Mutex, RwLock};
use tracing::{debug, error, info};

use crate::graph::TravelMatrix;
use crate::model::{Edge, NetworkSnapshot, RoutingResult};
use crate::planner::compute_assignment_with;
use crate::solver::SolveOptions;
use crate::traits::SnapshotSource;

/// Latest published outcome.
#[derive(Debug, Clone)]
pub enum RefreshState {
    /// No cycle has been published yet.
    Pending,
    Ready {
        generation: u64,
        result: Arc<RoutingResult>,
    },
    Failed {
        generation: u64,
        error: String,
    },
}

impl RefreshState {
    pub fn generation(&self) -> u64 {
        match self {
            RefreshState::Pending => 0,
            RefreshState::Ready { generation, .. } | RefreshState::Failed { generation, .. } => {
                *generation
            }
        }
    }
}

/// Topology identity used to memoize the travel matrix.
#[derive(Debug, Clone, PartialEq)]
struct TopologyKey {
    ids: Vec<String>,
    edges: Vec<Edge>,
}

impl TopologyKey {
    fn of(snapshot: &NetworkSnapshot) -> Self {
        Self {
            ids: snapshot.node_ids(),
            edges: snapshot.edges.clone(),
        }
    }
}

pub struct Refresher<S> {
    source: S,
    options: SolveOptions,
    next_generation: AtomicU64,
    state: RwLock<RefreshState>,
    last_success: RwLock<Option<Arc<RoutingResult>>>,
    matrix_cache: Mutex<Option<(TopologyKey, Arc<TravelMatrix>)>>,
}

impl<S> Refresher<S>
where
    S: SnapshotSource,
{
    pub fn new(source: S, options: SolveOptions) -> Self {
        Self {
            source,
            options,
            next_generation: AtomicU64::new(1),
            state: RwLock::new(RefreshState::Pending),
            last_success: RwLock::new(None),
            matrix_cache: Mutex::new(None),
        }
    }

    /// Reserve the generation number of a new cycle.
    pub fn begin_cycle(&self) -> u64 {
        self.next_generation.fetch_add(1, Ordering::SeqCst)
    }

    /// Run one full cycle and return whatever state is current afterwards.
    pub fn refresh(&self) -> RefreshState {
        let generation = self.begin_cycle();
        let outcome = match self.source.fetch_snapshot() {
            Ok(snapshot) => {
                let matrix = self.travel_matrix(&snapshot);
                let result = compute_assignment_with(&snapshot, &matrix, &self.options);
                RefreshState::Ready {
                    generation,
                    result: Arc::new(result),
                }
            }
            Err(err) => {
                error!(generation, error = %err, "refresh failed");
                RefreshState::Failed {
                    generation,
                    error: err.to_string(),
                }
            }
        };

        self.publish(outcome);
        self.state()
    }

    /// Publish `outcome` unless a newer generation already has been.
    /// Returns whether it was applied.
    pub fn publish(&self, outcome: RefreshState) -> bool {
        let generation = outcome.generation();
        let mut state = self.state.write();
        if generation <= state.generation() {
            debug!(generation, current = state.generation(), "discarding stale result");
            return false;
        }
        if let RefreshState::Ready { result, .. } = &outcome {
            *self.last_success.write() = Some(Arc::clone(result));
        }
        *state = outcome;
        true
    }

    pub fn state(&self) -> RefreshState {
        self.state.read().clone()
    }

    /// Most recent successful result, even if a later cycle failed.
    pub fn last_success(&self) -> Option<Arc<RoutingResult>> {
        self.last_success.read().clone()
    }

    /// Refresh every `interval`; stops after `cycles` when given.
    pub fn run<F>(&self, interval: Duration, cycles: Option<usize>, mut on_publish: F)
    where
        F: FnMut(&RefreshState),
    {
        let mut completed = 0;
        loop {
            let state = self.refresh();
            on_publish(&state);
            completed += 1;
            if cycles.is_some_and(|limit| completed >= limit) {
                break;
            }
            std::thread::sleep(interval);
        }
    }

    /// Travel matrix for the snapshot's topology, reused while it is unchanged.
    fn travel_matrix(&self, snapshot: &NetworkSnapshot) -> Arc<TravelMatrix> {
        let key = TopologyKey::of(snapshot);
        let mut cache = self.matrix_cache.lock();
        if let Some((cached_key, matrix)) = cache.as_ref() {
            if *cached_key == key {
                return Arc::clone(matrix);
            }
        }

        info!(nodes = key.ids.len(), edges = key.edges.len(), "rebuilding travel matrix");
        let matrix = Arc::new(TravelMatrix::build(&key.ids, &key.edges));
        *cache = Some((key, Arc::clone(&matrix)));
        matrix
    }
}
