//! Single entry point that turns a snapshot into route assignments.

use tracing::info;

use crate::forecast::{current_levels, estimate_fill_rates};
use crate::graph::TravelMatrix;
use crate::model::{NetworkSnapshot, RoutingResult};
use crate::schedule::project_schedule;
use crate::solver::{build_routes, Candidate, SolveOptions};

/// Forecast, build the travel matrix, construct routes and project schedules.
pub fn compute_assignment(snapshot: &NetworkSnapshot, options: &SolveOptions) -> RoutingResult {
    let matrix = TravelMatrix::build(&snapshot.node_ids(), &snapshot.edges);
    compute_assignment_with(snapshot, &matrix, options)
}

/// Same as [`compute_assignment`] with a precomputed matrix for the
/// snapshot's topology.
pub fn compute_assignment_with(
    snapshot: &NetworkSnapshot,
    matrix: &TravelMatrix,
    options: &SolveOptions,
) -> RoutingResult {
    let observed_rates = estimate_fill_rates(&snapshot.levels);
    let levels = current_levels(&snapshot.levels);

    let candidates: Vec<Candidate> = snapshot
        .points
        .iter()
        .map(|point| {
            let current = levels.get(&point.id).copied().unwrap_or(0.0);
            let rate = observed_rates.get(&point.id).copied().unwrap_or(0.0);
            Candidate::new(point.id.clone(), current, point.capacity, rate)
        })
        .collect();

    let build = build_routes(&candidates, matrix, &snapshot.depot.id, options);
    let schedules = build
        .routes
        .iter()
        .map(|route| project_schedule(route, matrix, options.service_minutes))
        .collect();

    info!(
        points = candidates.len(),
        routes = build.routes.len(),
        overdue = build.overdue.len(),
        unroutable = build.unroutable.len(),
        "assignment computed"
    );

    RoutingResult {
        fill_rates: candidates
            .iter()
            .map(|candidate| (candidate.id.clone(), candidate.fill_rate))
            .collect(),
        deadlines: candidates
            .iter()
            .map(|candidate| (candidate.id.clone(), candidate.deadline_minutes))
            .collect(),
        travel_matrix: matrix.clone(),
        routes: build.routes,
        schedules,
        overdue: build.overdue,
        unroutable: build.unroutable,
    }
}
