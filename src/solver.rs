//! Deadline-aware greedy route construction.
//!
//! Routes are grown one stop at a time from the depot. At each step the
//! pending point with the least slack (overflow deadline minus arrival) that
//! can still be reached on time and within the route budget is appended.
//! When nothing qualifies the route returns to the depot and a new one starts.

use tracing::{debug, warn};

use crate::model::{Route, UnroutablePoint, UnroutableReason};
use crate::overflow::minutes_to_overflow;
use crate::traits::TravelTimes;

#[derive(Debug, Clone)]
pub struct SolveOptions {
    /// Latest allowed arrival at any stop, in minutes from route start.
    pub max_route_minutes: f64,
    /// Dwell time added after every serviced stop.
    pub service_minutes: f64,
}

impl Default for SolveOptions {
    fn default() -> Self {
        Self {
            max_route_minutes: 8.0 * 60.0,
            service_minutes: 0.0,
        }
    }
}

/// A point waiting to be assigned, annotated with its overflow deadline.
#[derive(Debug, Clone, PartialEq)]
pub struct Candidate {
    pub id: String,
    pub current_level: f64,
    pub capacity: f64,
    /// Liters per hour.
    pub fill_rate: f64,
    /// Minutes until overflow; may be infinite.
    pub deadline_minutes: f64,
}

impl Candidate {
    pub fn new(id: impl Into<String>, current_level: f64, capacity: f64, fill_rate: f64) -> Self {
        Self {
            id: id.into(),
            current_level,
            capacity,
            fill_rate,
            deadline_minutes: minutes_to_overflow(current_level, capacity, fill_rate),
        }
    }

    /// Candidate with an explicit deadline, bypassing the overflow projection.
    pub fn with_deadline(id: impl Into<String>, deadline_minutes: f64) -> Self {
        Self {
            id: id.into(),
            current_level: 0.0,
            capacity: 0.0,
            fill_rate: 0.0,
            deadline_minutes,
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct RouteBuild {
    /// In creation order.
    pub routes: Vec<Route>,
    /// Ids reached after their deadline, in visitation order.
    pub overdue: Vec<String>,
    pub unroutable: Vec<UnroutablePoint>,
}

#[derive(Debug)]
struct RouteState<'a> {
    current: &'a str,
    elapsed: f64,
    stops: Vec<String>,
}

impl<'a> RouteState<'a> {
    fn start(depot_id: &'a str) -> Self {
        Self {
            current: depot_id,
            elapsed: 0.0,
            stops: vec![depot_id.to_string()],
        }
    }
}

/// Partition `candidates` into depot-bounded routes.
///
/// Every candidate ends up either on exactly one route or in
/// `RouteBuild::unroutable`. Candidates sharing the depot id are ignored.
///
/// When a fresh route cannot reach any pending point on time, the most
/// overdue point that still fits the budget opens the route and is reported
/// in `RouteBuild::overdue`. When not even that is possible, the remaining
/// points are reported as unroutable and construction stops.
pub fn build_routes<T>(
    candidates: &[Candidate],
    travel: &T,
    depot_id: &str,
    options: &SolveOptions,
) -> RouteBuild
where
    T: TravelTimes,
{
    let mut pending: Vec<&Candidate> = candidates
        .iter()
        .filter(|candidate| candidate.id != depot_id)
        .collect();
    // Stable: equal deadlines keep input order, which decides slack ties.
    pending.sort_by(|a, b| a.deadline_minutes.total_cmp(&b.deadline_minutes));

    let mut build = RouteBuild::default();

    while !pending.is_empty() {
        let mut route = RouteState::start(depot_id);

        let mut next = select_next(&pending, &route, travel, options, true);
        if next.is_none() {
            next = select_next(&pending, &route, travel, options, false);
            if next.is_none() {
                build.unroutable = classify_unroutable(&pending, travel, depot_id, options);
                break;
            }
        }

        while let Some(position) = next {
            let candidate = pending.remove(position);
            route.elapsed += travel.minutes(route.current, &candidate.id);
            if route.elapsed > candidate.deadline_minutes {
                warn!(
                    id = %candidate.id,
                    arrival = route.elapsed,
                    deadline = candidate.deadline_minutes,
                    "stop reached after its overflow deadline"
                );
                build.overdue.push(candidate.id.clone());
            }
            debug!(id = %candidate.id, arrival = route.elapsed, "stop appended");
            route.elapsed += options.service_minutes;
            route.stops.push(candidate.id.clone());
            route.current = &candidate.id;

            next = select_next(&pending, &route, travel, options, true);
        }

        build.routes.push(close_route(route, travel, depot_id, options));
    }

    build
}

/// Index into `pending` of the qualifying point with the smallest slack.
///
/// With `enforce_deadline` unset the deadline check is dropped, so the most
/// overdue reachable point wins.
fn select_next<T>(
    pending: &[&Candidate],
    route: &RouteState<'_>,
    travel: &T,
    options: &SolveOptions,
    enforce_deadline: bool,
) -> Option<usize>
where
    T: TravelTimes,
{
    let mut best: Option<(usize, f64)> = None;

    for (position, candidate) in pending.iter().enumerate() {
        let leg = travel.minutes(route.current, &candidate.id);
        if !leg.is_finite() {
            continue;
        }
        let arrival = route.elapsed + leg;
        if enforce_deadline && arrival > candidate.deadline_minutes {
            continue;
        }
        if arrival > options.max_route_minutes {
            continue;
        }
        let slack = candidate.deadline_minutes - arrival;
        if best.is_some_and(|(_, best_slack)| slack >= best_slack) {
            continue;
        }
        best = Some((position, slack));
    }

    best.map(|(position, _)| position)
}

/// Append the return leg. The budget is soft here: the depot is appended
/// even when the return overruns it.
fn close_route<T>(mut route: RouteState<'_>, travel: &T, depot_id: &str, options: &SolveOptions) -> Route
where
    T: TravelTimes,
{
    let back = travel.minutes(route.current, depot_id);
    let back = if back.is_finite() { back } else { 0.0 };
    let duration = route.elapsed + back;
    if duration > options.max_route_minutes {
        warn!(
            duration,
            budget = options.max_route_minutes,
            "return leg exceeds the route budget"
        );
    }
    route.stops.push(depot_id.to_string());

    Route {
        stops: route.stops,
        duration_minutes: duration,
    }
}

fn classify_unroutable<T>(
    pending: &[&Candidate],
    travel: &T,
    depot_id: &str,
    options: &SolveOptions,
) -> Vec<UnroutablePoint>
where
    T: TravelTimes,
{
    pending
        .iter()
        .map(|candidate| {
            let reason = if travel.minutes(depot_id, &candidate.id).is_finite() {
                UnroutableReason::ExceedsRouteBudget
            } else {
                UnroutableReason::Unreachable
            };
            warn!(id = %candidate.id, ?reason, budget = options.max_route_minutes, "point left unrouted");
            UnroutablePoint {
                id: candidate.id.clone(),
                reason,
            }
        })
        .collect()
}
