//! Arrival estimates along a constructed route.

use crate::model::{Route, Schedule, ScheduledStop};
use crate::traits::TravelTimes;

/// Walk `route` and record the rounded elapsed minutes at every stop.
///
/// Time accumulates unrounded; only the recorded values are rounded. The
/// final depot stop becomes `Schedule::return_minutes` rather than an entry.
pub fn project_schedule<T>(route: &Route, travel: &T, service_minutes: f64) -> Schedule
where
    T: TravelTimes,
{
    let mut stops = Vec::with_capacity(route.visits().len());
    let mut elapsed = 0.0;
    let mut return_minutes = 0;

    for (i, pair) in route.stops.windows(2).enumerate() {
        let (prev, curr) = (&pair[0], &pair[1]);
        elapsed += travel.minutes(prev, curr);

        let is_return = i + 2 == route.stops.len();
        if is_return {
            return_minutes = elapsed.round() as i64;
        } else {
            stops.push(ScheduledStop {
                id: curr.clone(),
                eta_minutes: elapsed.round() as i64,
            });
            elapsed += service_minutes;
        }
    }

    Schedule {
        stops,
        return_minutes,
    }
}
