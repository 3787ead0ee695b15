//! Fill-rate estimation from level observations.
//!
//! Only rising deltas count so that collections and drains do not pull the
//! estimate down, and the median keeps single noisy samples from dominating.

use std::collections::{BTreeMap, HashMap};

use crate::model::LevelSnapshot;

/// `(unix seconds, level)` samples of one point, ordered by time.
pub type Series = Vec<(i64, f64)>;

/// Hourly fill rate of a single series.
///
/// Pairs with a non-positive time delta or a non-rising level are skipped.
/// Returns 0 for empty, flat or falling series.
pub fn estimate_fill_rate(series: &[(i64, f64)]) -> f64 {
    let mut per_minute: Vec<f64> = series
        .windows(2)
        .filter_map(|pair| {
            let (t0, v0) = pair[0];
            let (t1, v1) = pair[1];
            let dt_minutes = (t1 - t0) as f64 / 60.0;
            let dv = v1 - v0;
            (dt_minutes > 0.0 && dv > 0.0).then(|| dv / dt_minutes)
        })
        .collect();

    (median(&mut per_minute) * 60.0).max(0.0)
}

/// Median of `values`; 0 when empty. Reorders the slice.
fn median(values: &mut [f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.sort_by(f64::total_cmp);
    let mid = values.len() / 2;
    if values.len() % 2 == 1 {
        values[mid]
    } else {
        (values[mid - 1] + values[mid]) / 2.0
    }
}

/// Split level snapshots into per-point series.
///
/// A point missing from a snapshot simply has no sample at that instant;
/// non-finite levels are dropped.
pub fn series_by_point(snapshots: &[LevelSnapshot]) -> HashMap<String, Series> {
    let mut ordered: Vec<&LevelSnapshot> = snapshots.iter().collect();
    ordered.sort_by_key(|snapshot| snapshot.timestamp);

    let mut series: HashMap<String, Series> = HashMap::new();
    for snapshot in ordered {
        for (id, &level) in &snapshot.cauldron_levels {
            if level.is_finite() {
                series
                    .entry(id.clone())
                    .or_default()
                    .push((snapshot.timestamp, level));
            }
        }
    }
    series
}

/// Hourly fill rate for every point seen in `snapshots`.
pub fn estimate_fill_rates(snapshots: &[LevelSnapshot]) -> BTreeMap<String, f64> {
    series_by_point(snapshots)
        .into_iter()
        .map(|(id, series)| {
            let rate = estimate_fill_rate(&series);
            (id, rate)
        })
        .collect()
}

/// Most recent observed level of every point.
pub fn current_levels(snapshots: &[LevelSnapshot]) -> HashMap<String, f64> {
    series_by_point(snapshots)
        .into_iter()
        .filter_map(|(id, series)| series.last().map(|&(_, level)| (id, level)))
        .collect()
}
