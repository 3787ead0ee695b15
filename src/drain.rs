//! Statistical detection of drain (collection) events in level series.
//!
//! A sample is draining when its level change falls well below the normal
//! filling behaviour of the same point and day. Runs of draining samples
//! shorter than `min_duration` are treated as noise.

use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDate};
use serde::Serialize;

use crate::forecast::series_by_point;
use crate::model::LevelSnapshot;

/// Changes below this are draining when there is too little filling data
/// for a statistical threshold.
const FALLBACK_DRAIN_THRESHOLD: f64 = -5.0;

/// Minimum number of rising changes needed for the statistical threshold.
const MIN_FILLING_SAMPLES: usize = 10;

#[derive(Debug, Clone)]
pub struct DrainOptions {
    /// Standard deviations below the mean filling change.
    pub std_multiplier: f64,
    /// Minimum consecutive draining samples per event.
    pub min_duration: usize,
}

impl Default for DrainOptions {
    fn default() -> Self {
        Self {
            std_multiplier: 3.0,
            min_duration: 5,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DrainEvent {
    /// Index of the first draining sample.
    pub start_index: usize,
    /// Index of the last draining sample.
    pub end_index: usize,
    pub duration_samples: usize,
    pub start_time: i64,
    pub end_time: i64,
    pub level_before: f64,
    pub level_after: f64,
    pub total_drop: f64,
    pub avg_drop_rate: f64,
}

/// Drained volume of one point on one UTC day.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DailyDrain {
    pub cauldron_id: String,
    pub date: NaiveDate,
    pub drain_volume: f64,
    pub events: Vec<DrainEvent>,
}

/// Detect drain events in a time-ordered series.
pub fn detect_drain_events(series: &[(i64, f64)], options: &DrainOptions) -> Vec<DrainEvent> {
    if series.len() < 2 {
        return Vec::new();
    }

    let changes: Vec<Option<f64>> = std::iter::once(None)
        .chain(series.windows(2).map(|pair| Some(pair[1].1 - pair[0].1)))
        .collect();
    let threshold = drain_threshold(&changes, options.std_multiplier);
    let draining: Vec<bool> = changes
        .iter()
        .map(|change| change.is_some_and(|c| c < threshold))
        .collect();

    let mut events = Vec::new();
    let mut i = 0;
    while i < draining.len() {
        if !draining[i] {
            i += 1;
            continue;
        }
        let start = i;
        while i + 1 < draining.len() && draining[i + 1] {
            i += 1;
        }
        let end = i;
        i += 1;

        let duration = end - start + 1;
        if duration < options.min_duration {
            continue;
        }

        let level_before = if start > 0 { series[start - 1].1 } else { series[start].1 };
        let level_after = series[end].1;
        let total_drop = level_before - level_after;
        events.push(DrainEvent {
            start_index: start,
            end_index: end,
            duration_samples: duration,
            start_time: series[start].0,
            end_time: series[end].0,
            level_before,
            level_after,
            total_drop,
            avg_drop_rate: total_drop / duration as f64,
        });
    }

    events
}

fn drain_threshold(changes: &[Option<f64>], std_multiplier: f64) -> f64 {
    let filling: Vec<f64> = changes.iter().flatten().copied().filter(|c| *c > 0.0).collect();
    if filling.len() <= MIN_FILLING_SAMPLES {
        return FALLBACK_DRAIN_THRESHOLD;
    }

    let n = filling.len() as f64;
    let mean = filling.iter().sum::<f64>() / n;
    let variance = filling.iter().map(|c| (c - mean).powi(2)).sum::<f64>() / (n - 1.0);
    mean - std_multiplier * variance.sqrt()
}

/// Per point and UTC day, the drain events and their total volume.
///
/// Only days with a positive drained volume are returned, ordered by point
/// id and date.
pub fn daily_drains(snapshots: &[LevelSnapshot], options: &DrainOptions) -> Vec<DailyDrain> {
    let mut by_day: BTreeMap<(String, NaiveDate), Vec<(i64, f64)>> = BTreeMap::new();
    for (id, series) in series_by_point(snapshots) {
        for (timestamp, level) in series {
            let Some(date) = DateTime::from_timestamp(timestamp, 0).map(|dt| dt.date_naive()) else {
                continue;
            };
            by_day.entry((id.clone(), date)).or_default().push((timestamp, level));
        }
    }

    by_day
        .into_iter()
        .filter_map(|((cauldron_id, date), series)| {
            let events = detect_drain_events(&series, options);
            let drain_volume: f64 = events.iter().map(|event| event.total_drop).sum();
            (drain_volume > 0.0).then(|| DailyDrain {
                cauldron_id,
                date,
                drain_volume,
                events,
            })
        })
        .collect()
}
