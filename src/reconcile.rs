//! Cross-check of courier tickets against detected drain volume.

use std::collections::{BTreeMap, BTreeSet};

use serde::Serialize;

use crate::drain::DailyDrain;
use crate::model::TransportTicket;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DiscrepancyStatus {
    Match,
    Mismatch,
    DrainNotDetected,
    TicketMissing,
    NoData,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Discrepancy {
    pub cauldron_id: String,
    /// `YYYY-MM-DD`.
    pub date: String,
    pub ticket_amount: f64,
    pub drain_volume: f64,
    pub difference: f64,
    pub status: DiscrepancyStatus,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReconciliationSummary {
    pub total_comparisons: usize,
    pub matches: usize,
    pub mismatches: usize,
    pub missing_tickets: usize,
    pub missing_drains: usize,
    pub match_percentage: f64,
    pub tolerance_used: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReconciliationReport {
    pub summary: ReconciliationSummary,
    pub results: Vec<Discrepancy>,
}

/// Compare ticketed volume with drained volume per point and day.
///
/// Amounts within `tolerance` liters of each other match.
pub fn reconcile(
    tickets: &[TransportTicket],
    drains: &[DailyDrain],
    tolerance: f64,
) -> ReconciliationReport {
    let mut ticketed: BTreeMap<(String, String), f64> = BTreeMap::new();
    for ticket in tickets {
        let date = ticket.date.split('T').next().unwrap_or_default().to_string();
        *ticketed.entry((ticket.cauldron_id.clone(), date)).or_default() += ticket.amount_collected;
    }

    let drained: BTreeMap<(String, String), f64> = drains
        .iter()
        .map(|drain| ((drain.cauldron_id.clone(), drain.date.to_string()), drain.drain_volume))
        .collect();

    let keys: BTreeSet<&(String, String)> = ticketed.keys().chain(drained.keys()).collect();
    let results: Vec<Discrepancy> = keys
        .into_iter()
        .map(|key| {
            let ticket_amount = ticketed.get(key).copied().unwrap_or(0.0);
            let drain_volume = drained.get(key).copied().unwrap_or(0.0);
            let difference = (ticket_amount - drain_volume).abs();
            let status = match (ticket_amount > 0.0, drain_volume > 0.0) {
                (true, true) if difference <= tolerance => DiscrepancyStatus::Match,
                (true, true) => DiscrepancyStatus::Mismatch,
                (true, false) => DiscrepancyStatus::DrainNotDetected,
                (false, true) => DiscrepancyStatus::TicketMissing,
                (false, false) => DiscrepancyStatus::NoData,
            };
            Discrepancy {
                cauldron_id: key.0.clone(),
                date: key.1.clone(),
                ticket_amount: round2(ticket_amount),
                drain_volume: round2(drain_volume),
                difference: round2(difference),
                status,
            }
        })
        .collect();

    let count = |status: DiscrepancyStatus| results.iter().filter(|r| r.status == status).count();
    let total = results.len();
    let matches = count(DiscrepancyStatus::Match);
    let summary = ReconciliationSummary {
        total_comparisons: total,
        matches,
        mismatches: count(DiscrepancyStatus::Mismatch),
        missing_tickets: count(DiscrepancyStatus::TicketMissing),
        missing_drains: count(DiscrepancyStatus::DrainNotDetected),
        match_percentage: if total > 0 {
            round2(matches as f64 / total as f64 * 100.0)
        } else {
            0.0
        },
        tolerance_used: tolerance,
    };

    ReconciliationReport { summary, results }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
