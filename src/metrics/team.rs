use crate::date_util::round2;
use crate::error::{Error, Result};
use crate::models::PerformerRecord;

use super::types::TeamStats;

/// Aggregate a roster into team means and totals.
///
/// Means are rounded half-up to two decimals once, here. An empty roster
/// has no mean and yields [`Error::EmptyInput`].
pub fn aggregate(records: &[PerformerRecord]) -> Result<TeamStats> {
    if records.is_empty() {
        return Err(Error::EmptyInput("performance roster is empty".into()));
    }

    let n = records.len() as f64;
    let rate_sum: f64 = records.iter().map(|r| r.conversion_rate).sum();
    let response_sum: f64 = records.iter().map(|r| r.avg_response_time_hours).sum();

    Ok(TeamStats {
        member_count: records.len(),
        avg_conversion_rate: round2(rate_sum / n),
        avg_response_time: round2(response_sum / n),
        total_leads: saturating_total(records, |r| r.leads_handled),
        total_conversions: saturating_total(records, |r| r.conversions_achieved),
        total_follow_ups: saturating_total(records, |r| r.follow_ups_completed),
    })
}

/// Sum a counter across the roster, clamping at `u64::MAX`.
fn saturating_total(
    records: &[PerformerRecord],
    counter: impl Fn(&PerformerRecord) -> u64,
) -> u64 {
    records
        .iter()
        .map(counter)
        .fold(0u64, |acc, n| acc.saturating_add(n))
}
