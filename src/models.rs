use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// One salesperson's activity counters for the selected period.
///
/// `conversion_rate` is supplied by the backend rather than derived here;
/// see [`crate::metrics::consistency`] for the divergence check.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PerformerRecord {
    pub id: String,
    pub name: String,
    pub leads_handled: u64,
    pub conversions_achieved: u64,
    /// Percentage, 0-100.
    pub conversion_rate: f64,
    pub avg_response_time_hours: f64,
    pub follow_ups_completed: u64,
}

impl PerformerRecord {
    /// Conversion rate implied by the raw counters, or `None` when no
    /// leads were handled.
    pub fn derived_conversion_rate(&self) -> Option<f64> {
        if self.leads_handled == 0 {
            return None;
        }
        Some(self.conversions_achieved as f64 / self.leads_handled as f64 * 100.0)
    }
}

/// Lead counts by conversion outcome.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConversionCounts {
    pub converted: u64,
    pub active: u64,
    pub invalid: u64,
}

impl ConversionCounts {
    /// Sum of all three buckets, widened so it cannot overflow.
    pub fn total(&self) -> u128 {
        self.converted as u128 + self.active as u128 + self.invalid as u128
    }
}

/// A scheduled follow-up (reminder) on a lead.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TaskRecord {
    pub id: String,
    pub scheduled_at: DateTime<Utc>,
    pub is_completed: bool,
    /// Salesperson the follow-up is assigned to.
    pub owner_id: Option<String>,
    pub lead_id: Option<String>,
    pub lead_name: Option<String>,
    pub note: Option<String>,
}

impl TaskRecord {
    /// Incomplete and scheduled strictly before `now`.
    pub fn is_overdue(&self, now: DateTime<Utc>) -> bool {
        !self.is_completed && self.scheduled_at < now
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DailyLeads {
    pub date: NaiveDate,
    pub leads: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusCount {
    pub status: String,
    pub count: u64,
}

/// Headline counters as reported by the backend.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SummaryTotals {
    pub total_leads: u64,
    pub new_leads: u64,
    pub converted_leads: u64,
    pub pending_follow_ups: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Charts {
    pub conversion_breakdown: ConversionCounts,
    pub daily_trends: Vec<DailyLeads>,
    pub leads_by_status: Vec<StatusCount>,
}

/// Validated dashboard payload.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DashboardPayload {
    pub summary: SummaryTotals,
    pub charts: Charts,
    pub performance: Vec<PerformerRecord>,
}
