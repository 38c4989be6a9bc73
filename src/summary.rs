use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::config::Config;
use crate::error::{Error, Result};
use crate::metrics::{self, BreakdownSlice, RankedPerformer, RateWarning, TeamStats, Trend};
use crate::models::{DailyLeads, DashboardPayload, StatusCount, SummaryTotals, TaskRecord};
use crate::tasks;

/// Everything the dashboard view renders, derived from one payload.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardSummary {
    pub totals: SummaryTotals,
    pub conversion_breakdown: Vec<BreakdownSlice>,
    pub daily_trends: Vec<DailyLeads>,
    pub leads_by_status: Vec<StatusCount>,
    /// `None` when the roster is empty.
    pub performance: Option<PerformanceSection>,
    pub follow_ups: FollowUpSection,
    pub warnings: Vec<RateWarning>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PerformanceSection {
    pub team: TeamStats,
    pub performers: Vec<PerformerRow>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PerformerRow {
    #[serde(flatten)]
    pub ranked: RankedPerformer,
    /// Conversion rate against the team average.
    pub conversion_trend: Trend,
    /// Response time against the team average; lower is better.
    pub response_time_trend: Trend,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FollowUpSection {
    pub evaluated_at: DateTime<Utc>,
    pub overdue_count: usize,
    pub upcoming_count: usize,
    pub completed_count: usize,
    pub overdue: Vec<TaskRecord>,
    /// Soonest-listed upcoming follow-ups, capped for display.
    pub upcoming: Vec<TaskRecord>,
}

/// Composes the metric calculators into a [`DashboardSummary`].
#[derive(Debug, Clone)]
pub struct SummaryBuilder {
    upcoming_limit: usize,
    rate_tolerance: f64,
}

impl Default for SummaryBuilder {
    fn default() -> Self {
        Self::from_config(&Config::default())
    }
}

impl SummaryBuilder {
    pub fn from_config(config: &Config) -> Self {
        Self {
            upcoming_limit: config.upcoming_limit,
            rate_tolerance: config.rate_tolerance,
        }
    }

    pub fn with_upcoming_limit(mut self, limit: usize) -> Self {
        self.upcoming_limit = limit;
        self
    }

    /// Build the summary for `payload` and `follow_ups` as of `now`.
    pub fn build(
        &self,
        payload: &DashboardPayload,
        follow_ups: &[TaskRecord],
        now: DateTime<Utc>,
    ) -> Result<DashboardSummary> {
        let performance = match metrics::aggregate(&payload.performance) {
            Ok(team) => Some(performance_section(payload, team)),
            Err(Error::EmptyInput(reason)) => {
                log::debug!("No performance section: {reason}");
                None
            }
            Err(e) => return Err(e),
        };

        let partition = tasks::classify(follow_ups, now);

        Ok(DashboardSummary {
            totals: payload.summary.clone(),
            conversion_breakdown: metrics::breakdown(&payload.charts.conversion_breakdown),
            daily_trends: payload.charts.daily_trends.clone(),
            leads_by_status: payload.charts.leads_by_status.clone(),
            performance,
            follow_ups: FollowUpSection {
                evaluated_at: now,
                overdue_count: partition.overdue.len(),
                upcoming_count: partition.upcoming.len(),
                completed_count: partition.completed.len(),
                upcoming: partition.upcoming_preview(self.upcoming_limit).to_vec(),
                overdue: partition.overdue,
            },
            warnings: metrics::check_conversion_rates(&payload.performance, self.rate_tolerance),
        })
    }
}

fn performance_section(payload: &DashboardPayload, team: TeamStats) -> PerformanceSection {
    let metric = metrics::Metric::ConversionRate;
    let performers = metrics::rank(&payload.performance, metric, metric.team_average(&team))
        .into_iter()
        .map(|ranked| PerformerRow {
            conversion_trend: metrics::classify_trend(
                ranked.record.conversion_rate,
                team.avg_conversion_rate,
                false,
            ),
            response_time_trend: metrics::classify_trend(
                ranked.record.avg_response_time_hours,
                team.avg_response_time,
                true,
            ),
            ranked,
        })
        .collect();
    PerformanceSection { team, performers }
}
