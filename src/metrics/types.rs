use std::fmt;

use serde::Serialize;

use crate::models::PerformerRecord;

/// Conversion outcome bucket.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Converted,
    Active,
    Invalid,
}

impl Category {
    pub fn label(&self) -> &'static str {
        match self {
            Category::Converted => "Converted",
            Category::Active => "Active",
            Category::Invalid => "Invalid",
        }
    }
}

/// One non-empty slice of the conversion breakdown.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BreakdownSlice {
    pub category: Category,
    pub value: u64,
    /// Share of the total, rounded half-up on its own.
    pub percentage: u32,
}

/// Team-wide aggregates over a performer roster.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TeamStats {
    pub member_count: usize,
    /// Mean of the members' conversion rates, rounded to 2 decimals.
    pub avg_conversion_rate: f64,
    /// Mean response time in hours, rounded to 2 decimals.
    pub avg_response_time: f64,
    pub total_leads: u64,
    pub total_conversions: u64,
    pub total_follow_ups: u64,
}

/// Direction of a metric relative to the team baseline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Trend {
    Up,
    Down,
    Stable,
}

impl fmt::Display for Trend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Trend::Up => "up",
            Trend::Down => "down",
            Trend::Stable => "stable",
        })
    }
}

/// Performance tier relative to the team average.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Tier {
    High,
    Average,
    #[serde(rename = "Below Avg")]
    BelowAverage,
}

impl Tier {
    pub fn label(&self) -> &'static str {
        match self {
            Tier::High => "High",
            Tier::Average => "Average",
            Tier::BelowAverage => "Below Avg",
        }
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A performer with the metric it was ranked by and its tier.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedPerformer {
    /// 1-based position after sorting.
    pub rank: usize,
    pub record: PerformerRecord,
    pub metric_value: f64,
    pub tier: Tier,
}

/// A performer whose supplied conversion rate disagrees with its counters.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RateWarning {
    pub performer_id: String,
    pub performer_name: String,
    pub supplied_rate: f64,
    pub derived_rate: f64,
}

impl fmt::Display for RateWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: reported conversion rate {:.2}% but counters imply {:.2}%",
            self.performer_name, self.supplied_rate, self.derived_rate
        )
    }
}
