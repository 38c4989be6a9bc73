use crate::models::PerformerRecord;

use super::trend::edge_tolerance;
use super::types::{RankedPerformer, TeamStats, Tier};
use super::{HIGH_TIER_FACTOR, LOW_TIER_FACTOR};

/// Metric a roster can be ranked by. All are higher-is-better.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Metric {
    #[default]
    ConversionRate,
    LeadsHandled,
    ConversionsAchieved,
    FollowUpsCompleted,
}

impl Metric {
    pub fn value(&self, record: &PerformerRecord) -> f64 {
        match self {
            Metric::ConversionRate => record.conversion_rate,
            Metric::LeadsHandled => record.leads_handled as f64,
            Metric::ConversionsAchieved => record.conversions_achieved as f64,
            Metric::FollowUpsCompleted => record.follow_ups_completed as f64,
        }
    }

    /// Per-member team average of this metric.
    pub fn team_average(&self, stats: &TeamStats) -> f64 {
        let per_member = |total: u64| {
            if stats.member_count == 0 {
                0.0
            } else {
                total as f64 / stats.member_count as f64
            }
        };
        match self {
            Metric::ConversionRate => stats.avg_conversion_rate,
            Metric::LeadsHandled => per_member(stats.total_leads),
            Metric::ConversionsAchieved => per_member(stats.total_conversions),
            Metric::FollowUpsCompleted => per_member(stats.total_follow_ups),
        }
    }
}

/// Tier of `value` against `team_average`: High at or above 110%,
/// Below Avg under 90%, Average in between (90% itself is Average).
pub fn tier_for(value: f64, team_average: f64) -> Tier {
    let high = team_average * HIGH_TIER_FACTOR;
    let low = team_average * LOW_TIER_FACTOR;
    if value >= high - edge_tolerance(high) {
        Tier::High
    } else if value < low - edge_tolerance(low) {
        Tier::BelowAverage
    } else {
        Tier::Average
    }
}

/// Sort descending by `metric` and tier each performer.
///
/// Equal values keep their input order.
pub fn rank(
    records: &[PerformerRecord],
    metric: Metric,
    team_average: f64,
) -> Vec<RankedPerformer> {
    rank_by(records, |r| metric.value(r), team_average)
}

/// Like [`rank`] with an arbitrary metric selector.
pub fn rank_by<F>(
    records: &[PerformerRecord],
    selector: F,
    team_average: f64,
) -> Vec<RankedPerformer>
where
    F: Fn(&PerformerRecord) -> f64,
{
    let mut scored: Vec<(f64, &PerformerRecord)> =
        records.iter().map(|r| (selector(r), r)).collect();
    // sort_by is stable
    scored.sort_by(|a, b| b.0.total_cmp(&a.0));

    scored
        .into_iter()
        .enumerate()
        .map(|(i, (metric_value, record))| RankedPerformer {
            rank: i + 1,
            record: record.clone(),
            metric_value,
            tier: tier_for(metric_value, team_average),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rec(name: &str, leads: u64, rate: f64) -> PerformerRecord {
        PerformerRecord {
            id: name.into(),
            name: name.into(),
            leads_handled: leads,
            conversions_achieved: 0,
            conversion_rate: rate,
            avg_response_time_hours: 1.0,
            follow_ups_completed: 0,
        }
    }

    fn names(ranked: &[RankedPerformer]) -> Vec<&str> {
        ranked.iter().map(|r| r.record.name.as_str()).collect()
    }

    #[test]
    fn test_tier_boundaries() {
        assert_eq!(tier_for(110.0, 100.0), Tier::High);
        assert_eq!(tier_for(109.99, 100.0), Tier::Average);
        assert_eq!(tier_for(90.0, 100.0), Tier::Average);
        assert_eq!(tier_for(89.99, 100.0), Tier::BelowAverage);
        assert_eq!(tier_for(66.0, 60.0), Tier::High);
        assert_eq!(tier_for(54.0, 60.0), Tier::Average);
    }

    #[test]
    fn test_tier_zero_average() {
        assert_eq!(tier_for(0.0, 0.0), Tier::High);
        assert_eq!(tier_for(5.0, 0.0), Tier::High);
    }

    #[test]
    fn test_sorted_descending_with_ranks() {
        let ranked = rank(
            &[rec("A", 1, 40.0), rec("B", 1, 80.0), rec("C", 1, 60.0)],
            Metric::ConversionRate,
            60.0,
        );
        assert_eq!(names(&ranked), vec!["B", "C", "A"]);
        assert_eq!(
            ranked.iter().map(|r| r.rank).collect::<Vec<_>>(),
            vec![1, 2, 3]
        );
        assert_eq!(ranked[0].tier, Tier::High);
        assert_eq!(ranked[1].tier, Tier::Average);
        assert_eq!(ranked[2].tier, Tier::BelowAverage);
    }

    #[test]
    fn test_ties_keep_input_order() {
        let ranked = rank(
            &[
                rec("first", 1, 50.0),
                rec("top", 1, 70.0),
                rec("second", 1, 50.0),
                rec("third", 1, 50.0),
            ],
            Metric::ConversionRate,
            55.0,
        );
        assert_eq!(names(&ranked), vec!["top", "first", "second", "third"]);
    }

    #[test]
    fn test_rank_by_other_metric() {
        let records = [rec("A", 5, 90.0), rec("B", 20, 10.0)];
        let ranked = rank(&records, Metric::LeadsHandled, 12.5);
        assert_eq!(names(&ranked), vec!["B", "A"]);
        assert_eq!(ranked[0].metric_value, 20.0);
        assert_eq!(ranked[0].tier, Tier::High);
        assert_eq!(ranked[1].tier, Tier::BelowAverage);
    }

    #[test]
    fn test_rank_by_closure() {
        let records = [rec("A", 5, 90.0), rec("B", 20, 10.0)];
        let ranked = rank_by(&records, |r| -r.conversion_rate, -50.0);
        assert_eq!(names(&ranked), vec!["B", "A"]);
    }

    #[test]
    fn test_team_average_for_counts() {
        let stats = TeamStats {
            member_count: 4,
            avg_conversion_rate: 42.5,
            avg_response_time: 1.0,
            total_leads: 10,
            total_conversions: 6,
            total_follow_ups: 0,
        };
        assert_eq!(Metric::ConversionRate.team_average(&stats), 42.5);
        assert_eq!(Metric::LeadsHandled.team_average(&stats), 2.5);
        assert_eq!(Metric::ConversionsAchieved.team_average(&stats), 1.5);
        assert_eq!(Metric::FollowUpsCompleted.team_average(&stats), 0.0);
    }

    #[test]
    fn test_empty_roster() {
        assert!(rank(&[], Metric::ConversionRate, 0.0).is_empty());
    }
}
