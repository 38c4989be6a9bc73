use crate::models::PerformerRecord;

use super::types::RateWarning;

/// Flag performers whose supplied conversion rate differs from
/// `100 * conversions / leads` by more than `tolerance` percentage points.
///
/// Non-fatal: the supplied rate is still used downstream. A performer with
/// no leads is checked against an implied rate of 0.
pub fn check_conversion_rates(records: &[PerformerRecord], tolerance: f64) -> Vec<RateWarning> {
    records
        .iter()
        .filter_map(|r| {
            let derived = r.derived_conversion_rate().unwrap_or(0.0);
            if (r.conversion_rate - derived).abs() <= tolerance {
                return None;
            }
            let warning = RateWarning {
                performer_id: r.id.clone(),
                performer_name: r.name.clone(),
                supplied_rate: r.conversion_rate,
                derived_rate: derived,
            };
            log::warn!("Conversion rate mismatch for {warning}");
            Some(warning)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rec(name: &str, leads: u64, conv: u64, rate: f64) -> PerformerRecord {
        PerformerRecord {
            id: name.into(),
            name: name.into(),
            leads_handled: leads,
            conversions_achieved: conv,
            conversion_rate: rate,
            avg_response_time_hours: 0.0,
            follow_ups_completed: 0,
        }
    }

    #[test]
    fn test_consistent_rates_pass() {
        let warnings = check_conversion_rates(
            &[rec("A", 10, 5, 50.0), rec("B", 3, 1, 33.33), rec("C", 0, 0, 0.0)],
            1.0,
        );
        assert!(warnings.is_empty());
    }

    #[test]
    fn test_divergent_rate_flagged() {
        let warnings = check_conversion_rates(&[rec("A", 10, 5, 50.0), rec("B", 10, 7, 40.0)], 1.0);
        assert_eq!(warnings.len(), 1);
        assert_eq!(warnings[0].performer_name, "B");
        assert_eq!(warnings[0].supplied_rate, 40.0);
        assert_eq!(warnings[0].derived_rate, 70.0);
        assert!(warnings[0].to_string().contains("70.00%"));
    }

    #[test]
    fn test_rate_without_leads_flagged() {
        let warnings = check_conversion_rates(&[rec("A", 0, 0, 25.0)], 1.0);
        assert_eq!(warnings.len(), 1);
        assert_eq!(warnings[0].derived_rate, 0.0);
    }

    #[test]
    fn test_tolerance_is_inclusive() {
        let warnings = check_conversion_rates(&[rec("A", 10, 5, 51.0)], 1.0);
        assert!(warnings.is_empty());
    }
}
