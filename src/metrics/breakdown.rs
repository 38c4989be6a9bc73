use crate::date_util::round_half_up;
use crate::models::ConversionCounts;

use super::types::{BreakdownSlice, Category};

/// Percentage share of each non-empty conversion category.
///
/// An all-zero input yields an empty breakdown. Each percentage is rounded
/// independently, so the shares may add up to 99 or 101.
pub fn breakdown(counts: &ConversionCounts) -> Vec<BreakdownSlice> {
    let total = counts.total();
    if total == 0 {
        return Vec::new();
    }

    [
        (Category::Converted, counts.converted),
        (Category::Active, counts.active),
        (Category::Invalid, counts.invalid),
    ]
    .into_iter()
    .filter(|&(_, value)| value > 0)
    .map(|(category, value)| BreakdownSlice {
        category,
        value,
        percentage: round_half_up(value as f64 * 100.0 / total as f64) as u32,
    })
    .collect()
}
