use super::types::Trend;
use super::TREND_THRESHOLD;

/// Slack for float artifacts such as `100.0 * 1.05 == 105.00000000000001`,
/// so a value sitting exactly on a band edge compares as on the edge.
pub(crate) fn edge_tolerance(bound: f64) -> f64 {
    1e-9 * bound.abs().max(1.0)
}

/// Classify `value` against a baseline `average`.
///
/// With `invert = false` higher is better: `Up` at or above
/// `average * 1.05`, `Down` at or below `average * 0.95`, otherwise
/// `Stable`. With `invert = true` lower is better (response time): the
/// comparison is mirrored, so the team average is tested against the
/// individual figure.
///
/// A zero baseline classifies by sign alone. Non-finite input is
/// `Stable`.
pub fn classify(value: f64, average: f64, invert: bool) -> Trend {
    let (subject, baseline) = if invert {
        (average, value)
    } else {
        (value, average)
    };

    if !subject.is_finite() || !baseline.is_finite() {
        return Trend::Stable;
    }

    if baseline == 0.0 {
        return if subject > 0.0 {
            Trend::Up
        } else if subject < 0.0 {
            Trend::Down
        } else {
            Trend::Stable
        };
    }

    let upper = baseline * (1.0 + TREND_THRESHOLD);
    let lower = baseline * (1.0 - TREND_THRESHOLD);
    if subject >= upper - edge_tolerance(upper) {
        Trend::Up
    } else if subject <= lower + edge_tolerance(lower) {
        Trend::Down
    } else {
        Trend::Stable
    }
}
