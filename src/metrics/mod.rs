pub mod breakdown;
pub mod consistency;
pub mod ranking;
pub mod team;
pub mod trend;
pub mod types;

pub use types::*;

pub use breakdown::breakdown;
pub use consistency::check_conversion_rates;
pub use ranking::{rank, rank_by, tier_for, Metric};
pub use team::aggregate;
pub use trend::classify as classify_trend;

/// Relative band around the team average inside which a trend is stable.
pub const TREND_THRESHOLD: f64 = 0.05;

/// At or above `average * HIGH_TIER_FACTOR` a performer is High.
pub const HIGH_TIER_FACTOR: f64 = 1.10;

/// Below `average * LOW_TIER_FACTOR` a performer is Below Avg.
pub const LOW_TIER_FACTOR: f64 = 0.90;
