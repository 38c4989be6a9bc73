use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::date_util::{days_before, first_of_month, last_day_of_month, start_of_week};
use crate::error::{Error, Result};

/// A symbolic date range understood by the reporting backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DateRangeToken {
    #[serde(rename = "today")]
    Today,
    #[serde(rename = "yesterday")]
    Yesterday,
    #[serde(rename = "last_7_days")]
    Last7Days,
    #[serde(rename = "this_week")]
    ThisWeek,
    #[serde(rename = "last_week")]
    LastWeek,
    #[serde(rename = "last_30_days")]
    Last30Days,
    #[serde(rename = "this_month")]
    ThisMonth,
    #[serde(rename = "last_month")]
    LastMonth,
    #[serde(rename = "year_to_date")]
    YearToDate,
    #[serde(rename = "lifetime")]
    Lifetime,
}

/// Inclusive calendar window.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    pub fn days(&self) -> i64 {
        (self.end - self.start).num_days() + 1
    }

    pub fn contains(&self, d: NaiveDate) -> bool {
        d >= self.start && d <= self.end
    }
}

impl DateRangeToken {
    pub const ALL: [DateRangeToken; 10] = [
        DateRangeToken::Today,
        DateRangeToken::Yesterday,
        DateRangeToken::Last7Days,
        DateRangeToken::ThisWeek,
        DateRangeToken::LastWeek,
        DateRangeToken::Last30Days,
        DateRangeToken::ThisMonth,
        DateRangeToken::LastMonth,
        DateRangeToken::YearToDate,
        DateRangeToken::Lifetime,
    ];

    /// Parse a wire token. Matching is case-insensitive and ignores
    /// surrounding whitespace.
    pub fn parse(s: &str) -> Result<Self> {
        let normalized = s.trim().to_lowercase();
        Self::ALL
            .into_iter()
            .find(|t| t.as_str() == normalized)
            .ok_or_else(|| Error::UnknownRangeToken(s.to_string()))
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            DateRangeToken::Today => "today",
            DateRangeToken::Yesterday => "yesterday",
            DateRangeToken::Last7Days => "last_7_days",
            DateRangeToken::ThisWeek => "this_week",
            DateRangeToken::LastWeek => "last_week",
            DateRangeToken::Last30Days => "last_30_days",
            DateRangeToken::ThisMonth => "this_month",
            DateRangeToken::LastMonth => "last_month",
            DateRangeToken::YearToDate => "year_to_date",
            DateRangeToken::Lifetime => "lifetime",
        }
    }

    /// Human label shown in the export dialog and report headers.
    pub fn label(&self) -> &'static str {
        match self {
            DateRangeToken::Today => "Today",
            DateRangeToken::Yesterday => "Yesterday",
            DateRangeToken::Last7Days => "Last 7 days",
            DateRangeToken::ThisWeek => "This week",
            DateRangeToken::LastWeek => "Last week",
            DateRangeToken::Last30Days => "Last 30 days",
            DateRangeToken::ThisMonth => "This month",
            DateRangeToken::LastMonth => "Last month",
            DateRangeToken::YearToDate => "Year to date",
            DateRangeToken::Lifetime => "Lifetime",
        }
    }

    /// Concrete window relative to `today`, or `None` when the backend
    /// computes the window itself.
    ///
    /// Rolling windows include `today`; "this" windows run to `today`;
    /// "last" windows are complete calendar weeks/months.
    pub fn bounds(&self, today: NaiveDate) -> Option<DateRange> {
        let (start, end) = match self {
            DateRangeToken::Today => (today, today),
            DateRangeToken::Yesterday => {
                let y = days_before(today, 1);
                (y, y)
            }
            DateRangeToken::Last7Days => (days_before(today, 6), today),
            DateRangeToken::ThisWeek => (start_of_week(today), today),
            DateRangeToken::LastWeek => {
                let start = days_before(start_of_week(today), 7);
                (start, days_before(start_of_week(today), 1))
            }
            DateRangeToken::Last30Days => (days_before(today, 29), today),
            DateRangeToken::ThisMonth => (first_of_month(today), today),
            DateRangeToken::LastMonth => {
                let end = days_before(first_of_month(today), 1);
                (first_of_month(end), end)
            }
            DateRangeToken::YearToDate => {
                let start = NaiveDate::from_ymd_opt(today.year(), 1, 1)?;
                (start, today)
            }
            DateRangeToken::Lifetime => return None,
        };
        Some(DateRange { start, end })
    }

    /// Full calendar window for month-shaped tokens, used when a report
    /// needs the whole month rather than month-to-date.
    pub fn full_month(&self, today: NaiveDate) -> Option<DateRange> {
        let anchor = match self {
            DateRangeToken::ThisMonth => today,
            DateRangeToken::LastMonth => days_before(first_of_month(today), 1),
            _ => return None,
        };
        Some(DateRange {
            start: first_of_month(anchor),
            end: last_day_of_month(anchor.year(), anchor.month())?,
        })
    }
}

impl FromStr for DateRangeToken {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl fmt::Display for DateRangeToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of resolving a raw token string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedRange {
    /// The token exactly as the caller supplied it.
    pub raw: String,
    /// `None` when the token is not in the known set.
    pub token: Option<DateRangeToken>,
    pub label: String,
    pub bounds: Option<DateRange>,
}

impl ResolvedRange {
    pub fn is_known(&self) -> bool {
        self.token.is_some()
    }

    /// Token string to hand to the backend.
    pub fn wire_token(&self) -> &str {
        match self.token {
            Some(t) => t.as_str(),
            None => &self.raw,
        }
    }
}

/// Resolve a token to its label and bounds relative to `today`.
///
/// Unknown tokens do not fail: the raw string becomes the label and the
/// bounds stay unresolved so the backend can interpret it.
pub fn resolve(raw: &str, today: NaiveDate) -> ResolvedRange {
    match DateRangeToken::parse(raw) {
        Ok(token) => ResolvedRange {
            raw: raw.to_string(),
            token: Some(token),
            label: token.label().to_string(),
            bounds: token.bounds(today),
        },
        Err(_) => {
            log::warn!("Unknown date range token '{raw}', passing through unresolved");
            ResolvedRange {
                raw: raw.to_string(),
                token: None,
                label: raw.to_string(),
                bounds: None,
            }
        }
    }
}

/// Resolve against the local calendar date.
pub fn resolve_now(raw: &str) -> ResolvedRange {
    resolve(raw, chrono::Local::now().date_naive())
}

/// Label lookup only; never touches the clock.
pub fn label_for(raw: &str) -> String {
    match DateRangeToken::parse(raw) {
        Ok(token) => token.label().to_string(),
        Err(_) => raw.to_string(),
    }
}
