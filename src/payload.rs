//! Strict parsing of the backend's JSON payloads into validated models.
//!
//! Default policy for absent fields:
//! - performer `name` is required; `id` falls back to the name
//! - performer counters default to 0, `avg_response_time` to 0.0
//! - a missing `conversion_rate` is derived from the counters
//! - missing `summary`, `charts` sections and `performance` default to empty
//! - task `scheduled_at` is required (RFC 3339); `is_completed` defaults to false
//! - a task without `id` is keyed by its list position as `#<index>`
//!
//! Some fields accept an alias (`total_leads` for `leads_handled`,
//! `conversions` for `conversions_achieved`, ...). A record carrying both a
//! field and one of its aliases is ambiguous and rejected as a duplicate.
//!
//! Both bare payloads and the `{ "data": ... }` API envelope are accepted.

use serde::Deserialize;
use serde_json::Value;

use crate::date_util::{parse_instant, round2};
use crate::error::{Error, Result};
use crate::models::{
    Charts, ConversionCounts, DailyLeads, DashboardPayload, PerformerRecord, StatusCount,
    SummaryTotals, TaskRecord,
};

/// Identifiers arrive as either JSON numbers or strings.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawId {
    Num(i64),
    Text(String),
}

impl RawId {
    fn into_string(self) -> String {
        match self {
            RawId::Num(n) => n.to_string(),
            RawId::Text(s) => s,
        }
    }
}

#[derive(Debug, Deserialize)]
struct RawDashboard {
    #[serde(default)]
    summary: SummaryTotals,
    #[serde(default)]
    charts: RawCharts,
    #[serde(default)]
    performance: Vec<RawPerformer>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct RawCharts {
    conversion_breakdown: ConversionCounts,
    daily_trends: Vec<DailyLeads>,
    leads_by_status: Vec<StatusCount>,
}

#[derive(Debug, Deserialize)]
struct RawPerformer {
    id: Option<RawId>,
    name: Option<String>,
    #[serde(alias = "total_leads", alias = "leads")]
    leads_handled: Option<u64>,
    #[serde(alias = "conversions")]
    conversions_achieved: Option<u64>,
    conversion_rate: Option<f64>,
    #[serde(alias = "avg_response_time")]
    avg_response_time_hours: Option<f64>,
    #[serde(alias = "follow_ups")]
    follow_ups_completed: Option<u64>,
}

#[derive(Debug, Deserialize)]
struct RawTask {
    id: Option<RawId>,
    #[serde(alias = "follow_up_date", alias = "reminder_date")]
    scheduled_at: Option<String>,
    #[serde(alias = "completed")]
    is_completed: Option<bool>,
    #[serde(alias = "salesperson_id", alias = "assigned_to")]
    owner_id: Option<RawId>,
    lead_id: Option<RawId>,
    lead_name: Option<String>,
    #[serde(alias = "notes")]
    note: Option<String>,
}

/// Parse and validate a dashboard payload.
pub fn parse_dashboard(json: &str) -> Result<DashboardPayload> {
    let value: Value = serde_json::from_str(json)?;
    let value = unwrap_envelope(value, &["summary", "charts", "performance"]);
    let raw: RawDashboard = serde_json::from_value(value)?;

    let performance = raw
        .performance
        .into_iter()
        .enumerate()
        .map(|(i, p)| validate_performer(i, p))
        .collect::<Result<Vec<_>>>()?;

    Ok(DashboardPayload {
        summary: raw.summary,
        charts: Charts {
            conversion_breakdown: raw.charts.conversion_breakdown,
            daily_trends: raw.charts.daily_trends,
            leads_by_status: raw.charts.leads_by_status,
        },
        performance,
    })
}

/// Parse and validate a follow-up list.
pub fn parse_tasks(json: &str) -> Result<Vec<TaskRecord>> {
    let value: Value = serde_json::from_str(json)?;
    let value = match value {
        Value::Object(mut map) => ["data", "reminders", "follow_ups"]
            .iter()
            .find_map(|k| map.remove(*k))
            .ok_or_else(|| Error::Payload("expected a list of follow-ups".into()))?,
        other => other,
    };
    let raw: Vec<RawTask> = serde_json::from_value(value)?;
    raw.into_iter()
        .enumerate()
        .map(|(i, t)| validate_task(i, t))
        .collect()
}

fn unwrap_envelope(value: Value, own_keys: &[&str]) -> Value {
    match value {
        Value::Object(mut map)
            if map.contains_key("data") && !own_keys.iter().any(|k| map.contains_key(*k)) =>
        {
            map.remove("data").unwrap_or(Value::Null)
        }
        other => other,
    }
}

fn validate_performer(index: usize, raw: RawPerformer) -> Result<PerformerRecord> {
    let name = raw
        .name
        .filter(|n| !n.trim().is_empty())
        .ok_or_else(|| Error::Payload(format!("performance[{index}]: missing name")))?;
    let id = raw.id.map(RawId::into_string).unwrap_or_else(|| name.clone());
    let leads_handled = raw.leads_handled.unwrap_or(0);
    let conversions_achieved = raw.conversions_achieved.unwrap_or(0);

    let conversion_rate = match raw.conversion_rate {
        Some(rate) => check_non_negative(index, "conversion_rate", rate)?,
        None => {
            log::debug!(
                "performance[{index}] ({name}): conversion_rate absent, deriving from counters"
            );
            if leads_handled == 0 {
                0.0
            } else {
                round2(conversions_achieved as f64 / leads_handled as f64 * 100.0)
            }
        }
    };
    let avg_response_time_hours = match raw.avg_response_time_hours {
        Some(h) => check_non_negative(index, "avg_response_time", h)?,
        None => 0.0,
    };

    Ok(PerformerRecord {
        id,
        name,
        leads_handled,
        conversions_achieved,
        conversion_rate,
        avg_response_time_hours,
        follow_ups_completed: raw.follow_ups_completed.unwrap_or(0),
    })
}

fn check_non_negative(index: usize, field: &str, v: f64) -> Result<f64> {
    if v.is_finite() && v >= 0.0 {
        Ok(v)
    } else {
        Err(Error::Payload(format!(
            "performance[{index}]: {field} must be a non-negative number, got {v}"
        )))
    }
}

fn validate_task(index: usize, raw: RawTask) -> Result<TaskRecord> {
    let scheduled = raw
        .scheduled_at
        .ok_or_else(|| Error::Payload(format!("follow_ups[{index}]: missing scheduled_at")))?;
    let scheduled_at = parse_instant(&scheduled)?;

    Ok(TaskRecord {
        id: raw
            .id
            .map(RawId::into_string)
            .unwrap_or_else(|| format!("#{index}")),
        scheduled_at,
        is_completed: raw.is_completed.unwrap_or(false),
        owner_id: raw.owner_id.map(RawId::into_string),
        lead_id: raw.lead_id.map(RawId::into_string),
        lead_name: raw.lead_name,
        note: raw.note,
    })
}
