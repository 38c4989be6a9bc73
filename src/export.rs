use std::fmt;
use std::str::FromStr;

use chrono::NaiveDate;
use serde::Serialize;

use crate::error::{Error, Result};
use crate::range::{self, ResolvedRange};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ReportType {
    Leads,
    Performance,
}

impl ReportType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ReportType::Leads => "leads",
            ReportType::Performance => "performance",
        }
    }
}

impl FromStr for ReportType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "leads" => Ok(ReportType::Leads),
            "performance" => Ok(ReportType::Performance),
            other => Err(Error::Payload(format!("unknown report type: {other}"))),
        }
    }
}

impl fmt::Display for ReportType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportFormat {
    Pdf,
    Excel,
    Csv,
}

impl ExportFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            ExportFormat::Pdf => "pdf",
            ExportFormat::Excel => "excel",
            ExportFormat::Csv => "csv",
        }
    }

    /// File extension of the downloaded artifact.
    pub fn extension(&self) -> &'static str {
        match self {
            ExportFormat::Pdf => "pdf",
            ExportFormat::Excel => "xlsx",
            ExportFormat::Csv => "csv",
        }
    }
}

impl FromStr for ExportFormat {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "pdf" => Ok(ExportFormat::Pdf),
            "excel" | "xlsx" => Ok(ExportFormat::Excel),
            "csv" => Ok(ExportFormat::Csv),
            other => Err(Error::Payload(format!("unknown export format: {other}"))),
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A report export ready to hand to the export service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExportRequest {
    pub report: ReportType,
    pub format: ExportFormat,
    pub range: ResolvedRange,
}

impl ExportRequest {
    pub fn new(
        report: ReportType,
        format: ExportFormat,
        range_token: &str,
        today: NaiveDate,
    ) -> Self {
        Self {
            report,
            format,
            range: range::resolve(range_token, today),
        }
    }

    /// Suggested download name, e.g. `leads_report_this_month.xlsx`.
    pub fn file_name(&self) -> String {
        format!(
            "{}_report_{}.{}",
            self.report,
            sanitize(self.range.wire_token()),
            self.format.extension()
        )
    }

    /// Query parameters for the export endpoint, in a fixed order.
    pub fn query_params(&self) -> Vec<(&'static str, String)> {
        let mut params = vec![
            ("type", self.report.to_string()),
            ("format", self.format.to_string()),
            ("date_range", self.range.wire_token().to_string()),
        ];
        if let Some(bounds) = self.range.bounds {
            params.push(("start_date", bounds.start.format("%Y-%m-%d").to_string()));
            params.push(("end_date", bounds.end.format("%Y-%m-%d").to_string()));
        }
        params
    }
}

/// Keep unknown pass-through tokens safe to use in a file name.
fn sanitize(token: &str) -> String {
    token
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '_' || c == '-' {
                c
            } else {
                '_'
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 3, 17).unwrap()
    }

    #[test]
    fn test_parse_report_and_format() {
        assert_eq!("Leads".parse::<ReportType>().unwrap(), ReportType::Leads);
        assert_eq!("performance".parse::<ReportType>().unwrap(), ReportType::Performance);
        assert!("invoices".parse::<ReportType>().is_err());

        assert_eq!("PDF".parse::<ExportFormat>().unwrap(), ExportFormat::Pdf);
        assert_eq!("xlsx".parse::<ExportFormat>().unwrap(), ExportFormat::Excel);
        assert!("docx".parse::<ExportFormat>().is_err());
    }

    #[test]
    fn test_file_name() {
        let req = ExportRequest::new(ReportType::Leads, ExportFormat::Excel, "this_month", today());
        assert_eq!(req.file_name(), "leads_report_this_month.xlsx");

        let req = ExportRequest::new(
            ReportType::Performance,
            ExportFormat::Csv,
            "q1/2025",
            today(),
        );
        assert_eq!(req.file_name(), "performance_report_q1_2025.csv");
    }

    #[test]
    fn test_query_params_with_bounds() {
        let req = ExportRequest::new(ReportType::Leads, ExportFormat::Pdf, "last_month", today());
        assert_eq!(req.range.label, "Last month");
        assert_eq!(
            req.query_params(),
            vec![
                ("type", "leads".to_string()),
                ("format", "pdf".to_string()),
                ("date_range", "last_month".to_string()),
                ("start_date", "2025-02-01".to_string()),
                ("end_date", "2025-02-28".to_string()),
            ]
        );
    }

    #[test]
    fn test_query_params_server_side_range() {
        let req = ExportRequest::new(
            ReportType::Performance,
            ExportFormat::Csv,
            "lifetime",
            today(),
        );
        assert_eq!(req.query_params().len(), 3);

        let req = ExportRequest::new(
            ReportType::Performance,
            ExportFormat::Csv,
            "custom_q",
            today(),
        );
        assert!(!req.range.is_known());
        assert_eq!(req.range.label, "custom_q");
        assert_eq!(req.query_params()[2], ("date_range", "custom_q".to_string()));
    }

    #[test]
    fn test_serialize() {
        let req = ExportRequest::new(ReportType::Leads, ExportFormat::Excel, "today", today());
        let json = serde_json::to_value(&req).unwrap();
        assert_eq!(json["report"], "leads");
        assert_eq!(json["format"], "excel");
        assert_eq!(json["range"]["token"], "today");
        assert_eq!(json["range"]["bounds"]["start"], "2025-03-17");
    }
}
