//! Rule records normalized from spreadsheet rows.

use chrono::{DateTime, Days, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use crate::calendar::DateRange;
use crate::repetition::{RepetitionKind, parse_detail};

/// One raw input row: column label to cell value.
pub type RuleRow = serde_json::Map<String, Value>;

/// Text date layouts accepted in date cells.
const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d", "%Y.%m.%d"];

/// Date-time layouts without an offset; the time of day is dropped.
const DATE_TIME_FORMATS: &[&str] = &[
    "%Y-%m-%d %H:%M",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%dT%H:%M:%S",
    "%Y/%m/%d %H:%M",
    "%Y/%m/%d %H:%M:%S",
];

/// Largest spreadsheet serial date (9999-12-31).
const MAX_SERIAL: f64 = 2_958_465.0;

/// Course end used when a row leaves the end date blank.
pub fn open_end() -> NaiveDate {
    NaiveDate::from_ymd_opt(2099, 12, 31).unwrap_or(NaiveDate::MAX)
}

/// Reasons a row cannot become a [`RuleRecord`].
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RuleDefect {
    #[error("missing topic")]
    MissingTopic,

    #[error("missing course start date")]
    MissingCourseStart,

    #[error("unparsable {field}: {value}")]
    InvalidDate { field: &'static str, value: String },
}

/// Column labels for each rule field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColumnMap {
    pub topic: String,
    pub teacher: String,
    pub repetition: String,
    pub detail: String,
    pub start_date: String,
    pub end_date: String,
    pub total_sessions: String,
    pub duration_days: String,
}

impl Default for ColumnMap {
    fn default() -> Self {
        Self {
            topic: "topic".to_string(),
            teacher: "teacher".to_string(),
            repetition: "repetition".to_string(),
            detail: "detail".to_string(),
            start_date: "start_date".to_string(),
            end_date: "end_date".to_string(),
            total_sessions: "total_sessions".to_string(),
            duration_days: "duration_days".to_string(),
        }
    }
}

impl ColumnMap {
    /// The topic of a row, if present. Used for diagnostics on rejected rows.
    pub fn topic_of(&self, row: &RuleRow) -> Option<String> {
        cell(row, &self.topic)
    }
}

/// A normalized, read-only course rule.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleRecord {
    pub topic: String,
    #[serde(default)]
    pub teacher: String,
    pub repetition_kind: RepetitionKind,
    #[serde(default)]
    pub repetition_detail: Vec<u32>,
    pub course_start: NaiveDate,
    pub course_end: NaiveDate,
    /// Cap on emitted sessions. `None` means unbounded.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_sessions: Option<u32>,
    #[serde(default = "default_duration_days")]
    pub session_duration_days: u32,
}

const fn default_duration_days() -> u32 {
    1
}

impl RuleRecord {
    /// Normalizes a raw row.
    ///
    /// Blank or unparsable optional cells fall back to their defaults; only a
    /// missing topic, a missing start date, or an unparsable date reject the row.
    pub fn from_row(row: &RuleRow, columns: &ColumnMap) -> Result<Self, RuleDefect> {
        let topic = columns.topic_of(row).ok_or(RuleDefect::MissingTopic)?;

        let start_text = cell(row, &columns.start_date)
            .ok_or(RuleDefect::MissingCourseStart)?;
        let course_start = parse_date(&start_text).ok_or(RuleDefect::InvalidDate {
            field: "course start",
            value: start_text,
        })?;

        let course_end = match cell(row, &columns.end_date) {
            Some(text) => parse_date(&text).ok_or(RuleDefect::InvalidDate {
                field: "course end",
                value: text,
            })?,
            None => open_end(),
        };

        let repetition_kind = cell(row, &columns.repetition)
            .map_or(RepetitionKind::Once, |label| RepetitionKind::from_label(&label));

        let repetition_detail = cell(row, &columns.detail)
            .map(|text| parse_detail(&text))
            .unwrap_or_default();

        let total_sessions = cell(row, &columns.total_sessions)
            .and_then(|text| parse_count(&text));

        let session_duration_days = cell(row, &columns.duration_days)
            .and_then(|text| parse_count(&text))
            .unwrap_or_else(default_duration_days);

        Ok(Self {
            topic,
            teacher: cell(row, &columns.teacher).unwrap_or_default(),
            repetition_kind,
            repetition_detail,
            course_start,
            course_end,
            total_sessions,
            session_duration_days,
        })
    }

    /// The interval the generator walks.
    pub const fn course_range(&self) -> DateRange {
        DateRange::new(self.course_start, self.course_end)
    }
}

/// Reads a column as trimmed, non-empty text.
fn cell(row: &RuleRow, column: &str) -> Option<String> {
    row.get(column).and_then(cell_text)
}

/// Renders a cell as text. Integral numbers drop any `.0` suffix.
fn cell_text(value: &Value) -> Option<String> {
    let text = match value {
        Value::String(s) => s.trim().to_string(),
        Value::Number(n) => match (n.as_i64(), n.as_f64()) {
            (Some(i), _) => i.to_string(),
            (None, Some(f)) if f.fract() == 0.0 => format!("{f:.0}"),
            _ => n.to_string(),
        },
        _ => return None,
    };
    (!text.is_empty()).then_some(text)
}

/// Parses a positive count. Zero and garbage are treated as absent.
fn parse_count(text: &str) -> Option<u32> {
    text.trim().parse::<u32>().ok().filter(|n| *n > 0)
}

/// Parses a date cell.
///
/// Supports:
/// - `2025-01-06`, `2025/01/06`, `2025.01.06`
/// - `2025-01-06 09:00`, `2025-01-06T09:00:00` and RFC 3339 timestamps, keeping only the date
/// - Spreadsheet serial numbers such as `45663` (days since 1899-12-30, up to 9999-12-31)
pub fn parse_date(text: &str) -> Option<NaiveDate> {
    let text = text.trim();

    if let Some(date) = DATE_FORMATS
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(text, format).ok())
    {
        return Some(date);
    }

    if let Some(dt) = DATE_TIME_FORMATS
        .iter()
        .find_map(|format| NaiveDateTime::parse_from_str(text, format).ok())
    {
        return Some(dt.date());
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
        return Some(dt.date_naive());
    }

    // Digits like 20250117 are not serials; anything past 9999-12-31 is rejected.
    let serial = text
        .parse::<f64>()
        .ok()
        .filter(|n| n.is_finite() && (1.0..MAX_SERIAL + 1.0).contains(n))?;
    #[expect(
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss,
        reason = "serial is within 1..=MAX_SERIAL; time of day is discarded"
    )]
    let days = serial.floor() as u64;
    // Day zero of spreadsheet serial dates.
    NaiveDate::from_ymd_opt(1899, 12, 30)?.checked_add_days(Days::new(days))
}
