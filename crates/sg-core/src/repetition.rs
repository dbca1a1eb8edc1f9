//! Repetition patterns and the per-day occurrence predicate.

use std::fmt;

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

/// Length of the parity period used by [`RepetitionKind::Biweekly`].
const DAYS_PER_WEEK: i64 = 7;

/// The pattern family governing which dates are occurrences of a rule.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RepetitionKind {
    /// A single session on the rule's start date.
    Once,
    /// Every week on the listed weekdays (1 = Monday .. 7 = Sunday).
    Weekly,
    /// Like `Weekly`, but only in even weeks counted from the rule's start.
    Biweekly,
    /// Every month on the listed days of the month.
    Monthly,
    /// A label no pattern family claims. Never matches.
    Unrecognized(String),
}

impl RepetitionKind {
    /// Interprets a spreadsheet label.
    ///
    /// Accepts English names case-insensitively and the Chinese labels used by
    /// the course spreadsheets. Unknown labels become [`Self::Unrecognized`].
    pub fn from_label(label: &str) -> Self {
        let trimmed = label.trim();
        match trimmed.to_lowercase().as_str() {
            "once" | "single" | "one-off" | "单次" | "一次" => Self::Once,
            "weekly" | "every week" | "每周" => Self::Weekly,
            "biweekly" | "bi-weekly" | "fortnightly" | "every other week" | "双周" | "隔周" => {
                Self::Biweekly
            }
            "monthly" | "every month" | "每月" => Self::Monthly,
            _ => Self::Unrecognized(trimmed.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Once => "once",
            Self::Weekly => "weekly",
            Self::Biweekly => "biweekly",
            Self::Monthly => "monthly",
            Self::Unrecognized(label) => label,
        }
    }
}

impl fmt::Display for RepetitionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Splits a detail cell such as `"1,3"`, `"1，3"` or `"1 3"` into numbers.
///
/// Tokens that are not non-negative integers are dropped. Range checking is
/// left to [`matches`]: an out-of-range value simply never matches.
pub fn parse_detail(text: &str) -> Vec<u32> {
    text.split(|c: char| matches!(c, ',' | '，' | '、' | ';' | '；') || c.is_whitespace())
        .filter_map(|token| token.trim().parse::<u32>().ok())
        .collect()
}

/// Decides whether `candidate` is an occurrence of a rule.
///
/// `rule_start` anchors `Once` and the week parity of `Biweekly`.
pub fn matches(
    kind: &RepetitionKind,
    detail: &[u32],
    candidate: NaiveDate,
    rule_start: NaiveDate,
) -> bool {
    match kind {
        RepetitionKind::Once => candidate == rule_start,
        RepetitionKind::Weekly => on_listed_weekday(detail, candidate),
        RepetitionKind::Biweekly => {
            on_listed_weekday(detail, candidate) && is_on_week(candidate, rule_start)
        }
        RepetitionKind::Monthly => detail.contains(&candidate.day()),
        RepetitionKind::Unrecognized(_) => false,
    }
}

fn on_listed_weekday(detail: &[u32], candidate: NaiveDate) -> bool {
    // Monday = 1 .. Sunday = 7.
    detail.contains(&candidate.weekday().number_from_monday())
}

/// Whole weeks elapsed since `rule_start`, floored, must be even.
fn is_on_week(candidate: NaiveDate, rule_start: NaiveDate) -> bool {
    let elapsed = (candidate - rule_start).num_days();
    elapsed.div_euclid(DAYS_PER_WEEK) % 2 == 0
}
