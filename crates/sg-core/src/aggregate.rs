//! Expanding whole rule sets.
//!
//! Rules are expanded in parallel, then concatenated in input order, so the
//! output is identical to a sequential walk: sessions grouped by rule, and by
//! ascending start date within a rule.

use chrono::NaiveDate;
use rayon::prelude::*;
use thiserror::Error;

use crate::rule::{ColumnMap, RuleDefect, RuleRecord, RuleRow};
use crate::session::{ExpansionOptions, SessionRecord, expand};

/// Why a row contributed no sessions.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SkipReason {
    #[error(transparent)]
    Defect(#[from] RuleDefect),

    #[error("course starts {start} after it ends {end}")]
    InvertedRange { start: NaiveDate, end: NaiveDate },
}

/// A row that was dropped during expansion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedRule {
    /// 0-based position in the input.
    pub row: usize,
    pub topic: Option<String>,
    pub reason: SkipReason,
}

/// A usable rule whose pattern matched no date in its interval.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmptyRule {
    /// 0-based position in the input.
    pub row: usize,
    pub topic: String,
    pub repetition: String,
}

/// Result of expanding raw rows, with diagnostics for dropped rows.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Expansion {
    pub sessions: Vec<SessionRecord>,
    pub skipped: Vec<SkippedRule>,
    /// Usable rules that produced no sessions, e.g. a misspelled repetition label.
    pub empty: Vec<EmptyRule>,
    /// Rows that normalized into a usable rule.
    pub rules_expanded: usize,
}

/// Expands each rule in parallel, keeping one session list per rule in input order.
fn expand_each(rules: &[RuleRecord], options: &ExpansionOptions) -> Vec<Vec<SessionRecord>> {
    rules
        .par_iter()
        .map(|rule| expand(rule, options))
        .collect()
}

/// Expands every rule and concatenates the results in input order.
pub fn expand_all(rules: &[RuleRecord], options: &ExpansionOptions) -> Vec<SessionRecord> {
    expand_each(rules, options).into_iter().flatten().collect()
}

/// Normalizes raw rows and expands the usable ones.
///
/// Defective rows never abort the run; each one is reported in
/// [`Expansion::skipped`] and logged at debug level.
pub fn expand_rows(
    rows: &[RuleRow],
    columns: &ColumnMap,
    options: &ExpansionOptions,
) -> Expansion {
    let mut rules = Vec::with_capacity(rows.len());
    let mut rule_rows = Vec::with_capacity(rows.len());
    let mut skipped = Vec::new();

    for (idx, row) in rows.iter().enumerate() {
        let reason = match RuleRecord::from_row(row, columns) {
            Ok(rule) if rule.course_range().is_empty() => SkipReason::InvertedRange {
                start: rule.course_start,
                end: rule.course_end,
            },
            Ok(rule) => {
                rules.push(rule);
                rule_rows.push(idx);
                continue;
            }
            Err(defect) => defect.into(),
        };

        let topic = columns.topic_of(row);
        tracing::debug!(row = idx, topic = ?topic, reason = %reason, "skipping rule");
        skipped.push(SkippedRule {
            row: idx,
            topic,
            reason,
        });
    }

    let mut sessions = Vec::new();
    let mut empty = Vec::new();
    for ((rule, row), expanded) in rules
        .iter()
        .zip(rule_rows)
        .zip(expand_each(&rules, options))
    {
        if expanded.is_empty() {
            tracing::debug!(
                row,
                topic = %rule.topic,
                repetition = %rule.repetition_kind,
                detail = ?rule.repetition_detail,
                "rule produced no sessions"
            );
            empty.push(EmptyRule {
                row,
                topic: rule.topic.clone(),
                repetition: rule.repetition_kind.to_string(),
            });
        }
        sessions.extend(expanded);
    }

    tracing::debug!(
        rules = rules.len(),
        skipped = skipped.len(),
        empty = empty.len(),
        sessions = sessions.len(),
        "expanded rule rows"
    );

    Expansion {
        sessions,
        skipped,
        empty,
        rules_expanded: rules.len(),
    }
}
