//! Check command: report which rule rows are usable.

use std::io::Write;
use std::path::Path;

use anyhow::{Context, Result};
use serde::Serialize;

use sg_core::{Expansion, expand_rows};

use super::util::load_rows;
use crate::Config;

/// Summary of one expansion, without the sessions themselves.
#[derive(Debug, Serialize)]
pub struct CheckReport {
    pub rows: usize,
    pub rules_expanded: usize,
    pub sessions: usize,
    pub skipped: Vec<SkippedEntry>,
    /// Usable rules that matched no date.
    pub empty: Vec<EmptyEntry>,
}

#[derive(Debug, Serialize)]
pub struct SkippedEntry {
    /// 1-based row number among the data rows.
    pub row: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub topic: Option<String>,
    pub reason: String,
}

#[derive(Debug, Serialize)]
pub struct EmptyEntry {
    /// 1-based row number among the data rows.
    pub row: usize,
    pub topic: String,
    pub repetition: String,
}

impl CheckReport {
    pub fn new(rows: usize, expansion: &Expansion) -> Self {
        Self {
            rows,
            rules_expanded: expansion.rules_expanded,
            sessions: expansion.sessions.len(),
            skipped: expansion
                .skipped
                .iter()
                .map(|skip| SkippedEntry {
                    row: skip.row + 1,
                    topic: skip.topic.clone(),
                    reason: skip.reason.to_string(),
                })
                .collect(),
            empty: expansion
                .empty
                .iter()
                .map(|rule| EmptyEntry {
                    row: rule.row + 1,
                    topic: rule.topic.clone(),
                    repetition: rule.repetition.clone(),
                })
                .collect(),
        }
    }
}

/// Runs the check command.
pub fn run<W: Write>(
    writer: &mut W,
    config: &Config,
    input: Option<&Path>,
    json: bool,
) -> Result<()> {
    let input = input.unwrap_or(&config.input_path);
    let rows = load_rows(input)?;
    let expansion = expand_rows(&rows, &config.columns, &config.expansion_options());
    let report = CheckReport::new(rows.len(), &expansion);

    if json {
        serde_json::to_writer_pretty(&mut *writer, &report)
            .context("failed to serialize report")?;
        writeln!(writer)?;
    } else {
        render(writer, &report)?;
    }
    Ok(())
}

fn render<W: Write>(writer: &mut W, report: &CheckReport) -> Result<()> {
    writeln!(writer, "Rows:     {}", report.rows)?;
    writeln!(writer, "Expanded: {}", report.rules_expanded)?;
    writeln!(writer, "Skipped:  {}", report.skipped.len())?;
    writeln!(writer, "Empty:    {}", report.empty.len())?;
    writeln!(writer, "Sessions: {}", report.sessions)?;

    if !report.skipped.is_empty() {
        writeln!(writer)?;
        writeln!(writer, "Skipped rows:")?;
        for entry in &report.skipped {
            let topic = entry.topic.as_deref().unwrap_or("(no topic)");
            writeln!(writer, "- #{} {topic}: {}", entry.row, entry.reason)?;
        }
    }

    if !report.empty.is_empty() {
        writeln!(writer)?;
        writeln!(writer, "Rules with no sessions:")?;
        for entry in &report.empty {
            writeln!(
                writer,
                "- #{} {}: no date matches '{}'",
                entry.row, entry.topic, entry.repetition
            )?;
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    use insta::assert_snapshot;
    use serde_json::json;

    use sg_core::{ColumnMap, ExpansionOptions, RuleRow};

    fn sample_rows() -> Vec<RuleRow> {
        serde_json::from_value(json!([
            {
                "topic": "Algebra",
                "repetition": "weekly",
                "detail": "1,3",
                "start_date": "2025-01-06",
                "end_date": "2025-01-17"
            },
            { "topic": "Orphan", "repetition": "weekly" },
            { "teacher": "Li", "start_date": "2025-01-06" },
            {
                "topic": "Geometry",
                "start_date": "2025-01-06",
                "end_date": "someday"
            },
            {
                "topic": "Backwards",
                "start_date": "2025-02-01",
                "end_date": "2025-01-01"
            }
        ]))
        .unwrap()
    }

    fn render_rows(rows: &[RuleRow]) -> String {
        let expansion = expand_rows(rows, &ColumnMap::default(), &ExpansionOptions::default());
        let report = CheckReport::new(rows.len(), &expansion);
        let mut output = Vec::new();
        render(&mut output, &report).unwrap();
        String::from_utf8(output).unwrap()
    }

    #[test]
    fn check_lists_skipped_rows_with_reasons() {
        assert_snapshot!(render_rows(&sample_rows()), @r"
        Rows:     5
        Expanded: 1
        Skipped:  4
        Empty:    0
        Sessions: 4

        Skipped rows:
        - #2 Orphan: missing course start date
        - #3 (no topic): missing topic
        - #4 Geometry: unparsable course end: someday
        - #5 Backwards: course starts 2025-02-01 after it ends 2025-01-01
        ");
    }

    #[test]
    fn check_clean_input_has_no_skipped_section() {
        let rows = sample_rows();
        assert_snapshot!(render_rows(&rows[..1]), @r"
        Rows:     1
        Expanded: 1
        Skipped:  0
        Empty:    0
        Sessions: 4
        ");
    }

    #[test]
    fn check_lists_rules_without_sessions() {
        let rows: Vec<RuleRow> = serde_json::from_value(json!([
            {
                "topic": "Algebra",
                "repetition": "weekely",
                "detail": "1",
                "start_date": "2025-01-06",
                "end_date": "2025-01-31"
            },
            {
                "topic": "Music",
                "repetition": "weekly",
                "detail": "2",
                "start_date": "2025-01-06",
                "end_date": "2025-01-31"
            }
        ]))
        .unwrap();

        assert_snapshot!(render_rows(&rows), @r"
        Rows:     2
        Expanded: 2
        Skipped:  0
        Empty:    1
        Sessions: 4

        Rules with no sessions:
        - #1 Algebra: no date matches 'weekely'
        ");
    }

    #[test]
    fn check_json_report_from_file() {
        let temp = tempfile::tempdir().unwrap();
        let input = temp.path().join("data.json");
        std::fs::write(&input, serde_json::to_string(&sample_rows()).unwrap()).unwrap();

        let config = Config::default();
        let mut output = Vec::new();
        run(&mut output, &config, Some(input.as_path()), true).unwrap();

        let report: serde_json::Value = serde_json::from_slice(&output).unwrap();
        assert_eq!(report["rows"], 5);
        assert_eq!(report["sessions"], 4);
        assert_eq!(report["skipped"][1]["row"], 3);
        assert!(report["skipped"][1].get("topic").is_none());
        assert_eq!(report["skipped"][0]["reason"], "missing course start date");
        assert_eq!(report["empty"], json!([]));
    }
}
