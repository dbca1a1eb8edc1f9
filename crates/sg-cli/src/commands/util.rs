//! Shared I/O helpers for CLI commands.

use std::fs;
use std::io::{self, BufReader, Read};
use std::path::Path;

use anyhow::{Context, Result};

use sg_core::RuleRow;

/// Path meaning stdin or stdout.
const STDIO_PATH: &str = "-";

/// Returns true if `path` stands for stdin/stdout.
pub fn is_stdio(path: &Path) -> bool {
    path.as_os_str() == STDIO_PATH
}

/// Loads rule rows from a JSON file, or stdin for `-`.
pub fn load_rows(path: &Path) -> Result<Vec<RuleRow>> {
    if is_stdio(path) {
        return parse_rows(io::stdin().lock()).context("failed to read rule rows from stdin");
    }

    let file = fs::File::open(path)
        .with_context(|| format!("failed to open rule rows: {}", path.display()))?;
    let rows = parse_rows(BufReader::new(file))
        .with_context(|| format!("failed to read rule rows: {}", path.display()))?;
    tracing::debug!(path = %path.display(), rows = rows.len(), "loaded rule rows");
    Ok(rows)
}

/// Parses a JSON array of objects, the shape spreadsheet exports produce.
pub fn parse_rows<R: Read>(reader: R) -> Result<Vec<RuleRow>> {
    serde_json::from_reader(reader).context("expected a JSON array of row objects")
}
