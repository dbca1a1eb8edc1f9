//! Generate command: expand rule rows and write session records.

use std::fs;
use std::io::{self, BufWriter, Write};
use std::path::Path;

use anyhow::{Context, Result};

use sg_core::{Expansion, SessionRecord, expand_rows};

use super::util::{is_stdio, load_rows};
use crate::Config;

/// Serialization layout for session records.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// A single pretty-printed JSON array.
    Json,
    /// One compact JSON object per line.
    JsonLines,
}

/// Runs the generate command, returning the expansion for reporting.
pub fn run(
    config: &Config,
    input: Option<&Path>,
    output: Option<&Path>,
    format: OutputFormat,
) -> Result<Expansion> {
    let input = input.unwrap_or(&config.input_path);
    let output = output.unwrap_or(&config.output_path);

    let rows = load_rows(input)?;
    let expansion = expand_rows(&rows, &config.columns, &config.expansion_options());

    if is_stdio(output) {
        let stdout = io::stdout();
        let mut writer = BufWriter::new(stdout.lock());
        write_sessions(&mut writer, &expansion.sessions, format)?;
        writer.flush().context("failed to flush stdout")?;
    } else {
        let file = fs::File::create(output)
            .with_context(|| format!("failed to create {}", output.display()))?;
        let mut writer = BufWriter::new(file);
        write_sessions(&mut writer, &expansion.sessions, format)?;
        writer
            .flush()
            .with_context(|| format!("failed to write {}", output.display()))?;
    }

    tracing::info!(
        output = %output.display(),
        sessions = expansion.sessions.len(),
        "wrote sessions"
    );
    Ok(expansion)
}

/// Serializes sessions in the requested layout.
pub fn write_sessions<W: Write>(
    writer: &mut W,
    sessions: &[SessionRecord],
    format: OutputFormat,
) -> Result<()> {
    match format {
        OutputFormat::Json => {
            serde_json::to_writer_pretty(&mut *writer, sessions)
                .context("failed to serialize sessions")?;
            writeln!(writer)?;
        }
        OutputFormat::JsonLines => {
            for session in sessions {
                serde_json::to_writer(&mut *writer, session)
                    .context("failed to serialize session")?;
                writeln!(writer)?;
            }
        }
    }
    Ok(())
}

/// One-line summary printed after a run.
pub fn summary_line(expansion: &Expansion, output: &Path) -> String {
    let destination = if is_stdio(output) {
        "stdout".to_string()
    } else {
        output.display().to_string()
    };
    format!(
        "Generated {} sessions from {} rules ({} skipped) -> {destination}",
        expansion.sessions.len(),
        expansion.rules_expanded,
        expansion.skipped.len(),
    )
}
