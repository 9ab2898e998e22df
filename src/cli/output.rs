//! Output formatting for CLI commands.

use std::io::Write;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::cli::args::{OutputFormat, RungsArgs};
use crate::error::{QueryError, Result};
use crate::index::VerifyReport;
use crate::index::manifest::{LengthSummary, Manifest};
use crate::ladder::{FAILURE_SENTINEL, Ladder};

/// Types with a human-readable rendering next to their JSON form.
pub trait HumanOutput {
    fn write_human(&self, out: &mut dyn Write) -> Result<()>;
}

/// Result structure for index preprocessing.
#[derive(Debug, Serialize, Deserialize)]
pub struct BuildSummary {
    pub destination: String,
    pub words: usize,
    pub lengths: usize,
    pub components: usize,
    pub orphans: usize,
    pub duration_ms: u64,
}

impl BuildSummary {
    pub fn from_manifest(destination: String, manifest: &Manifest, duration_ms: u64) -> Self {
        BuildSummary {
            destination,
            words: manifest.word_count(),
            lengths: manifest.lengths.len(),
            components: manifest.component_count(),
            orphans: manifest.lengths.iter().map(|s| s.orphans).sum(),
            duration_ms,
        }
    }
}

impl HumanOutput for BuildSummary {
    fn write_human(&self, out: &mut dyn Write) -> Result<()> {
        writeln!(out, "Index written to: {}", self.destination)?;
        writeln!(out, "Words: {}", self.words)?;
        writeln!(out, "Word lengths: {}", self.lengths)?;
        writeln!(out, "Components: {}", self.components)?;
        writeln!(out, "Orphans: {}", self.orphans)?;
        writeln!(out, "Build time: {}ms", self.duration_ms)?;
        Ok(())
    }
}

/// Result structure for stream distribution.
#[derive(Debug, Serialize, Deserialize)]
pub struct DistributionResult {
    pub path: String,
    pub records_written: usize,
}

impl HumanOutput for DistributionResult {
    fn write_human(&self, out: &mut dyn Write) -> Result<()> {
        writeln!(out, "Wrote {} records to {}", self.records_written, self.path)?;
        Ok(())
    }
}

/// Index statistics.
#[derive(Debug, Serialize, Deserialize)]
pub struct IndexStats {
    pub path: String,
    pub format_version: u32,
    pub created_at: DateTime<Utc>,
    pub total_words: usize,
    pub total_components: usize,
    pub index_size_bytes: u64,
    pub lengths: Vec<LengthSummary>,
}

impl IndexStats {
    pub fn from_manifest(path: String, manifest: &Manifest) -> Self {
        IndexStats {
            path,
            format_version: manifest.format_version,
            created_at: manifest.created_at,
            total_words: manifest.word_count(),
            total_components: manifest.component_count(),
            index_size_bytes: manifest.records.values().map(|c| c.size).sum(),
            lengths: manifest.lengths.clone(),
        }
    }
}

impl HumanOutput for IndexStats {
    fn write_human(&self, out: &mut dyn Write) -> Result<()> {
        writeln!(out, "Index Statistics:")?;
        writeln!(out, "════════════════")?;
        writeln!(out, "Path: {}", self.path)?;
        writeln!(out, "Format version: {}", self.format_version)?;
        writeln!(out, "Created: {}", self.created_at.to_rfc3339())?;
        writeln!(out, "Total words: {}", self.total_words)?;
        writeln!(out, "Total components: {}", self.total_components)?;
        writeln!(out, "Index size: {}", format_bytes(self.index_size_bytes))?;

        if !self.lengths.is_empty() {
            writeln!(out)?;
            writeln!(out, "Per Length:")?;
            writeln!(out, "───────────")?;
            writeln!(
                out,
                "{:>6} {:>10} {:>10} {:>10} {:>10} {:>10}",
                "length", "words", "groups", "components", "orphans", "largest"
            )?;
            for s in &self.lengths {
                writeln!(
                    out,
                    "{:>6} {:>10} {:>10} {:>10} {:>10} {:>10}",
                    s.length, s.words, s.groups, s.components, s.orphans, s.largest_component
                )?;
            }
        }
        Ok(())
    }
}

/// Result structure for index validation.
#[derive(Debug, Serialize, Deserialize)]
pub struct ValidationResult {
    pub path: String,
    #[serde(flatten)]
    pub report: VerifyReport,
}

impl HumanOutput for ValidationResult {
    fn write_human(&self, out: &mut dyn Write) -> Result<()> {
        writeln!(out, "Validation of {}:", self.path)?;
        writeln!(out, "Records checked: {}", self.report.records_checked)?;
        writeln!(out, "Components checked: {}", self.report.components_checked)?;
        if self.report.is_ok() {
            writeln!(out, "No problems found")?;
        } else {
            writeln!(out, "Found {} problems:", self.report.problems.len())?;
            for problem in &self.report.problems {
                writeln!(out, "  - {problem}")?;
            }
        }
        Ok(())
    }
}

/// The answer to a ladder query, successful or not.
#[derive(Debug, Serialize, Deserialize)]
pub struct QueryOutcome {
    /// Word count of the ladder, or -1 on failure.
    pub length: i64,
    pub words: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

impl QueryOutcome {
    pub fn found(ladder: Ladder) -> Self {
        QueryOutcome {
            length: ladder.len() as i64,
            words: ladder.into_words(),
            reason: None,
        }
    }

    pub fn failed(reason: QueryError) -> Self {
        QueryOutcome {
            length: FAILURE_SENTINEL,
            words: Vec::new(),
            reason: Some(reason.to_string()),
        }
    }

    pub fn is_found(&self) -> bool {
        self.reason.is_none()
    }
}

impl HumanOutput for QueryOutcome {
    fn write_human(&self, out: &mut dyn Write) -> Result<()> {
        writeln!(out, "{}", self.length)?;
        match &self.reason {
            Some(reason) => writeln!(out, "{reason}")?,
            None => {
                for word in &self.words {
                    writeln!(out, "{word}")?;
                }
            }
        }
        Ok(())
    }
}

/// Output a result in the specified format.
///
/// `message` is a heading printed before human output at normal verbosity.
pub fn output_result<T: Serialize + HumanOutput>(
    message: &str,
    result: &T,
    args: &RungsArgs,
    out: &mut dyn Write,
) -> Result<()> {
    match args.output_format {
        OutputFormat::Human => {
            if args.verbosity() > 0 && !message.is_empty() {
                writeln!(out, "{message}")?;
                writeln!(out)?;
            }
            result.write_human(out)
        }
        OutputFormat::Json => output_json(result, args, out),
    }
}

fn output_json<T: Serialize>(result: &T, args: &RungsArgs, out: &mut dyn Write) -> Result<()> {
    let json = if args.pretty {
        serde_json::to_string_pretty(result)?
    } else {
        serde_json::to_string(result)?
    };

    writeln!(out, "{json}")?;
    Ok(())
}

fn format_bytes(bytes: u64) -> String {
    const UNITS: &[&str] = &["B", "KB", "MB", "GB", "TB"];
    let mut size = bytes as f64;
    let mut unit_index = 0;

    while size >= 1024.0 && unit_index < UNITS.len() - 1 {
        size /= 1024.0;
        unit_index += 1;
    }

    let unit = UNITS[unit_index];
    if unit_index == 0 {
        format!("{bytes} {unit}")
    } else {
        format!("{size:.1} {unit}")
    }
}
