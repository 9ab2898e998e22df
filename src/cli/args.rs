//! Command line argument parsing for the Rungs CLI using clap.

use clap::{Parser, Subcommand, ValueEnum};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Rungs - shortest word ladders over a preprocessed dictionary
#[derive(Parser, Debug, Clone)]
#[command(name = "rungs")]
#[command(about = "Shortest word ladders over a preprocessed dictionary")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(author = "Rungs Contributors")]
#[command(long_about = None)]
pub struct RungsArgs {
    /// Verbosity level (0=quiet, 1=normal, 2=verbose, 3=debug)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Quiet mode (overrides verbose)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Output format
    #[arg(short = 'f', long = "format", default_value = "human", global = true)]
    pub output_format: OutputFormat,

    /// Pretty-print JSON output
    #[arg(long, global = true)]
    pub pretty: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Command,
}

impl RungsArgs {
    /// Get the effective verbosity level
    pub fn verbosity(&self) -> u8 {
        if self.quiet {
            0
        } else {
            match self.verbose {
                0 => 1, // Default to normal
                n => n,
            }
        }
    }
}

/// Available CLI commands
#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Build a ladder index from a word list
    Preprocess(PreprocessArgs),

    /// Split a combined record stream into an index directory
    Distribute(DistributeArgs),

    /// Find a shortest ladder between two words
    Query(QueryArgs),

    /// Show index statistics
    Stats(StatsArgs),

    /// Validate index integrity
    Validate(ValidateArgs),
}

/// Arguments for building an index
#[derive(Parser, Debug, Clone)]
pub struct PreprocessArgs {
    /// Word list, one word per line (default: stdin)
    #[arg(short, long, value_name = "WORDS_FILE")]
    pub input: Option<PathBuf>,

    /// Index directory to write
    #[arg(short, long, value_name = "INDEX_PATH", required_unless_present = "stream")]
    pub output: Option<PathBuf>,

    /// Emit one combined record stream on stdout instead of a directory
    #[arg(long, conflicts_with = "output")]
    pub stream: bool,

    /// Preprocessing configuration file (JSON)
    #[arg(short, long = "config", value_name = "CONFIG_FILE")]
    pub config_file: Option<PathBuf>,

    /// Analyze word lengths one after another
    #[arg(long)]
    pub serial: bool,

    /// Number of threads to use
    #[arg(short, long)]
    pub threads: Option<usize>,

    /// Fsync every record as it is written
    #[arg(long)]
    pub sync: bool,
}

/// Arguments for splitting a record stream
#[derive(Parser, Debug, Clone)]
pub struct DistributeArgs {
    /// Index directory to write
    #[arg(short, long, value_name = "INDEX_PATH")]
    pub output: PathBuf,

    /// Record stream (default: stdin)
    #[arg(short, long, value_name = "STREAM_FILE")]
    pub input: Option<PathBuf>,

    /// Fsync every record as it is written
    #[arg(long)]
    pub sync: bool,
}

/// Arguments for a ladder query
#[derive(Parser, Debug, Clone)]
pub struct QueryArgs {
    /// Path to the index directory
    #[arg(short, long = "index", value_name = "INDEX_PATH")]
    pub index_path: PathBuf,

    /// Source word (default: first line of stdin)
    #[arg(value_name = "FROM", requires = "to")]
    pub from: Option<String>,

    /// Destination word (default: second line of stdin)
    #[arg(value_name = "TO")]
    pub to: Option<String>,
}

/// Arguments for index statistics
#[derive(Parser, Debug, Clone)]
pub struct StatsArgs {
    /// Path to the index directory
    #[arg(short, long = "index", value_name = "INDEX_PATH")]
    pub index_path: PathBuf,
}

/// Arguments for index validation
#[derive(Parser, Debug, Clone)]
pub struct ValidateArgs {
    /// Path to the index directory
    #[arg(short, long = "index", value_name = "INDEX_PATH")]
    pub index_path: PathBuf,
}

/// Output formats for CLI
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Human-readable output
    Human,
    /// JSON output
    Json,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn test_preprocess_command() {
        let args = RungsArgs::try_parse_from([
            "rungs",
            "preprocess",
            "--input",
            "words.txt",
            "--output",
            "/path/to/index",
            "--threads",
            "4",
        ])
        .unwrap();

        if let Command::Preprocess(pre) = args.command {
            assert_eq!(pre.input, Some(PathBuf::from("words.txt")));
            assert_eq!(pre.output, Some(PathBuf::from("/path/to/index")));
            assert_eq!(pre.threads, Some(4));
            assert!(!pre.stream);
            assert!(!pre.sync);
        } else {
            panic!("Expected Preprocess command");
        }
    }

    #[test]
    fn test_preprocess_needs_destination() {
        assert!(RungsArgs::try_parse_from(["rungs", "preprocess"]).is_err());
        assert!(
            RungsArgs::try_parse_from(["rungs", "preprocess", "--stream", "--output", "x"])
                .is_err()
        );
        assert!(RungsArgs::try_parse_from(["rungs", "preprocess", "--stream"]).is_ok());
    }

    #[test]
    fn test_query_command() {
        let args =
            RungsArgs::try_parse_from(["rungs", "query", "--index", "idx", "cat", "dog"]).unwrap();
        if let Command::Query(query) = args.command {
            assert_eq!(query.index_path, PathBuf::from("idx"));
            assert_eq!(query.from.as_deref(), Some("cat"));
            assert_eq!(query.to.as_deref(), Some("dog"));
        } else {
            panic!("Expected Query command");
        }

        let args = RungsArgs::try_parse_from(["rungs", "query", "-i", "idx"]).unwrap();
        if let Command::Query(query) = args.command {
            assert!(query.from.is_none());
        } else {
            panic!("Expected Query command");
        }

        assert!(RungsArgs::try_parse_from(["rungs", "query", "-i", "idx", "cat"]).is_err());
    }

    #[test]
    fn test_verbosity() {
        let args = RungsArgs::try_parse_from(["rungs", "stats", "-i", "idx"]).unwrap();
        assert_eq!(args.verbosity(), 1);

        let args = RungsArgs::try_parse_from(["rungs", "-vvv", "stats", "-i", "idx"]).unwrap();
        assert_eq!(args.verbosity(), 3);

        let args = RungsArgs::try_parse_from(["rungs", "stats", "-i", "idx", "-q", "-f", "json"])
            .unwrap();
        assert_eq!(args.verbosity(), 0);
        assert_eq!(args.output_format, OutputFormat::Json);
    }
}
