//! Command implementations for the Rungs CLI.

use std::fs::File;
use std::io::{self, BufRead, BufReader, BufWriter, Write};
use std::path::Path;
use std::process::ExitCode;
use std::sync::Arc;
use std::time::Instant;

use log::{debug, info, warn};

use crate::cli::args::*;
use crate::cli::output::*;
use crate::config::PreprocessConfig;
use crate::dictionary::Dictionary;
use crate::error::{Result, RungsError};
use crate::index::{self, IndexReader};
use crate::ladder::QueryRouter;
use crate::ladder::router::validate_query;
use crate::preprocess::Preprocessor;
use crate::storage::Storage;
use crate::storage::file::{FileStorage, FileStorageConfig};

/// Execute a CLI command.
///
/// Query failures such as an unknown word are answered on stdout and reported
/// through the exit code; every other failure is returned as an error.
pub fn execute_command(args: RungsArgs) -> Result<ExitCode> {
    let stdin = io::stdin();
    let stdout = io::stdout();
    let mut out = stdout.lock();

    match &args.command {
        Command::Preprocess(pre_args) => match &pre_args.input {
            Some(path) => {
                let input = BufReader::new(File::open(path)?);
                preprocess(pre_args, &args, input, &mut out)
            }
            None => preprocess(pre_args, &args, stdin.lock(), &mut out),
        },
        Command::Distribute(dist_args) => match &dist_args.input {
            Some(path) => {
                let input = BufReader::new(File::open(path)?);
                distribute_stream(dist_args, &args, input, &mut out)
            }
            None => distribute_stream(dist_args, &args, stdin.lock(), &mut out),
        },
        Command::Query(query_args) => query(query_args, &args, stdin.lock(), &mut out),
        Command::Stats(stats_args) => show_stats(stats_args, &args, &mut out),
        Command::Validate(validate_args) => validate_index(validate_args, &args, &mut out),
    }
}

/// Build an index from a word list.
pub fn preprocess<R: BufRead>(
    args: &PreprocessArgs,
    cli_args: &RungsArgs,
    input: R,
    out: &mut dyn Write,
) -> Result<ExitCode> {
    let mut config = match &args.config_file {
        Some(path) => {
            debug!("Loading preprocess config from {}", path.display());
            PreprocessConfig::load_from_file(path)?
        }
        None => PreprocessConfig::default(),
    };
    if args.serial {
        config = config.with_parallel(false);
    }
    if let Some(threads) = args.threads {
        config = config.with_thread_pool_size(threads);
    }
    config.validate()?;

    let dictionary = Dictionary::read_from(input, &config)?;
    if dictionary.is_empty() {
        warn!("Dictionary is empty; writing an empty index");
    }

    let preprocessor = Preprocessor::new(config);
    let start = Instant::now();

    if args.stream {
        // stdout carries the stream, so the summary only goes to the log.
        let manifest = preprocessor.build_into_stream(dictionary, BufWriter::new(out))?;
        info!(
            "Streamed {} words in {} components",
            manifest.word_count(),
            manifest.component_count()
        );
        return Ok(ExitCode::SUCCESS);
    }

    let Some(output_path) = &args.output else {
        return Err(RungsError::invalid_config(
            "either --output or --stream is required",
        ));
    };
    if cli_args.verbosity() > 1 {
        writeln!(out, "Building index at: {}", output_path.display())?;
    }
    let storage = output_storage(output_path, args.sync)?;
    let manifest = preprocessor.build_into_storage(dictionary, &storage)?;

    let summary = BuildSummary::from_manifest(
        output_path.display().to_string(),
        &manifest,
        start.elapsed().as_millis() as u64,
    );
    output_result("Index built", &summary, cli_args, out)?;
    Ok(ExitCode::SUCCESS)
}

/// Split a combined record stream into an index directory.
pub fn distribute_stream<R: BufRead>(
    args: &DistributeArgs,
    cli_args: &RungsArgs,
    input: R,
    out: &mut dyn Write,
) -> Result<ExitCode> {
    let storage = output_storage(&args.output, args.sync)?;
    let records_written = index::distribute(input, &storage)?;

    output_result(
        "Stream distributed",
        &DistributionResult {
            path: args.output.display().to_string(),
            records_written,
        },
        cli_args,
        out,
    )?;
    Ok(ExitCode::SUCCESS)
}

/// Answer one ladder query.
///
/// Words come from the command line, or from the first two lines of `input`.
pub fn query<R: BufRead>(
    args: &QueryArgs,
    cli_args: &RungsArgs,
    input: R,
    out: &mut dyn Write,
) -> Result<ExitCode> {
    let (source, destination) = match (&args.from, &args.to) {
        (Some(from), Some(to)) => (from.clone(), to.clone()),
        _ => read_query_words(input)?,
    };

    // Bad input is answered without touching the index.
    if let Err(reason) = validate_query(&source, &destination) {
        output_result("", &QueryOutcome::failed(reason), cli_args, out)?;
        return Ok(ExitCode::FAILURE);
    }

    let router = QueryRouter::new(open_index(&args.index_path)?);
    let start = Instant::now();
    let outcome = match router.query(&source, &destination) {
        Ok(ladder) => QueryOutcome::found(ladder),
        Err(e) => match e.as_query() {
            Some(reason) => QueryOutcome::failed(reason),
            None => return Err(e),
        },
    };
    debug!("Query {source} -> {destination} took {:?}", start.elapsed());

    output_result("", &outcome, cli_args, out)?;
    Ok(if outcome.is_found() {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}

/// Show index statistics.
pub fn show_stats(args: &StatsArgs, cli_args: &RungsArgs, out: &mut dyn Write) -> Result<ExitCode> {
    let reader = open_index(&args.index_path)?;
    let stats = IndexStats::from_manifest(args.index_path.display().to_string(), reader.manifest());
    output_result("", &stats, cli_args, out)?;
    Ok(ExitCode::SUCCESS)
}

/// Validate index integrity.
pub fn validate_index(
    args: &ValidateArgs,
    cli_args: &RungsArgs,
    out: &mut dyn Write,
) -> Result<ExitCode> {
    if cli_args.verbosity() > 1 {
        writeln!(out, "Validating index at: {}", args.index_path.display())?;
    }

    let reader = open_index(&args.index_path)?;
    let report = index::verify(&reader)?;
    let ok = report.is_ok();

    output_result(
        "Index validation completed",
        &ValidationResult {
            path: args.index_path.display().to_string(),
            report,
        },
        cli_args,
        out,
    )?;
    Ok(if ok { ExitCode::SUCCESS } else { ExitCode::FAILURE })
}

/// Directory storage for writing an index, fsyncing each record when `sync` is set.
fn output_storage(path: &Path, sync: bool) -> Result<FileStorage> {
    let mut config = FileStorageConfig::new(path);
    config.sync_writes = sync;
    FileStorage::new(path, config)
}

/// Open an existing index directory.
fn open_index(path: &Path) -> Result<IndexReader> {
    if !path.is_dir() {
        return Err(RungsError::storage(format!(
            "Index directory does not exist: {}",
            path.display()
        )));
    }
    let storage: Arc<dyn Storage> = Arc::new(FileStorage::new(path, FileStorageConfig::new(path))?);
    IndexReader::open(storage)
}

/// Read the source and destination words from two lines.
///
/// A missing line reads as an empty word and bytes that are not UTF-8 become
/// replacement characters; both are then rejected as invalid input.
fn read_query_words<R: BufRead>(mut input: R) -> Result<(String, String)> {
    let mut next_word = || -> Result<String> {
        let mut line = Vec::new();
        input.read_until(b'\n', &mut line)?;
        let line = line.strip_suffix(b"\n").unwrap_or(&line);
        let line = line.strip_suffix(b"\r").unwrap_or(line);
        Ok(String::from_utf8_lossy(line).into_owned())
    };
    let source = next_word()?;
    let destination = next_word()?;
    Ok((source, destination))
}
