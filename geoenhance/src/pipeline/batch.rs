//! Directory batch driver for super-resolution
//!
//! Files are processed one at a time in path order. Each output lands in
//! the output directory as `<stem><suffix>.tif`, under the same relative
//! subdirectory as its input.

use crate::error::{PipelineError, PipelineResult};
use crate::pipeline::config::{BatchConfig, SuperResConfig};
use crate::pipeline::superres::run_superres;
use geoenhance_io::IoError;
use geoenhance_transform::Upsampler;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use tracing::{info, warn};
use walkdir::WalkDir;

/// Progress notification from [`run_batch`]
#[derive(Debug)]
pub enum BatchEvent<'a> {
    /// About to process file `index` (1-based) of `total`
    Started {
        index: usize,
        total: usize,
        path: &'a Path,
    },
    /// File written
    Finished {
        index: usize,
        total: usize,
        path: &'a Path,
        output: &'a Path,
    },
    /// File failed
    Failed {
        index: usize,
        total: usize,
        path: &'a Path,
        error: &'a PipelineError,
    },
}

/// Outcome of a batch run
#[derive(Debug, Default)]
pub struct BatchReport {
    /// Files written
    pub processed: usize,
    /// Files that failed, with their errors (only filled with `keep_going`)
    pub failures: Vec<(PathBuf, PipelineError)>,
    /// Wall-clock time of the whole batch
    pub elapsed: Duration,
}

impl BatchReport {
    pub fn failed(&self) -> usize {
        self.failures.len()
    }

    pub fn is_success(&self) -> bool {
        self.failures.is_empty()
    }
}

fn has_extension(path: &Path, extensions: &[String]) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| extensions.iter().any(|x| x.trim_start_matches('.').eq_ignore_ascii_case(e)))
}

/// List the input files of a batch, sorted by path
pub fn collect_inputs(config: &BatchConfig) -> PipelineResult<Vec<PathBuf>> {
    if !config.input_dir.is_dir() {
        return Err(PipelineError::InputNotFound(config.input_dir.clone()));
    }

    let max_depth = if config.recursive { usize::MAX } else { 1 };
    let mut files = Vec::new();
    for entry in WalkDir::new(&config.input_dir).min_depth(1).max_depth(max_depth) {
        let entry = entry?;
        if entry.file_type().is_file() && has_extension(entry.path(), &config.extensions) {
            files.push(entry.into_path());
        }
    }
    files.sort();
    Ok(files)
}

/// Output path for one input: `output_dir/<subdir>/<stem><suffix>.tif`,
/// where `<subdir>` is the input's directory relative to `input_dir`
pub fn output_path_for(input: &Path, config: &BatchConfig) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let subdir = input
        .parent()
        .and_then(|dir| dir.strip_prefix(&config.input_dir).ok())
        .unwrap_or(Path::new(""));
    config
        .output_dir
        .join(subdir)
        .join(format!("{}{}.tif", stem, config.suffix))
}

/// Pair every input with its output path.
///
/// # Errors
///
/// Returns `PipelineError::OutputCollision` if two inputs share an output,
/// as `x.tif` and `x.tiff` in one directory do.
fn plan_outputs(inputs: &[PathBuf], config: &BatchConfig) -> PipelineResult<Vec<PathBuf>> {
    let mut seen: HashMap<PathBuf, &PathBuf> = HashMap::new();
    let mut outputs = Vec::with_capacity(inputs.len());
    for input in inputs {
        let output = output_path_for(input, config);
        if let Some(first) = seen.insert(output.clone(), input) {
            return Err(PipelineError::OutputCollision {
                first: first.clone(),
                second: input.clone(),
                output,
            });
        }
        outputs.push(output);
    }
    Ok(outputs)
}

fn run_one(
    input: &Path,
    output: &Path,
    upsampler: &mut dyn Upsampler,
    superres: &SuperResConfig,
) -> PipelineResult<()> {
    if let Some(dir) = output.parent() {
        std::fs::create_dir_all(dir).map_err(|source| IoError::CreateFailed {
            path: dir.to_path_buf(),
            source,
        })?;
    }
    run_superres(input, output, upsampler, superres)
}

/// Super-resolve every input file of a batch.
///
/// Stops at the first failure and returns its error unless
/// `config.keep_going` is set, in which case failures are collected in the
/// report.
pub fn run_batch<F>(
    config: &BatchConfig,
    superres: &SuperResConfig,
    upsampler: &mut dyn Upsampler,
    mut observer: F,
) -> PipelineResult<BatchReport>
where
    F: FnMut(&BatchEvent<'_>),
{
    let start = Instant::now();
    let inputs = collect_inputs(config)?;
    let outputs = plan_outputs(&inputs, config)?;
    let total = inputs.len();
    if total == 0 {
        warn!(
            "No input files with extension {:?} in {}",
            config.extensions,
            config.input_dir.display()
        );
    }

    std::fs::create_dir_all(&config.output_dir).map_err(|source| IoError::CreateFailed {
        path: config.output_dir.clone(),
        source,
    })?;

    let mut report = BatchReport::default();
    for (i, (path, output)) in inputs.iter().zip(&outputs).enumerate() {
        let index = i + 1;
        info!("Processing image: {} {}", index, path.display());
        observer(&BatchEvent::Started { index, total, path });

        match run_one(path, output, upsampler, superres) {
            Ok(()) => {
                report.processed += 1;
                observer(&BatchEvent::Finished {
                    index,
                    total,
                    path,
                    output,
                });
            }
            Err(error) => {
                warn!("Failed on {}: {}", path.display(), error);
                observer(&BatchEvent::Failed {
                    index,
                    total,
                    path,
                    error: &error,
                });
                if !config.keep_going {
                    return Err(error);
                }
                report.failures.push((path.clone(), error));
            }
        }
    }

    report.elapsed = start.elapsed();
    info!(
        "Processing completed. Total processing time: {:.2?}",
        report.elapsed
    );
    Ok(report)
}
