// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Batch runner — applies the pipeline to every eligible file in a directory,
// recording per-file failures without aborting the run.

use std::ffi::OsString;
use std::path::{Path, PathBuf};

use image::{DynamicImage, ImageError, ImageReader};
use pixelprep_core::{BatchConfig, BatchResult, FileError, PixelprepError, Result};
use tracing::{debug, info, instrument, warn};

use crate::pipeline::ImagePipeline;

/// What happened to a single attempted file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileOutcome {
    Converted { file_name: String, output: PathBuf },
    Failed(FileError),
}

/// Progress hooks called by [`BatchRunner`]. All methods default to no-ops.
pub trait BatchObserver {
    /// Called once before the first file, with the number of files that will
    /// be attempted.
    fn on_start(&mut self, _total: usize) {}

    /// Called after each attempted file.
    fn on_file(&mut self, _outcome: &FileOutcome) {}

    fn on_finish(&mut self, _result: &BatchResult) {}
}

/// Observer that ignores every event.
#[derive(Debug, Default)]
pub struct NoopObserver;

impl BatchObserver for NoopObserver {}

/// Runs the image pipeline over a source directory.
///
/// The only error [`run`](Self::run) returns is a fatal one (unwritable
/// destination, unreadable source). Everything that goes wrong with an
/// individual file ends up in [`BatchResult::errors`].
#[derive(Debug, Clone)]
pub struct BatchRunner {
    config: BatchConfig,
}

impl BatchRunner {
    pub fn new(config: BatchConfig) -> Self {
        Self { config }
    }

    pub fn run(&self) -> Result<BatchResult> {
        self.run_with_observer(&mut NoopObserver)
    }

    #[instrument(skip_all, fields(
        input = %self.config.input.display(),
        output = %self.config.output.display()
    ))]
    pub fn run_with_observer(&self, observer: &mut dyn BatchObserver) -> Result<BatchResult> {
        ensure_writable(&self.config.output)?;

        let mut entries = eligible_entries(&self.config.input)?;
        if let Some(limit) = self.config.file_limit() {
            entries.truncate(limit);
        }

        info!(files = entries.len(), "Starting batch");
        observer.on_start(entries.len());

        let pipeline = ImagePipeline::new(&self.config.options);
        let mut result = BatchResult::new();

        for (file_name, path) in entries {
            let display_name = file_name.to_string_lossy().into_owned();

            let outcome = match self.process_file(&pipeline, &file_name, &path) {
                Ok(output) => {
                    debug!(file = %display_name, output = %output.display(), "Converted");
                    result.record_success();
                    FileOutcome::Converted {
                        file_name: display_name,
                        output,
                    }
                }
                Err(err) => {
                    warn!(file = %display_name, error = %err, "Could not convert file");
                    let error = FileError {
                        file_name: display_name,
                        message: err.to_string(),
                    };
                    result.record_failure(error.file_name.clone(), error.message.clone());
                    FileOutcome::Failed(error)
                }
            };
            observer.on_file(&outcome);
        }

        result.finish();
        info!(
            attempted = result.attempted,
            converted = result.converted_count,
            failed = result.failed_count(),
            "Batch complete"
        );
        observer.on_finish(&result);
        Ok(result)
    }

    /// Read, transform, and write one file, returning the output path.
    fn process_file(
        &self,
        pipeline: &ImagePipeline<'_>,
        file_name: &OsString,
        path: &Path,
    ) -> Result<PathBuf> {
        let image = read_image(path)?;
        let image = pipeline.process(image)?;
        let output = self.config.output_path(file_name);
        write_image(&image, &output)?;
        Ok(output)
    }
}

/// Fail unless `dir` is an existing directory we can create files in.
fn ensure_writable(dir: &Path) -> Result<()> {
    let unwritable = |reason: String| PixelprepError::DestinationUnwritable {
        path: dir.to_path_buf(),
        reason,
    };

    let metadata = std::fs::metadata(dir).map_err(|err| unwritable(err.to_string()))?;
    if !metadata.is_dir() {
        return Err(unwritable("not a directory".into()));
    }

    // Permission bits are unreliable (root, ACLs, read-only mounts); probe instead.
    tempfile::Builder::new()
        .prefix(".pixelprep-probe")
        .tempfile_in(dir)
        .map_err(|err| unwritable(err.to_string()))?;
    Ok(())
}

/// Regular, non-hidden files in `dir`, in directory-listing order.
fn eligible_entries(dir: &Path) -> Result<Vec<(OsString, PathBuf)>> {
    let listing = std::fs::read_dir(dir).map_err(|err| {
        PixelprepError::Configuration(format!(
            "cannot list input <{}>: {}",
            dir.display(),
            err
        ))
    })?;

    let mut entries = Vec::new();
    for entry in listing {
        let entry = match entry {
            Ok(entry) => entry,
            Err(err) => {
                warn!(error = %err, "Skipping unreadable directory entry");
                continue;
            }
        };

        let file_name = entry.file_name();
        if file_name.to_string_lossy().starts_with('.') {
            continue;
        }
        let path = entry.path();
        if !path.is_file() {
            continue;
        }
        entries.push((file_name, path));
    }
    Ok(entries)
}

/// Decode an image, detecting the format from its content.
fn read_image(path: &Path) -> Result<DynamicImage> {
    ImageReader::open(path)
        .map_err(|err| read_error(path, err))?
        .with_guessed_format()
        .map_err(|err| read_error(path, err))?
        .decode()
        .map_err(|err| read_error(path, err))
}

fn read_error(path: &Path, err: impl std::fmt::Display) -> PixelprepError {
    PixelprepError::Read(format!("{}: {}", path.display(), err))
}

/// Encode `image` to `path`, choosing the format from the file extension.
fn write_image(image: &DynamicImage, path: &Path) -> Result<()> {
    image.save(path).map_err(|err| {
        PixelprepError::Write(match err {
            ImageError::Unsupported(_) => {
                format!("could not determine filetype of {}", path.display())
            }
            ImageError::IoError(io) => {
                format!("I/O error: unable to write to {}: {}", path.display(), io)
            }
            other => format!("failed to encode {}: {}", path.display(), other),
        })
    })
}
