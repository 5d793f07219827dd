// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Progress display and end-of-run summary.

use std::path::Path;

use indicatif::{ProgressBar, ProgressStyle};
use pixelprep_core::{BatchConfig, BatchResult, Result};
use serde::Serialize;
use pixelprep_image::{BatchObserver, FileOutcome};
use tracing::info;

const BULLET: &str = " • ";
const BAR_TEMPLATE: &str =
    "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}";

/// Drives an `indicatif` progress bar from batch events.
pub struct ProgressReporter {
    bar: ProgressBar,
}

impl ProgressReporter {
    pub fn new(quiet: bool) -> Self {
        let bar = if quiet {
            ProgressBar::hidden()
        } else {
            let bar = ProgressBar::new(0);
            bar.set_style(
                ProgressStyle::default_bar()
                    .template(BAR_TEMPLATE)
                    .unwrap_or_else(|_| ProgressStyle::default_bar())
                    .progress_chars("█▓▒░  "),
            );
            bar
        };
        Self { bar }
    }
}

impl BatchObserver for ProgressReporter {
    fn on_start(&mut self, total: usize) {
        self.bar.set_length(total as u64);
    }

    fn on_file(&mut self, outcome: &FileOutcome) {
        let name = match outcome {
            FileOutcome::Converted { file_name, .. } => file_name,
            FileOutcome::Failed(error) => &error.file_name,
        };
        self.bar.set_message(name.clone());
        self.bar.inc(1);
    }

    fn on_finish(&mut self, _result: &BatchResult) {
        self.bar.finish_and_clear();
    }
}

/// Human-readable summary: converted count, then one bullet per failed file.
pub fn summary(result: &BatchResult) -> String {
    let mut text = format!("Converted {} images.\n", result.converted_count);

    if !result.errors.is_empty() {
        text.push_str(&format!(
            "\n{} images could not be converted:\n",
            result.errors.len()
        ));
        for error in &result.errors {
            text.push_str(BULLET);
            text.push_str(&error.to_string());
            text.push('\n');
        }
    }

    text
}

/// JSON report body: the settings the run used and what it produced.
#[derive(Serialize)]
struct RunReport<'a> {
    config: &'a BatchConfig,
    result: &'a BatchResult,
}

/// Write the config and full result, including timestamps, as JSON.
pub fn write_json(config: &BatchConfig, result: &BatchResult, path: &Path) -> Result<()> {
    let json = serde_json::to_string_pretty(&RunReport { config, result })?;
    std::fs::write(path, json)?;
    info!(path = %path.display(), "Wrote JSON report");
    Ok(())
}
