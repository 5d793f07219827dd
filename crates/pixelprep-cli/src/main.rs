// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Pixelprep — Batch image normalisation for ML datasets
//
// Entry point. Parses arguments, initialises logging, validates the
// configuration, runs the batch, and prints the summary.

mod args;
mod report;

use std::process::ExitCode;

use clap::Parser;
use pixelprep_core::PixelprepError;
use pixelprep_image::BatchRunner;

use args::Cli;
use report::ProgressReporter;

/// Every file was attempted; some may have failed individually.
const EXIT_OK: u8 = 0;
/// The destination could not be written, or the report could not be saved.
const EXIT_FAILED: u8 = 1;
/// The configuration was rejected before any file was touched.
const EXIT_CONFIG: u8 = 2;

fn main() -> ExitCode {
    let cli = Cli::parse();

    let default_level = if cli.verbose { "info" } else { "warn" };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level)),
        )
        .init();

    tracing::info!("Pixelprep starting");

    ExitCode::from(run(&cli))
}

/// Validate, run the batch, print the summary, and pick the exit status.
fn run(cli: &Cli) -> u8 {
    let config = cli.batch_config();
    if let Err(err) = config.validate() {
        eprintln!("error: {err}");
        return EXIT_CONFIG;
    }

    let runner = BatchRunner::new(config.clone());
    let mut progress = ProgressReporter::new(cli.quiet);

    let result = match runner.run_with_observer(&mut progress) {
        Ok(result) => result,
        Err(err @ PixelprepError::DestinationUnwritable { .. }) => {
            eprintln!("\n**Failed**\n • {err}");
            return EXIT_FAILED;
        }
        Err(err) => {
            eprintln!("error: {err}");
            return EXIT_CONFIG;
        }
    };

    print!("{}", report::summary(&result));

    if let Some(path) = &cli.report {
        if let Err(err) = report::write_json(&config, &result, path) {
            tracing::error!(error = %err, path = %path.display(), "could not write JSON report");
            return EXIT_FAILED;
        }
    }

    EXIT_OK
}
