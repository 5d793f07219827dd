// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Command-line arguments.

use std::path::PathBuf;

use clap::Parser;
use pixelprep_core::{
    AspectPolicy, BatchConfig, ColorMode, FillColor, PipelineOptions, ResampleFilter,
};

/// Prepare a directory of images for ML processing.
#[derive(Parser, Debug)]
#[command(
    name = "pixelprep",
    about = "Prepare a directory of images for ML processing",
    long_about = "Normalise every image in a directory: convert the color mode (grayscale, \
                  RGB, or thresholded monochrome), optionally invert, then resize under an \
                  aspect-ratio policy. Files that fail are listed at the end; they never \
                  stop the batch.",
    version
)]
pub struct Cli {
    /// Directory of images to convert
    #[arg(short = 'i', long, value_name = "DIR")]
    pub input: PathBuf,

    /// Directory to write converted images to (must exist and be writable)
    #[arg(short = 'o', long, value_name = "DIR")]
    pub output: PathBuf,

    /// g [grayscale], r [rgb], or m [monochrome b+w]
    #[arg(short = 'c', long, default_value = "g", value_name = "MODE")]
    pub colormode: ColorMode,

    /// Prefix string for exported file names
    #[arg(short = 'p', long, default_value = "")]
    pub prefix: String,

    /// Monochrome threshold: pixels with a value > threshold become white, the rest black
    #[arg(short = 't', long, default_value_t = 40)]
    pub threshold: u8,

    /// Target width for the formatted image (see --aspect and --height)
    #[arg(short = 'W', long, value_parser = clap::value_parser!(u32).range(1..))]
    pub width: Option<u32>,

    /// Target height for the formatted image (see --aspect and --width)
    #[arg(short = 'H', long, value_parser = clap::value_parser!(u32).range(1..))]
    pub height: Option<u32>,

    /// Resampling filter: nearest, triangle, catmull-rom, gaussian, or lanczos3
    #[arg(short = 'r', long, default_value = "lanczos3", value_name = "FILTER")]
    pub resample: ResampleFilter,

    /// Maximum number of files to attempt (0 converts everything)
    #[arg(short = 'n', long, default_value_t = 0)]
    pub number: usize,

    /// Invert colors in the image
    #[arg(short = 'I', long)]
    pub invert: bool,

    /// preserve: keep the aspect ratio within --width/--height.
    /// ignore: stretch to exactly --width x --height.
    /// fill: keep the aspect ratio and pad with --fillcolor to exactly --width x --height.
    #[arg(short = 'a', long, default_value = "fill", value_name = "POLICY", verbatim_doc_comment)]
    pub aspect: AspectPolicy,

    /// Background color for padding, as R,G,B values from 0 to 255 (eg: 200,200,100)
    #[arg(short = 'f', long, default_value = "0,0,0", value_name = "R,G,B")]
    pub fillcolor: FillColor,

    /// Also write the batch result as JSON to this file
    #[arg(long, value_name = "FILE")]
    pub report: Option<PathBuf>,

    /// Hide the progress bar
    #[arg(short, long)]
    pub quiet: bool,

    /// Log each file as it is processed
    #[arg(short, long, conflicts_with = "quiet")]
    pub verbose: bool,
}

impl Cli {
    pub fn pipeline_options(&self) -> PipelineOptions {
        PipelineOptions {
            color_mode: self.colormode,
            threshold: self.threshold,
            target_width: self.width,
            target_height: self.height,
            aspect_policy: self.aspect,
            fill_color: self.fillcolor,
            resample_filter: self.resample,
            invert: self.invert,
        }
    }

    pub fn batch_config(&self) -> BatchConfig {
        BatchConfig::new(&self.input, &self.output)
            .with_prefix(&self.prefix)
            .with_max_files(self.number)
            .with_options(self.pipeline_options())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(extra: &[&str]) -> Result<Cli, clap::Error> {
        let mut argv = vec!["pixelprep", "-i", "in", "-o", "out"];
        argv.extend_from_slice(extra);
        Cli::try_parse_from(argv)
    }

    fn parse_line(extra: &str) -> Result<Cli, clap::Error> {
        parse(&extra.split_whitespace().collect::<Vec<_>>())
    }

    #[test]
    fn defaults_match_documented_values() {
        let cli = parse(&[]).unwrap();
        let config = cli.batch_config();
        assert_eq!(config.input, PathBuf::from("in"));
        assert_eq!(config.output, PathBuf::from("out"));
        assert_eq!(config.prefix, "");
        assert_eq!(config.max_files, 0);
        assert_eq!(config.options, PipelineOptions::default());
        assert!(cli.report.is_none());
    }

    #[test]
    fn all_options_are_mapped() {
        let cli = parse_line(
            "-c m -p small_ -t 100 -W 28 -H 32 -r bicubic -n 5 -I -a preserve -f 200,200,100",
        )
        .unwrap();
        let config = cli.batch_config();
        assert_eq!(config.prefix, "small_");
        assert_eq!(config.max_files, 5);

        let opts = config.options;
        assert_eq!(opts.color_mode, ColorMode::Monochrome);
        assert_eq!(opts.threshold, 100);
        assert_eq!(opts.target_width, Some(28));
        assert_eq!(opts.target_height, Some(32));
        assert_eq!(opts.resample_filter, ResampleFilter::CatmullRom);
        assert!(opts.invert);
        assert_eq!(opts.aspect_policy, AspectPolicy::Preserve);
        assert_eq!(opts.fill_color, FillColor([200, 200, 100]));
    }

    #[test]
    fn long_flags_are_accepted() {
        let cli = parse_line("--colormode r --aspect ignore --fillcolor 1,2,3").unwrap();
        assert_eq!(cli.colormode, ColorMode::Rgb);
        assert_eq!(cli.aspect, AspectPolicy::Ignore);
        assert_eq!(cli.fillcolor, FillColor([1, 2, 3]));
    }

    #[test]
    fn malformed_fill_color_is_rejected() {
        assert!(parse(&["-f", "1,2"]).is_err());
        assert!(parse(&["-f", "red"]).is_err());
        assert!(parse(&["-f", "0,0,300"]).is_err());
    }

    #[test]
    fn out_of_range_values_are_rejected() {
        assert!(parse(&["-W", "0"]).is_err());
        assert!(parse(&["-H", "-5"]).is_err());
        assert!(parse(&["-t", "256"]).is_err());
        assert!(parse(&["-c", "x"]).is_err());
        assert!(parse(&["-a", "stretch"]).is_err());
    }

    #[test]
    fn input_and_output_are_required() {
        assert!(Cli::try_parse_from(["pixelprep", "-i", "in"]).is_err());
        assert!(Cli::try_parse_from(["pixelprep", "-o", "out"]).is_err());
    }

    #[test]
    fn quiet_conflicts_with_verbose() {
        assert!(parse(&["-q", "-v"]).is_err());
    }
}
