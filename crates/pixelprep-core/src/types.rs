// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Core domain types for the Pixelprep normalisation pipeline.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::PixelprepError;

/// Target color representation for the color-mode stage.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColorMode {
    /// Single-channel 8-bit luma.
    #[default]
    Grayscale,
    /// Luma binarized to pure black and pure white.
    Monochrome,
    /// Three-channel 8-bit RGB.
    Rgb,
}

impl ColorMode {
    /// One-letter code accepted on the command line.
    pub fn code(self) -> char {
        match self {
            Self::Grayscale => 'g',
            Self::Monochrome => 'm',
            Self::Rgb => 'r',
        }
    }
}

impl fmt::Display for ColorMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

impl FromStr for ColorMode {
    type Err = PixelprepError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "g" | "grayscale" | "greyscale" => Ok(Self::Grayscale),
            "m" | "monochrome" => Ok(Self::Monochrome),
            "r" | "rgb" => Ok(Self::Rgb),
            other => Err(PixelprepError::Configuration(format!(
                "unknown color mode '{other}' (expected g, r, or m)"
            ))),
        }
    }
}

/// How a resize reconciles the original proportions with the requested size.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AspectPolicy {
    /// Keep the original aspect ratio, bounded by the requested size.
    Preserve,
    /// Stretch to exactly the requested size.
    Ignore,
    /// Keep the aspect ratio and pad onto a canvas of exactly the requested size.
    #[default]
    Fill,
}

impl FromStr for AspectPolicy {
    type Err = PixelprepError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "preserve" => Ok(Self::Preserve),
            "ignore" => Ok(Self::Ignore),
            "fill" => Ok(Self::Fill),
            other => Err(PixelprepError::Configuration(format!(
                "unknown aspect policy '{other}' (expected preserve, ignore, or fill)"
            ))),
        }
    }
}

impl fmt::Display for AspectPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Preserve => "preserve",
            Self::Ignore => "ignore",
            Self::Fill => "fill",
        };
        f.write_str(name)
    }
}

/// Background color for fill canvases, as an RGB triple.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FillColor(pub [u8; 3]);

impl FillColor {
    pub const BLACK: Self = Self([0, 0, 0]);

    pub fn rgb(self) -> [u8; 3] {
        self.0
    }
}

impl FromStr for FillColor {
    type Err = PixelprepError;

    /// Parse `"R,G,B"` where each channel is an integer in 0..=255.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || {
            PixelprepError::Configuration(format!(
                "fill color '{s}' must be three comma-separated values \
                 from 0 to 255 (eg: 200,200,100)"
            ))
        };

        let channels = s
            .split(',')
            .map(|part| part.trim().parse::<u8>())
            .collect::<Result<Vec<_>, _>>()
            .map_err(|_| invalid())?;

        let rgb: [u8; 3] = channels.try_into().map_err(|_| invalid())?;
        Ok(Self(rgb))
    }
}

impl fmt::Display for FillColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [r, g, b] = self.0;
        write!(f, "{r},{g},{b}")
    }
}

/// Resampling filter used when resizing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ResampleFilter {
    Nearest,
    /// Linear interpolation.
    Triangle,
    /// Cubic interpolation.
    CatmullRom,
    Gaussian,
    /// Lanczos with window 3. Best quality, slowest.
    #[default]
    Lanczos3,
}

impl FromStr for ResampleFilter {
    type Err = PixelprepError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "nearest" => Ok(Self::Nearest),
            "triangle" | "bilinear" => Ok(Self::Triangle),
            "catmull-rom" | "catmullrom" | "bicubic" => Ok(Self::CatmullRom),
            "gaussian" => Ok(Self::Gaussian),
            "lanczos3" | "lanczos" => Ok(Self::Lanczos3),
            other => Err(PixelprepError::Configuration(format!(
                "unknown resample filter '{other}' \
                 (expected nearest, triangle, catmull-rom, gaussian, or lanczos3)"
            ))),
        }
    }
}

/// Immutable settings for a single pipeline run.
///
/// Built once from command input and passed by reference into every
/// transform. Nothing in the pipeline reads configuration from anywhere else.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineOptions {
    pub color_mode: ColorMode,
    /// Luma values strictly greater than this become white in monochrome mode.
    pub threshold: u8,
    pub target_width: Option<u32>,
    pub target_height: Option<u32>,
    pub aspect_policy: AspectPolicy,
    pub fill_color: FillColor,
    pub resample_filter: ResampleFilter,
    pub invert: bool,
}

impl Default for PipelineOptions {
    fn default() -> Self {
        Self {
            color_mode: ColorMode::Grayscale,
            threshold: 40,
            target_width: None,
            target_height: None,
            aspect_policy: AspectPolicy::Fill,
            fill_color: FillColor::BLACK,
            resample_filter: ResampleFilter::Lanczos3,
            invert: false,
        }
    }
}

impl PipelineOptions {
    /// Whether the resize stage has anything to do.
    pub fn resizes(&self) -> bool {
        self.target_width.is_some() || self.target_height.is_some()
    }

    /// Reject values the type system cannot rule out.
    pub fn validate(&self) -> Result<(), PixelprepError> {
        if self.target_width == Some(0) {
            return Err(PixelprepError::Configuration(
                "target width must be a positive integer".into(),
            ));
        }
        if self.target_height == Some(0) {
            return Err(PixelprepError::Configuration(
                "target height must be a positive integer".into(),
            ));
        }
        Ok(())
    }
}

/// A single file that could not be converted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileError {
    pub file_name: String,
    pub message: String,
}

impl fmt::Display for FileError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.file_name, self.message)
    }
}

/// Outcome of a batch run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BatchResult {
    /// Files attempted, successful or not. Counts toward the file cap.
    pub attempted: usize,
    /// Files read, processed, and written successfully.
    pub converted_count: usize,
    /// Failures in processing order.
    pub errors: Vec<FileError>,
    pub started_at: DateTime<Utc>,
    pub finished_at: Option<DateTime<Utc>>,
}

impl BatchResult {
    pub fn new() -> Self {
        Self {
            attempted: 0,
            converted_count: 0,
            errors: Vec::new(),
            started_at: Utc::now(),
            finished_at: None,
        }
    }

    pub fn record_success(&mut self) {
        self.attempted += 1;
        self.converted_count += 1;
    }

    pub fn record_failure(&mut self, file_name: impl Into<String>, message: impl Into<String>) {
        self.attempted += 1;
        self.errors.push(FileError {
            file_name: file_name.into(),
            message: message.into(),
        });
    }

    pub fn finish(&mut self) {
        self.finished_at = Some(Utc::now());
    }

    pub fn failed_count(&self) -> usize {
        self.errors.len()
    }
}

impl Default for BatchResult {
    fn default() -> Self {
        Self::new()
    }
}
