// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Inversion stage — negate every channel while keeping the caller's color mode.

use image::{ColorType, DynamicImage};
use pixelprep_core::{PipelineOptions, PixelprepError, Result};
use tracing::{debug, instrument};

use super::{Transform, convert_to};

/// Inverts pixel intensities (`max - value`).
///
/// Non-RGB images are widened to 8-bit RGB, inverted there, and narrowed back
/// to their original color type, so the output mode always matches the input.
#[derive(Debug, Clone, Copy, Default)]
pub struct InversionTransform;

impl Transform for InversionTransform {
    fn name(&self) -> &'static str {
        "invert"
    }

    #[instrument(skip_all, fields(invert = options.invert))]
    fn apply(&self, image: DynamicImage, options: &PipelineOptions) -> Result<DynamicImage> {
        if !options.invert {
            return Ok(image);
        }

        let original = image.color();
        let mut rgb = if original == ColorType::Rgb8 {
            image
        } else {
            DynamicImage::ImageRgb8(image.to_rgb8())
        };
        rgb.invert();

        if original == ColorType::Rgb8 {
            return Ok(rgb);
        }

        let narrowed = convert_to(&rgb, original).ok_or_else(|| {
            PixelprepError::Inversion(format!("cannot restore color type {original:?}"))
        })?;
        debug!(color = ?original, "Inverted via RGB round trip");
        Ok(narrowed)
    }
}
