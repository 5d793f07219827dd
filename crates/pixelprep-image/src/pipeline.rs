// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Fixed-order normalisation pipeline: color mode, then inversion, then resize.

use image::DynamicImage;
use pixelprep_core::{PipelineOptions, Result};
use tracing::{debug, instrument, warn};

use crate::transform::{ColorModeTransform, InversionTransform, ResizeTransform, Transform};

/// Stage order. Inversion must see the color-reduced image so monochrome
/// output inverts cleanly, and resize runs last so the fill canvas is
/// composited from final pixel content.
const STAGES: [&dyn Transform; 3] = [&ColorModeTransform, &InversionTransform, &ResizeTransform];

/// Applies every stage to one image, stopping at the first failure.
///
/// ```ignore
/// let options = PipelineOptions { color_mode: ColorMode::Monochrome, ..Default::default() };
/// let normalised = ImagePipeline::new(&options).process(image::open("digit.png")?)?;
/// ```
#[derive(Debug, Clone, Copy)]
pub struct ImagePipeline<'a> {
    options: &'a PipelineOptions,
}

impl<'a> ImagePipeline<'a> {
    pub fn new(options: &'a PipelineOptions) -> Self {
        Self { options }
    }

    /// Run the image through all stages. No partial result is returned on error.
    #[instrument(skip_all, fields(width = image.width(), height = image.height()))]
    pub fn process(&self, image: DynamicImage) -> Result<DynamicImage> {
        let mut image = image;
        for stage in STAGES {
            image = stage.apply(image, self.options).inspect_err(|err| {
                warn!(stage = stage.name(), error = %err, "Pipeline stage failed");
            })?;
            debug!(
                stage = stage.name(),
                width = image.width(),
                height = image.height(),
                "Stage complete"
            );
        }
        Ok(image)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{ColorType, Rgb, RgbImage};
    use pixelprep_core::{AspectPolicy, ColorMode, FillColor, PixelprepError, ResampleFilter};

    fn half_dark_rgb(width: u32, height: u32) -> DynamicImage {
        DynamicImage::ImageRgb8(RgbImage::from_fn(width, height, |x, _| {
            if x < width / 2 {
                Rgb([10, 10, 10])
            } else {
                Rgb([240, 240, 240])
            }
        }))
    }

    #[test]
    fn default_options_only_convert_to_grayscale() {
        let options = PipelineOptions::default();
        let out = ImagePipeline::new(&options)
            .process(half_dark_rgb(8, 4))
            .unwrap();
        assert_eq!(out.color(), ColorType::L8);
        assert_eq!((out.width(), out.height()), (8, 4));
    }

    #[test]
    fn inverted_monochrome_is_still_binary() {
        let options = PipelineOptions {
            color_mode: ColorMode::Monochrome,
            invert: true,
            ..Default::default()
        };
        let out = ImagePipeline::new(&options)
            .process(half_dark_rgb(64, 64))
            .unwrap();
        let gray = out.to_luma8();
        assert!(gray.pixels().all(|p| p.0[0] == 0 || p.0[0] == 255));
        // Dark half turns white after inversion.
        assert_eq!(gray.get_pixel(0, 0).0[0], 255);
        assert_eq!(gray.get_pixel(63, 0).0[0], 0);
    }

    #[test]
    fn fill_canvas_is_not_inverted() {
        // Resize runs after inversion, so padding keeps the configured color.
        let options = PipelineOptions {
            color_mode: ColorMode::Rgb,
            invert: true,
            target_width: Some(20),
            target_height: Some(20),
            aspect_policy: AspectPolicy::Fill,
            fill_color: FillColor([1, 2, 3]),
            resample_filter: ResampleFilter::Nearest,
            ..Default::default()
        };
        let out = ImagePipeline::new(&options)
            .process(half_dark_rgb(40, 20))
            .unwrap();
        let rgb = out.to_rgb8();
        assert_eq!((rgb.width(), rgb.height()), (20, 20));
        assert_eq!(rgb.get_pixel(0, 0), &Rgb([245, 245, 245]));
        assert_eq!(rgb.get_pixel(0, 19), &Rgb([1, 2, 3]));
    }

    #[test]
    fn first_failure_short_circuits() {
        let options = PipelineOptions {
            target_width: Some(10),
            ..Default::default()
        };
        let empty = DynamicImage::ImageRgb8(RgbImage::new(0, 0));
        let err = ImagePipeline::new(&options).process(empty).unwrap_err();
        // Color-mode fails first, so the resize stage never reports.
        assert!(matches!(err, PixelprepError::Conversion(_)), "got {err:?}");
    }
}
