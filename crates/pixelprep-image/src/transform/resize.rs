// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Resize stage — scale to a target size under an aspect policy, optionally
// letterboxing onto a filled canvas.

use image::imageops::{self, FilterType};
use image::{DynamicImage, Rgb, RgbImage};
use pixelprep_core::{AspectPolicy, PipelineOptions, PixelprepError, ResampleFilter, Result};
use tracing::{debug, info, instrument};

use super::{Transform, convert_to};

/// Image axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    Width,
    Height,
}

impl Axis {
    fn other(self) -> Self {
        match self {
            Self::Width => Self::Height,
            Self::Height => Self::Width,
        }
    }

    fn of(self, size: (u32, u32)) -> u32 {
        match self {
            Self::Width => size.0,
            Self::Height => size.1,
        }
    }

    fn set(self, size: &mut (u32, u32), value: u32) {
        match self {
            Self::Width => size.0 = value,
            Self::Height => size.1 = value,
        }
    }
}

/// Largest resample or canvas buffer, in pixels, a single image may plan.
pub const MAX_PLANNED_PIXELS: u64 = 1 << 26;

/// Output geometry computed before any pixels are touched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResizePlan {
    /// Top-left region of the original that is resampled.
    pub source: (u32, u32),
    /// Size the source region is resampled to.
    pub resized: (u32, u32),
    /// Size of the background canvas, for the fill policy.
    pub canvas: Option<(u32, u32)>,
}

impl ResizePlan {
    /// Work out the resample and canvas sizes for an image of `original` size.
    ///
    /// Returns `None` when no target size is configured.
    pub fn compute(original: (u32, u32), options: &PipelineOptions) -> Option<Self> {
        if !options.resizes() {
            return None;
        }

        let requested = (
            options.target_width.unwrap_or(original.0),
            options.target_height.unwrap_or(original.1),
        );

        let mut source = original;
        let resized = match options.aspect_policy {
            AspectPolicy::Ignore => requested,
            AspectPolicy::Fill => {
                let axis = driving_axis(options.target_width, options.target_height);
                let size = anchored_size(original, requested, axis);
                // Only the part that lands on the canvas is resampled.
                let other = axis.other();
                let (full, visible) = (other.of(size), other.of(requested));
                if full > visible {
                    let kept = (f64::from(other.of(original)) * f64::from(visible)
                        / f64::from(full))
                    .round()
                    .clamp(1.0, f64::from(other.of(original)));
                    other.set(&mut source, kept as u32);
                    requested
                } else {
                    size
                }
            }
            AspectPolicy::Preserve => {
                let axis = driving_axis(options.target_width, options.target_height);
                let size = anchored_size(original, requested, axis);
                // Re-anchor on the other axis if it overshoots an explicit target.
                let limit = match axis.other() {
                    Axis::Width => options.target_width,
                    Axis::Height => options.target_height,
                };
                match limit {
                    Some(limit) if axis.other().of(size) > limit => {
                        anchored_size(original, requested, axis.other())
                    }
                    _ => size,
                }
            }
        };

        let canvas = (options.aspect_policy == AspectPolicy::Fill).then_some(requested);
        Some(Self {
            source,
            resized,
            canvas,
        })
    }

    /// Pixel count of the largest buffer this plan allocates.
    pub fn peak_pixels(&self) -> u64 {
        let area = |(w, h): (u32, u32)| u64::from(w) * u64::from(h);
        area(self.resized).max(self.canvas.map_or(0, area))
    }
}

/// The axis whose target sets the scale factor.
///
/// With both targets set, the numerically smaller one drives; equal targets
/// resolve to width. With a single target, that axis drives.
pub fn driving_axis(target_width: Option<u32>, target_height: Option<u32>) -> Axis {
    match (target_width, target_height) {
        (Some(width), Some(height)) if height < width => Axis::Height,
        (None, Some(_)) => Axis::Height,
        _ => Axis::Width,
    }
}

/// Scale `original` so the `axis` dimension equals `requested` on that axis,
/// rounding the other dimension to the nearest pixel (minimum 1).
fn anchored_size(original: (u32, u32), requested: (u32, u32), axis: Axis) -> (u32, u32) {
    let ratio = f64::from(axis.of(requested)) / f64::from(axis.of(original));
    let other = (f64::from(axis.other().of(original)) * ratio).round().max(1.0);

    let mut size = requested;
    axis.other().set(&mut size, other.min(f64::from(u32::MAX)) as u32);
    size
}

/// Map the configured filter onto the `image` crate's filter type.
pub fn filter_type(filter: ResampleFilter) -> FilterType {
    match filter {
        ResampleFilter::Nearest => FilterType::Nearest,
        ResampleFilter::Triangle => FilterType::Triangle,
        ResampleFilter::CatmullRom => FilterType::CatmullRom,
        ResampleFilter::Gaussian => FilterType::Gaussian,
        ResampleFilter::Lanczos3 => FilterType::Lanczos3,
    }
}

/// Resizes to the requested width/height under the configured aspect policy.
#[derive(Debug, Clone, Copy, Default)]
pub struct ResizeTransform;

impl Transform for ResizeTransform {
    fn name(&self) -> &'static str {
        "resize"
    }

    #[instrument(skip_all, fields(
        width = ?options.target_width,
        height = ?options.target_height,
        aspect = %options.aspect_policy
    ))]
    fn apply(&self, image: DynamicImage, options: &PipelineOptions) -> Result<DynamicImage> {
        if !options.resizes() {
            return Ok(image);
        }

        let original = (image.width(), image.height());
        if original.0 == 0 || original.1 == 0 {
            return Err(PixelprepError::Resize(format!(
                "cannot resize an empty image ({}x{})",
                original.0, original.1
            )));
        }

        let Some(plan) = ResizePlan::compute(original, options) else {
            return Ok(image);
        };

        if plan.peak_pixels() > MAX_PLANNED_PIXELS {
            return Err(PixelprepError::Resize(format!(
                "{}x{} to {}x{} needs {} pixels, over the limit of {}",
                original.0,
                original.1,
                plan.resized.0,
                plan.resized.1,
                plan.peak_pixels(),
                MAX_PLANNED_PIXELS
            )));
        }

        info!(
            from_w = original.0,
            from_h = original.1,
            to_w = plan.resized.0,
            to_h = plan.resized.1,
            "Resizing image"
        );
        let image = if plan.source == original {
            image
        } else {
            image.crop_imm(0, 0, plan.source.0, plan.source.1)
        };
        let resized = image.resize_exact(
            plan.resized.0,
            plan.resized.1,
            filter_type(options.resample_filter),
        );

        let Some((canvas_w, canvas_h)) = plan.canvas else {
            return Ok(resized);
        };

        let background = DynamicImage::ImageRgb8(RgbImage::from_pixel(
            canvas_w,
            canvas_h,
            Rgb(options.fill_color.rgb()),
        ));
        let mut canvas = convert_to(&background, resized.color()).ok_or_else(|| {
            PixelprepError::Resize(format!(
                "cannot build a fill canvas for color type {:?}",
                resized.color()
            ))
        })?;
        imageops::replace(&mut canvas, &resized, 0, 0);

        debug!(canvas_w, canvas_h, fill = %options.fill_color, "Pasted onto fill canvas");
        Ok(canvas)
    }
}
