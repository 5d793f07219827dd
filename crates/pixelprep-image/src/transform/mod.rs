// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Transform module — the three pipeline stages and the trait they share.

pub mod color_mode;
pub mod invert;
pub mod resize;

pub use color_mode::ColorModeTransform;
pub use invert::InversionTransform;
pub use resize::ResizeTransform;

use image::{ColorType, DynamicImage, GrayImage, Luma};
use pixelprep_core::{PipelineOptions, Result};

/// A single stage of the normalisation pipeline.
///
/// Stages take ownership of the working image and return the transformed
/// image. They read settings only from the `options` they are handed.
pub trait Transform {
    /// Short stage name used in logs.
    fn name(&self) -> &'static str;

    fn apply(&self, image: DynamicImage, options: &PipelineOptions) -> Result<DynamicImage>;
}

/// 8-bit luma with Rec.601 weights (0.299, 0.587, 0.114), rounded.
///
/// Gray input maps to itself, since the fixed-point weights sum to exactly 1.
pub(crate) fn luma601(image: &DynamicImage) -> GrayImage {
    if let DynamicImage::ImageLuma8(gray) = image {
        return gray.clone();
    }
    let rgb = image.to_rgb8();
    GrayImage::from_fn(rgb.width(), rgb.height(), |x, y| {
        let [r, g, b] = rgb.get_pixel(x, y).0;
        let weighted = u32::from(r) * 19595 + u32::from(g) * 38470 + u32::from(b) * 7471;
        Luma([((weighted + 0x8000) >> 16) as u8])
    })
}

/// Convert `image` to the given color type. 8-bit luma uses [`luma601`].
///
/// Returns `None` for color types the `image` crate adds in future releases.
pub(crate) fn convert_to(image: &DynamicImage, color: ColorType) -> Option<DynamicImage> {
    let converted = match color {
        ColorType::L8 => DynamicImage::ImageLuma8(luma601(image)),
        ColorType::La8 => DynamicImage::ImageLumaA8(image.to_luma_alpha8()),
        ColorType::Rgb8 => DynamicImage::ImageRgb8(image.to_rgb8()),
        ColorType::Rgba8 => DynamicImage::ImageRgba8(image.to_rgba8()),
        ColorType::L16 => DynamicImage::ImageLuma16(image.to_luma16()),
        ColorType::La16 => DynamicImage::ImageLumaA16(image.to_luma_alpha16()),
        ColorType::Rgb16 => DynamicImage::ImageRgb16(image.to_rgb16()),
        ColorType::Rgba16 => DynamicImage::ImageRgba16(image.to_rgba16()),
        ColorType::Rgb32F => DynamicImage::ImageRgb32F(image.to_rgb32f()),
        ColorType::Rgba32F => DynamicImage::ImageRgba32F(image.to_rgba32f()),
        _ => return None,
    };
    Some(converted)
}
