// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Color-mode stage — RGB, grayscale, and thresholded monochrome conversion.

use image::{ColorType, DynamicImage, GrayImage, Luma};
use imageproc::stats::histogram;
use pixelprep_core::{ColorMode, PipelineOptions, PixelprepError, Result};
use tracing::{debug, instrument};

use super::{Transform, luma601};

/// Number of bits kept by the posterize step before monochrome thresholding.
const MONOCHROME_POSTERIZE_BITS: u8 = 2;

/// Converts the working image to the requested color mode.
///
/// Monochrome output is produced in four steps: luma conversion, posterize
/// to two bits, histogram equalization, then a strict-greater threshold.
#[derive(Debug, Clone, Copy, Default)]
pub struct ColorModeTransform;

impl Transform for ColorModeTransform {
    fn name(&self) -> &'static str {
        "color-mode"
    }

    #[instrument(skip_all, fields(mode = %options.color_mode, threshold = options.threshold))]
    fn apply(&self, image: DynamicImage, options: &PipelineOptions) -> Result<DynamicImage> {
        if image.width() == 0 || image.height() == 0 {
            return Err(PixelprepError::Conversion(format!(
                "image has no pixels ({}x{})",
                image.width(),
                image.height()
            )));
        }

        let from = image.color();
        let converted = match options.color_mode {
            ColorMode::Rgb if from == ColorType::Rgb8 => image,
            ColorMode::Rgb => DynamicImage::ImageRgb8(image.to_rgb8()),
            ColorMode::Grayscale if from == ColorType::L8 => image,
            ColorMode::Grayscale => DynamicImage::ImageLuma8(luma601(&image)),
            ColorMode::Monochrome => {
                let gray = posterize(&luma601(&image), MONOCHROME_POSTERIZE_BITS);
                let equalized = equalize(&gray);
                DynamicImage::ImageLuma8(binarize(&equalized, options.threshold))
            }
        };

        debug!(from = ?from, to = ?converted.color(), "Color mode applied");
        Ok(converted)
    }
}

/// Keep only the `bits` most significant bits of every luma value.
pub fn posterize(gray: &GrayImage, bits: u8) -> GrayImage {
    let bits = bits.clamp(1, 8);
    let mask = !(0xffu8 >> bits);
    let mut out = gray.clone();
    for pixel in out.pixels_mut() {
        pixel.0[0] &= mask;
    }
    out
}

/// Spread the luma histogram so each occupied level gets an even share of
/// the output range.
///
/// The darkest occupied level always maps to 0. The most populated level at
/// the top of the range is excluded from the step size, so a two-level image
/// becomes pure black and pure white. Single-level images are returned as is.
pub fn equalize(gray: &GrayImage) -> GrayImage {
    let bins = histogram(gray).channels[0];

    let total: u64 = bins.iter().map(|&count| u64::from(count)).sum();
    let last = bins.iter().rev().find(|&&count| count > 0).copied().unwrap_or(0);
    let step = (total - u64::from(last)) / 255;
    if step == 0 {
        return gray.clone();
    }

    let mut lut = [0u8; 256];
    let mut acc = step / 2;
    for (level, &count) in bins.iter().enumerate() {
        lut[level] = (acc / step).min(255) as u8;
        acc += u64::from(count);
    }

    let mut out = gray.clone();
    for pixel in out.pixels_mut() {
        pixel.0[0] = lut[pixel.0[0] as usize];
    }
    out
}

/// Map luma strictly greater than `threshold` to white, everything else to black.
pub fn binarize(gray: &GrayImage, threshold: u8) -> GrayImage {
    GrayImage::from_fn(gray.width(), gray.height(), |x, y| {
        let value = gray.get_pixel(x, y).0[0];
        Luma([if value > threshold { 255u8 } else { 0u8 }])
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgb, RgbImage, Rgba, RgbaImage};

    fn gradient_rgb(width: u32, height: u32) -> DynamicImage {
        DynamicImage::ImageRgb8(RgbImage::from_fn(width, height, |x, y| {
            let v = ((x * 255) / width.max(1)) as u8;
            Rgb([v, (y % 256) as u8, 255 - v])
        }))
    }

    fn apply(image: DynamicImage, mode: ColorMode) -> Result<DynamicImage> {
        let options = PipelineOptions {
            color_mode: mode,
            ..Default::default()
        };
        ColorModeTransform.apply(image, &options)
    }

    #[test]
    fn rgb_mode_widens_grayscale() {
        let gray = DynamicImage::ImageLuma8(GrayImage::from_pixel(5, 4, Luma([77])));
        let out = apply(gray, ColorMode::Rgb).unwrap();
        assert_eq!(out.color(), ColorType::Rgb8);
        assert_eq!(out.to_rgb8().get_pixel(2, 2), &Rgb([77, 77, 77]));
    }

    #[test]
    fn rgb_mode_drops_alpha() {
        let rgba = DynamicImage::ImageRgba8(RgbaImage::from_pixel(3, 3, Rgba([1, 2, 3, 100])));
        let out = apply(rgba, ColorMode::Rgb).unwrap();
        assert_eq!(out.color(), ColorType::Rgb8);
    }

    #[test]
    fn grayscale_mode_yields_single_channel() {
        let out = apply(gradient_rgb(16, 8), ColorMode::Grayscale).unwrap();
        assert_eq!(out.color(), ColorType::L8);
        assert_eq!((out.width(), out.height()), (16, 8));
    }

    #[test]
    fn grayscale_mode_weights_green_heaviest() {
        let red = DynamicImage::ImageRgb8(RgbImage::from_pixel(2, 2, Rgb([255, 0, 0])));
        let green = DynamicImage::ImageRgb8(RgbImage::from_pixel(2, 2, Rgb([0, 255, 0])));
        let red = apply(red, ColorMode::Grayscale).unwrap().to_luma8();
        let green = apply(green, ColorMode::Grayscale).unwrap().to_luma8();
        assert_eq!(red.get_pixel(0, 0).0[0], 76);
        assert_eq!(green.get_pixel(1, 1).0[0], 150);
    }

    #[test]
    fn monochrome_mode_is_pure_black_and_white() {
        let out = apply(gradient_rgb(64, 32), ColorMode::Monochrome).unwrap();
        assert_eq!(out.color(), ColorType::L8);
        let gray = out.to_luma8();
        assert!(gray.pixels().all(|p| p.0[0] == 0 || p.0[0] == 255));
        // The gradient spans dark and light, so both levels must be present.
        assert!(gray.pixels().any(|p| p.0[0] == 0));
        assert!(gray.pixels().any(|p| p.0[0] == 255));
    }

    #[test]
    fn binarize_uses_strict_greater_than() {
        let threshold = 40u8;
        let gray = GrayImage::from_fn(3, 1, |x, _| Luma([threshold - 1 + x as u8]));
        let out = binarize(&gray, threshold);
        assert_eq!(out.get_pixel(0, 0).0[0], 0, "below threshold");
        assert_eq!(out.get_pixel(1, 0).0[0], 0, "equal to threshold");
        assert_eq!(out.get_pixel(2, 0).0[0], 255, "one above threshold");
    }

    #[test]
    fn binarize_at_max_threshold_is_all_black() {
        let gray = GrayImage::from_pixel(4, 4, Luma([255]));
        assert!(binarize(&gray, 255).pixels().all(|p| p.0[0] == 0));
    }

    #[test]
    fn equalize_spreads_levels_from_black() {
        // Four equally populated levels, as posterize leaves them.
        let gray = GrayImage::from_fn(4, 255, |x, _| Luma([(x * 64) as u8]));
        let out = equalize(&gray);
        assert_eq!(out.get_pixel(0, 0).0[0], 0);
        assert_eq!(out.get_pixel(1, 0).0[0], 85);
        assert_eq!(out.get_pixel(2, 0).0[0], 170);
        assert_eq!(out.get_pixel(3, 0).0[0], 255);
    }

    #[test]
    fn equalize_leaves_uniform_image_alone() {
        let gray = GrayImage::from_pixel(8, 8, Luma([123]));
        assert_eq!(equalize(&gray), gray);
    }

    #[test]
    fn posterize_keeps_top_bits() {
        let gray = GrayImage::from_fn(4, 1, |x, _| Luma([[0u8, 63, 64, 255][x as usize]]));
        let out = posterize(&gray, 2);
        let values: Vec<u8> = out.pixels().map(|p| p.0[0]).collect();
        assert_eq!(values, vec![0, 0, 64, 192]);
    }

    #[test]
    fn empty_image_is_a_conversion_error() {
        let empty = DynamicImage::ImageRgb8(RgbImage::new(0, 0));
        let err = apply(empty, ColorMode::Monochrome).unwrap_err();
        assert!(matches!(err, PixelprepError::Conversion(_)), "got {err:?}");
    }
}
