// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// pixelprep-image — Image normalisation for machine-learning ingestion.
//
// Provides the per-image transforms (color mode, inversion, resize/fill), the
// fixed-order pipeline that composes them, and the batch runner that applies
// the pipeline across a directory with per-file failure isolation.

pub mod batch;
pub mod pipeline;
pub mod transform;

// Re-export the primary types so callers can use `pixelprep_image::BatchRunner` etc.
pub use batch::{BatchObserver, BatchRunner, FileOutcome, NoopObserver};
pub use pipeline::ImagePipeline;
pub use transform::{ColorModeTransform, InversionTransform, ResizeTransform, Transform};
