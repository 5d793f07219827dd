// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Unified error types for Pixelprep.

use std::path::PathBuf;

use thiserror::Error;

/// Top-level error type for all Pixelprep operations.
#[derive(Debug, Error)]
pub enum PixelprepError {
    // -- Run-fatal errors --
    #[error("<{}> does not exist or is not writable: {reason}", .path.display())]
    DestinationUnwritable { path: PathBuf, reason: String },

    #[error("invalid configuration: {0}")]
    Configuration(String),

    // -- Per-file errors --
    #[error("error reading file: {0}")]
    Read(String),

    #[error("color conversion failed: {0}")]
    Conversion(String),

    #[error("inversion failed: {0}")]
    Inversion(String),

    #[error("resize failed: {0}")]
    Resize(String),

    #[error("{0}")]
    Write(String),

    // -- Storage / persistence --
    #[error("file I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl PixelprepError {
    /// Whether this error must end the whole run rather than a single file.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            Self::DestinationUnwritable { .. } | Self::Configuration(_)
        )
    }
}

/// Alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, PixelprepError>;
