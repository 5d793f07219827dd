// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Batch run configuration.

use std::ffi::{OsStr, OsString};
use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::error::{PixelprepError, Result};
use crate::types::PipelineOptions;

/// Settings for one batch run, resolved once at startup.
///
/// Serialised into the JSON run report next to the result.
#[derive(Debug, Clone, Serialize)]
pub struct BatchConfig {
    /// Directory to read source images from.
    pub input: PathBuf,
    /// Directory converted images are written to.
    pub output: PathBuf,
    /// Prepended to each original file name on output.
    pub prefix: String,
    /// Maximum number of files to attempt. 0 means no limit.
    pub max_files: usize,
    /// Per-image transform settings.
    pub options: PipelineOptions,
}

impl BatchConfig {
    /// A config with no prefix, no file cap, and default options.
    pub fn new(input: impl Into<PathBuf>, output: impl Into<PathBuf>) -> Self {
        Self {
            input: input.into(),
            output: output.into(),
            prefix: String::new(),
            max_files: 0,
            options: PipelineOptions::default(),
        }
    }

    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = prefix.into();
        self
    }

    pub fn with_max_files(mut self, max_files: usize) -> Self {
        self.max_files = max_files;
        self
    }

    pub fn with_options(mut self, options: PipelineOptions) -> Self {
        self.options = options;
        self
    }

    /// The attempt cap, if any.
    pub fn file_limit(&self) -> Option<usize> {
        (self.max_files > 0).then_some(self.max_files)
    }

    /// Destination path for a source file name: `<output>/<prefix><name>`.
    pub fn output_path(&self, file_name: &OsStr) -> PathBuf {
        let mut name = OsString::from(&self.prefix);
        name.push(file_name);
        self.output.join(name)
    }

    /// Check everything that can be known before touching any file.
    ///
    /// The destination is not checked here; writability is probed by the
    /// batch runner itself.
    pub fn validate(&self) -> Result<()> {
        if !is_dir(&self.input) {
            return Err(PixelprepError::Configuration(format!(
                "input <{}> is not a readable directory",
                self.input.display()
            )));
        }
        if self.prefix.contains(['/', '\\']) {
            return Err(PixelprepError::Configuration(format!(
                "prefix '{}' must not contain path separators",
                self.prefix
            )));
        }
        self.options.validate()
    }
}

fn is_dir(path: &Path) -> bool {
    std::fs::metadata(path).map(|m| m.is_dir()).unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn output_path_applies_prefix() {
        let config = BatchConfig::new("in", "/data/out").with_prefix("small_");
        assert_eq!(
            config.output_path(OsStr::new("a.png")),
            PathBuf::from("/data/out/small_a.png")
        );
    }

    #[test]
    fn output_path_without_prefix_keeps_name() {
        let config = BatchConfig::new("in", "out");
        assert_eq!(config.output_path(OsStr::new("b.jpg")), PathBuf::from("out/b.jpg"));
    }

    #[test]
    fn file_limit_zero_is_unlimited() {
        let config = BatchConfig::new("in", "out");
        assert_eq!(config.file_limit(), None);
        assert_eq!(config.with_max_files(3).file_limit(), Some(3));
    }

    #[test]
    fn validate_requires_existing_input_dir() {
        let tmp = tempfile::tempdir().unwrap();
        let config = BatchConfig::new(tmp.path().join("missing"), tmp.path());
        assert!(matches!(
            config.validate(),
            Err(PixelprepError::Configuration(_))
        ));

        let config = BatchConfig::new(tmp.path(), tmp.path());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn validate_rejects_prefix_with_separator() {
        let tmp = tempfile::tempdir().unwrap();
        let config = BatchConfig::new(tmp.path(), tmp.path()).with_prefix("../escape_");
        assert!(config.validate().is_err());
    }

    #[test]
    fn validate_checks_pipeline_options() {
        let tmp = tempfile::tempdir().unwrap();
        let options = PipelineOptions {
            target_height: Some(0),
            ..Default::default()
        };
        let config = BatchConfig::new(tmp.path(), tmp.path()).with_options(options);
        assert!(config.validate().is_err());
    }

    #[test]
    fn new_uses_default_options() {
        let config = BatchConfig::new("in", "out");
        assert_eq!(config.prefix, "");
        assert_eq!(config.max_files, 0);
        assert_eq!(config.options, PipelineOptions::default());
    }

    #[test]
    fn config_serializes_with_options() {
        let config = BatchConfig::new("in", "out").with_prefix("p_").with_max_files(5);
        let value = serde_json::to_value(&config).unwrap();
        assert_eq!(value["prefix"], "p_");
        assert_eq!(value["max_files"], 5);
        assert_eq!(value["options"]["color_mode"], "grayscale");
        assert_eq!(value["options"]["threshold"], 40);
    }
}
