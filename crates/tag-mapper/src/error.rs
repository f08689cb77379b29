// Copyright (c) Asymptotic Labs
// SPDX-License-Identifier: Apache-2.0

//! Input validation errors. Any of these aborts the run before anything is written.

use std::path::{Path, PathBuf};

use log::info;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum InputError {
    #[error("{label} file not found: {}", .path.display())]
    NotFound { label: &'static str, path: PathBuf },

    #[error("{label} path is not a file: {}", .path.display())]
    NotAFile { label: &'static str, path: PathBuf },

    #[error("column '{column}' not found. Available: {available:?}")]
    MissingColumn {
        column: String,
        available: Vec<String>,
    },

    #[error("no rows with topic \"{topic}\" found in {}", .path.display())]
    NoTopicRows { topic: String, path: PathBuf },
}

/// Fails unless `path` names an existing regular file.
pub fn check_input(label: &'static str, path: &Path) -> Result<(), InputError> {
    info!("checking {} path: {}", label, path.display());
    if !path.exists() {
        return Err(InputError::NotFound {
            label,
            path: path.to_path_buf(),
        });
    }
    if !path.is_file() {
        return Err(InputError::NotAFile {
            label,
            path: path.to_path_buf(),
        });
    }
    Ok(())
}
