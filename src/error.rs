// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Jonathan D. A. Jewell <hyperpolymath>

//! Error types for the image renamer

use thiserror::Error;

/// Result type alias for renamer operations
pub type Result<T> = std::result::Result<T, RenamerError>;

/// Renamer error types
#[derive(Error, Debug)]
pub enum RenamerError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("File system error: {0}")]
    FileSystem(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Prompt error: {0}")]
    Prompt(#[from] dialoguer::Error),

    #[error("Invalid folder: {0}")]
    InvalidFolder(String),

    #[error("Base name must not be empty")]
    EmptyBaseName,
}
