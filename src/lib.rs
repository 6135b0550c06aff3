// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Jonathan D. A. Jewell <hyperpolymath>

//! Img Renamer: Interactive Bulk Image Renamer
//!
//! Renames every image in a folder to `"<base name> - <n>.<ext>"`, driven by
//! a short prompt sequence that can be repeated for as many folders as needed.

pub mod config;
pub mod error;
pub mod executor;
pub mod filter;
pub mod folder;
pub mod history;
pub mod plan;
pub mod session;
pub mod ui;

pub use config::AppConfig;
pub use error::{RenamerError, Result};
