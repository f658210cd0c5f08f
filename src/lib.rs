// Copyright © 2026 Quillpost. All rights reserved.
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! # Quillpost Library
//!
//! Quillpost turns the loosely formatted text an author types into a blog
//! editor into HTML with embedded media, and derives a thumbnail for the
//! article cards that list those posts.
//!
//! The two core operations are [`transform`] and [`resolve_thumbnail`].
//! Everything else (frontmatter parsing, page templates, output writing and
//! the CLI) is built on top of them.

#![doc = include_str!("../README.md")]
#![crate_name = "quillpost"]
#![crate_type = "lib"]

/// Configuration, errors and shared traits.
pub mod core {
    /// Layered build configuration.
    pub mod config;
    /// Error types.
    pub mod error;
    /// Processing and output traits.
    pub mod traits;
}

/// Provides command-line interface utilities.
pub mod cli;

/// Article sources and frontmatter.
pub mod content;

/// Third-party embed script tracking.
pub mod embed;

/// Provides output generation utilities.
pub mod generators;

/// Site build driver.
pub mod process;

/// Content transformation and thumbnail resolution.
pub mod processors;

/// Provides template rendering utilities.
pub mod template;

pub use crate::content::Article;
pub use crate::core::error::{ProcessingError, Result};
pub use crate::process::build_site;
pub use crate::processors::media::{transform, ContentTransformer};
pub use crate::processors::thumbnail::{resolve_thumbnail, ThumbnailResolver};
pub use crate::template::PageRenderer;
