// Copyright © 2026 Quillpost. All rights reserved.
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! # Error Handling for Quillpost
//!
//! This module defines the error type shared by the configuration layer,
//! the article loader, the page renderer and the output writer. The
//! `thiserror` crate is used to derive `Display` and `Error`.
//!
//! The media transformer and the thumbnail resolver are total functions and
//! never produce a `ProcessingError`: unrecognised input is passed through or
//! yields no thumbnail.

use std::path::PathBuf;
use thiserror::Error;

/// A unified result type for the Quillpost library.
pub type Result<T> = std::result::Result<T, ProcessingError>;

/// The main error type for Quillpost.
#[derive(Error, Debug)]
pub enum ProcessingError {
    /// Error related to configuration loading or validation.
    #[error("Configuration error: {details}")]
    Configuration {
        /// Description of the configuration problem.
        details: String,
        /// Optional path of the file or directory involved.
        path: Option<PathBuf>,
        /// Optional underlying error.
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Error raised while reading or writing a file.
    #[error("File operation failed at `{path:?}`: {details}")]
    FileOperation {
        /// Description of the failed operation.
        details: String,
        /// Path associated with the error.
        path: PathBuf,
        /// Optional underlying error.
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Article data failed validation at the content boundary.
    #[error("Validation failed: {details}")]
    Validation {
        /// Description of the validation failure.
        details: String,
        /// Optional context, usually the file the article came from.
        context: Option<String>,
    },

    /// Page template registration or rendering failed.
    #[error("Template error in `{template}`: {details}")]
    Template {
        /// Description of the template failure.
        details: String,
        /// Name of the template involved.
        template: String,
    },

    /// A rewrite stage pattern did not compile.
    #[error("Pattern for stage `{stage}` failed to compile: {source}")]
    Pattern {
        /// Name of the stage owning the pattern.
        stage: String,
        /// The regex compilation error.
        #[source]
        source: regex::Error,
    },

    /// General internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<std::io::Error> for ProcessingError {
    /// Converts a standard IO error into a `FileOperation` error with an
    /// empty path.
    fn from(source: std::io::Error) -> Self {
        ProcessingError::FileOperation {
            details: source.to_string(),
            path: PathBuf::new(),
            source: Some(Box::new(source)),
        }
    }
}

impl ProcessingError {
    /// Creates a `Configuration` error with a message and optional path.
    pub fn configuration<S: Into<String>>(
        details: S,
        path: Option<PathBuf>,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    ) -> Self {
        ProcessingError::Configuration {
            details: details.into(),
            path,
            source,
        }
    }

    /// Creates a `FileOperation` error for the given path.
    pub fn file_operation<S: Into<String>>(
        details: S,
        path: PathBuf,
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    ) -> Self {
        ProcessingError::FileOperation {
            details: details.into(),
            path,
            source,
        }
    }

    /// Creates a `Validation` error with an optional context string.
    pub fn validation<S: Into<String>>(
        details: S,
        context: Option<String>,
    ) -> Self {
        ProcessingError::Validation {
            details: details.into(),
            context,
        }
    }

    /// Creates a `Template` error for the named template.
    pub fn template<S: Into<String>, T: Into<String>>(
        details: S,
        template: T,
    ) -> Self {
        ProcessingError::Template {
            details: details.into(),
            template: template.into(),
        }
    }

    /// Creates a general internal error with a custom message.
    pub fn internal_error<S: Into<String>>(message: S) -> Self {
        ProcessingError::Internal(message.into())
    }

    /// Attaches a context string to a `Validation` error; other variants
    /// are returned unchanged.
    pub fn with_context<S: Into<String>>(self, ctx: S) -> Self {
        match self {
            ProcessingError::Validation { details, .. } => {
                ProcessingError::Validation {
                    details,
                    context: Some(ctx.into()),
                }
            }
            other => other,
        }
    }
}
