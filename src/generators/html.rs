//! # HTML Output Generation
//!
//! Writes rendered pages to disk, creating parent directories as needed
//! and optionally minifying the markup with `minify-html`.
//!
//! ```rust,no_run
//! use quillpost::core::traits::Generator;
//! use quillpost::generators::html::HtmlGenerator;
//! use std::path::Path;
//!
//! let generator = HtmlGenerator::new().with_minification(true);
//! generator
//!     .generate(
//!         "<html><body><p>Hello</p></body></html>",
//!         Path::new("public/index.html"),
//!         None,
//!     )
//!     .unwrap();
//! ```
//!
//! Per-call options are a JSON object; `{"minify": false}` overrides the
//! generator setting for one file.

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::Path;

use log::debug;
use minify_html::{minify, Cfg};
use serde_json::Value as JsonValue;

use crate::core::error::{ProcessingError, Result};
use crate::core::traits::Generator;

/// Writes HTML pages.
#[derive(Debug, Clone, Copy, Default)]
pub struct HtmlGenerator {
    minify: bool,
}

impl HtmlGenerator {
    /// Creates a generator that writes markup unchanged.
    pub fn new() -> Self {
        Self::default()
    }

    /// Enables or disables minification.
    pub fn with_minification(mut self, enable: bool) -> Self {
        self.minify = enable;
        self
    }

    /// Whether output is minified by default.
    pub fn minifies(&self) -> bool {
        self.minify
    }

    fn minify_html(content: &str) -> Result<String> {
        let cfg = Cfg {
            minify_css: true,
            minify_js: true,
            ..Cfg::default()
        };
        String::from_utf8(minify(content.as_bytes(), &cfg)).map_err(|e| {
            ProcessingError::internal_error(format!(
                "HTML minification produced invalid UTF-8: {}",
                e
            ))
        })
    }
}

impl Generator for HtmlGenerator {
    fn generate(
        &self,
        content: &str,
        path: &Path,
        options: Option<&JsonValue>,
    ) -> Result<()> {
        self.validate(path, options)?;

        let minify = options
            .and_then(|o| o.get("minify"))
            .and_then(JsonValue::as_bool)
            .unwrap_or(self.minify);
        let processed = if minify {
            Self::minify_html(content)?
        } else {
            content.to_string()
        };

        let write = || -> std::io::Result<()> {
            let mut writer = BufWriter::new(File::create(path)?);
            writer.write_all(processed.as_bytes())?;
            writer.flush()
        };
        write().map_err(|e| {
            ProcessingError::file_operation(
                format!("Failed to write output: {}", e),
                path.to_path_buf(),
                Some(Box::new(e)),
            )
        })?;

        debug!(
            "wrote {} ({} bytes{})",
            path.display(),
            processed.len(),
            if minify { ", minified" } else { "" }
        );
        Ok(())
    }

    fn validate(
        &self,
        path: &Path,
        options: Option<&JsonValue>,
    ) -> Result<()> {
        if path.extension().and_then(|s| s.to_str()) != Some("html") {
            return Err(ProcessingError::file_operation(
                "Invalid file extension - expected .html",
                path.to_path_buf(),
                None,
            ));
        }

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                fs::create_dir_all(parent).map_err(|e| {
                    ProcessingError::file_operation(
                        format!("Failed to create output directory: {}", e),
                        parent.to_path_buf(),
                        Some(Box::new(e)),
                    )
                })?;
            }
        }

        if let Some(opts) = options {
            let Some(obj) = opts.as_object() else {
                return Err(ProcessingError::file_operation(
                    "Invalid options format - expected JSON object",
                    path.to_path_buf(),
                    None,
                ));
            };
            if obj.get("minify").is_some_and(|v| !v.is_boolean()) {
                return Err(ProcessingError::file_operation(
                    "minify option must be a boolean",
                    path.to_path_buf(),
                    None,
                ));
            }
        }

        Ok(())
    }
}
