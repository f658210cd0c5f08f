// Copyright © 2026 Quillpost. All rights reserved.
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! # Site Build
//!
//! Reads every article source in the content directory, renders the
//! published ones and writes one page per article plus an index.
//!
//! Articles that fail to parse or validate are logged and skipped. The
//! build only fails on configuration, template or I/O errors.

use std::cmp::Ordering;
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

use log::{debug, info, warn};

use crate::content::Article;
use crate::core::config::Config;
use crate::core::error::{ProcessingError, Result};
use crate::core::traits::Generator;
use crate::generators::html::HtmlGenerator;
use crate::template::PageRenderer;

/// Title of the generated index page.
pub const INDEX_TITLE: &str = "Articles";

/// What a build produced.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BuildReport {
    /// Article pages written, in source-file order.
    pub pages: Vec<PathBuf>,
    /// Path of the index page.
    pub index: PathBuf,
    /// Source files that were not rendered.
    pub skipped: usize,
}

/// Reads a UTF-8 file.
///
/// # Errors
///
/// `ProcessingError::FileOperation` carrying the path when the file does
/// not exist or cannot be read.
pub fn read_content<P: AsRef<Path>>(path: P) -> Result<String> {
    let path = path.as_ref();
    if !path.exists() {
        return Err(ProcessingError::file_operation(
            format!("Path does not exist: {}", path.display()),
            path.to_path_buf(),
            None,
        ));
    }
    fs::read_to_string(path).map_err(|e| {
        ProcessingError::file_operation(
            format!("Failed to read file: {}", e),
            path.to_path_buf(),
            Some(Box::new(e)),
        )
    })
}

/// Writes `content` to `path`, creating parent directories.
pub fn write_content<P: AsRef<Path>>(path: P, content: &str) -> Result<()> {
    let path = path.as_ref();
    let write = || -> std::io::Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(path, content)
    };
    write().map_err(|e| {
        ProcessingError::file_operation(
            format!("Failed to write file: {}", e),
            path.to_path_buf(),
            Some(Box::new(e)),
        )
    })
}

/// Builds the site described by `config`.
pub fn build_site(config: &Config) -> Result<BuildReport> {
    config.validate()?;
    let renderer = PageRenderer::from_config(config)?;
    let generator =
        HtmlGenerator::new().with_minification(config.minify_output());
    SiteBuilder::new(config.clone(), renderer, Box::new(generator)).build()
}

/// Drives one build: load, render, write.
#[derive(Debug)]
pub struct SiteBuilder {
    config: Config,
    renderer: PageRenderer,
    generator: Box<dyn Generator>,
}

impl SiteBuilder {
    /// Creates a builder from its parts.
    pub fn new(
        config: Config,
        renderer: PageRenderer,
        generator: Box<dyn Generator>,
    ) -> Self {
        Self {
            config,
            renderer,
            generator,
        }
    }

    /// Runs the build.
    pub fn build(&self) -> Result<BuildReport> {
        let mut report = BuildReport::default();
        let mut published = Vec::new();
        let mut slugs = HashSet::new();

        for path in self.source_files()? {
            let Some(article) = self.load(&path)? else {
                report.skipped += 1;
                continue;
            };

            let slug = article.slug();
            if slug.is_empty() || !slugs.insert(slug.clone()) {
                warn!(
                    "skipping {}: empty or duplicate slug `{}`",
                    path.display(),
                    slug
                );
                report.skipped += 1;
                continue;
            }

            let page = self.config.output_dir.join(format!("{slug}.html"));
            let html = self.renderer.render_article(&article)?;
            self.generator.generate(&html, &page, None)?;
            info!("rendered {} -> {}", path.display(), page.display());

            report.pages.push(page);
            published.push(article);
        }

        published.sort_by(newest_first);
        let index = self.config.output_dir.join("index.html");
        let html = self.renderer.render_index(INDEX_TITLE, &published)?;
        self.generator.generate(&html, &index, None)?;
        info!(
            "wrote index with {} article(s), {} skipped",
            published.len(),
            report.skipped
        );

        report.index = index;
        Ok(report)
    }

    /// Content files in the content directory, sorted by path.
    fn source_files(&self) -> Result<Vec<PathBuf>> {
        let dir = &self.config.content_dir;
        let entries = fs::read_dir(dir).map_err(|e| {
            ProcessingError::file_operation(
                format!("Failed to read content directory: {}", e),
                dir.clone(),
                Some(Box::new(e)),
            )
        })?;

        let mut files = Vec::new();
        for entry in entries {
            let path = entry?.path();
            if path.is_file() && self.config.is_content_file(&path) {
                files.push(path);
            } else {
                debug!("ignoring {}", path.display());
            }
        }
        files.sort();
        Ok(files)
    }

    /// Loads one article. `Ok(None)` means the file is skipped.
    fn load(&self, path: &Path) -> Result<Option<Article>> {
        let source = read_content(path)?;
        let article = match Article::parse(&source)
            .and_then(|a| a.validate().map(|()| a))
        {
            Ok(article) => article,
            Err(e) => {
                let e = e.with_context(path.display().to_string());
                warn!("skipping {}: {}", path.display(), e);
                return Ok(None);
            }
        };

        if !article.is_published() {
            debug!(
                "skipping {}: status is {:?}",
                path.display(),
                article.status
            );
            return Ok(None);
        }
        Ok(Some(article))
    }
}

/// Newest `published_at` first; undated articles last, then by title.
fn newest_first(a: &Article, b: &Article) -> Ordering {
    match (&a.published_at, &b.published_at) {
        (Some(x), Some(y)) => y.cmp(x),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
    .then_with(|| a.title.cmp(&b.title))
}
