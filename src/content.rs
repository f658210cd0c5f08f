//! # Article Records
//!
//! Typed article data as read from source files. A source file carries a
//! YAML frontmatter block between `---` lines followed by the raw article
//! body:
//!
//! ```text
//! ---
//! title: Hello, World!
//! status: published
//! published_at: "2024-05-01T09:00:00Z"
//! featured_media_url: https://youtu.be/dQw4w9WgXcQ
//! tags: [Rust, Video]
//! ---
//! ## Intro
//! Some **bold** words.
//! ```
//!
//! The body is kept raw; turning it into HTML is the media transformer's
//! job. Validation happens here, at the content boundary, so the
//! transformer itself never fails.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

use crate::core::error::{ProcessingError, Result};

/// Publication state of an article.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    /// Not yet published. The default.
    #[default]
    Draft,
    /// Visible on the site.
    Published,
    /// Withdrawn.
    Archived,
}

/// A normalised tag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Tag {
    /// Lowercase tag name.
    pub name: String,
    /// URL slug of the tag.
    pub slug: String,
}

/// An article parsed from a source file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Article {
    /// Article title.
    #[serde(default)]
    pub title: String,

    /// Explicit URL slug; derived from the title when absent.
    #[serde(default)]
    pub slug: Option<String>,

    /// Short summary shown under the title and on cards.
    #[serde(default)]
    pub excerpt: Option<String>,

    /// Raw article body (everything after the frontmatter).
    #[serde(skip)]
    pub content: String,

    /// Featured media URL: an image, a YouTube or Drive link, etc.
    #[serde(default, alias = "featured_image_url")]
    pub featured_media_url: Option<String>,

    /// Premium articles are shown as a preview in public mode.
    #[serde(default)]
    pub is_premium: bool,

    /// Publication state.
    #[serde(default)]
    pub status: Status,

    /// Publication timestamp, ISO 8601.
    #[serde(default)]
    pub published_at: Option<String>,

    /// Category names.
    #[serde(default)]
    pub categories: Vec<String>,

    /// Tag names as written by the author.
    #[serde(default)]
    pub tags: Vec<String>,

    /// Author display name.
    #[serde(default)]
    pub author: Option<String>,
}

impl Article {
    /// Parses a source file: frontmatter, then body.
    ///
    /// # Errors
    ///
    /// `ProcessingError::Validation` when the frontmatter block is missing
    /// or is not valid YAML for an article.
    pub fn parse(source: &str) -> Result<Self> {
        let source = source.strip_prefix('\u{feff}').unwrap_or(source);
        let (frontmatter, body) =
            split_frontmatter(source).ok_or_else(|| {
                ProcessingError::validation(
                    "Missing frontmatter block",
                    None,
                )
            })?;

        let mut article: Article = if frontmatter.trim().is_empty() {
            Article::default()
        } else {
            serde_yml::from_str(frontmatter).map_err(|e| {
                ProcessingError::validation(
                    format!("Invalid frontmatter: {}", e),
                    None,
                )
            })?
        };
        article.content =
            body.trim_start_matches(|c| c == '\r' || c == '\n').to_string();
        Ok(article)
    }

    /// Checks the fields an article cannot be saved without.
    pub fn validate(&self) -> Result<()> {
        if self.title.trim().is_empty() || self.content.trim().is_empty() {
            return Err(ProcessingError::validation(
                "Title and content are required",
                None,
            ));
        }
        Ok(())
    }

    /// The explicit slug, or one generated from the title.
    pub fn slug(&self) -> String {
        match self.slug.as_deref().map(str::trim) {
            Some(slug) if !slug.is_empty() => slug.to_string(),
            _ => generate_slug(&self.title),
        }
    }

    /// Whether the article is published.
    pub fn is_published(&self) -> bool {
        self.status == Status::Published
    }

    /// The excerpt, if it has any non-blank text.
    pub fn excerpt(&self) -> Option<&str> {
        non_blank(self.excerpt.as_deref())
    }

    /// The featured media URL, trimmed, if present.
    pub fn featured_media(&self) -> Option<&str> {
        non_blank(self.featured_media_url.as_deref())
    }

    /// Tags normalised to lowercase, with slugs, first occurrence kept.
    pub fn tags(&self) -> Vec<Tag> {
        let mut tags: Vec<Tag> = Vec::with_capacity(self.tags.len());
        for raw in &self.tags {
            let name = raw.trim().to_lowercase();
            if name.is_empty() || tags.iter().any(|t| t.name == name) {
                continue;
            }
            tags.push(Tag {
                slug: generate_slug(raw),
                name,
            });
        }
        tags
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

/// Splits `---` delimited frontmatter from the body.
fn split_frontmatter(source: &str) -> Option<(&str, &str)> {
    let rest = source
        .strip_prefix("---\n")
        .or_else(|| source.strip_prefix("---\r\n"))?;

    let mut offset = 0;
    for line in rest.split_inclusive('\n') {
        if line.trim_end_matches(|c| c == '\r' || c == '\n') == "---" {
            return Some((&rest[..offset], &rest[offset + line.len()..]));
        }
        offset += line.len();
    }
    None
}

/// Builds a URL slug: lowercase, every run of characters outside
/// `[a-z0-9]` collapsed to one `-`, no leading or trailing `-`.
///
/// ```rust
/// use quillpost::content::generate_slug;
///
/// assert_eq!(generate_slug("Hello, World!"), "hello-world");
/// assert_eq!(generate_slug("  Rust 2024  "), "rust-2024");
/// ```
pub fn generate_slug(title: &str) -> String {
    let mut slug = String::with_capacity(title.len());
    let mut pending_dash = false;
    for c in title.to_lowercase().chars() {
        if c.is_ascii_lowercase() || c.is_ascii_digit() {
            if pending_dash && !slug.is_empty() {
                slug.push('-');
            }
            pending_dash = false;
            slug.push(c);
        } else {
            pending_dash = true;
        }
    }
    slug
}

/// Public preview of a premium article body.
///
/// Markup tags are replaced by spaces, the text is split on single
/// spaces and the first `words` pieces are kept. `...` is appended when
/// anything was cut.
///
/// ```rust
/// use quillpost::content::preview;
///
/// assert_eq!(preview("<p>one two</p> three", 2), " one...");
/// assert_eq!(preview("short text", 100), "short text");
/// ```
pub fn preview(content: &str, words: usize) -> String {
    let stripped = MARKUP_TAG.replace_all(content, " ");
    let pieces: Vec<&str> = stripped.split(' ').collect();
    let mut text = pieces[..pieces.len().min(words)].join(" ");
    if pieces.len() > words {
        text.push_str("...");
    }
    text
}

static MARKUP_TAG: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"<[^>]*>")
        .unwrap_or_else(|e| panic!("markup tag pattern is invalid: {e}"))
});
