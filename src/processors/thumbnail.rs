// Copyright © 2026 Quillpost. All rights reserved.
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! # Thumbnail Resolver
//!
//! Derives a directly loadable image URL from an article's featured media
//! URL, for list and card views. Resolution is purely syntactic; nothing
//! is fetched.
//!
//! First match wins:
//!
//! 1. empty or absent input: no thumbnail
//! 2. YouTube link: `https://img.youtube.com/vi/{id}/maxresdefault.jpg`
//! 3. Google Drive link: `https://drive.google.com/thumbnail?id={id}&sz=w400-h300-c`
//! 4. URL ending in an image extension: returned unchanged
//! 5. anything else: no thumbnail
//!
//! ```rust
//! use quillpost::resolve_thumbnail;
//!
//! assert_eq!(
//!     resolve_thumbnail(Some("https://youtu.be/dQw4w9WgXcQ")).as_deref(),
//!     Some("https://img.youtube.com/vi/dQw4w9WgXcQ/maxresdefault.jpg"),
//! );
//! assert_eq!(resolve_thumbnail(Some("https://example.com/page")), None);
//! ```

use log::debug;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

use crate::core::error::Result;
use crate::core::traits::Processor;
use crate::processors::providers::{
    drive_file_id, youtube_id, Provider, IMAGE_URL,
};

/// Size and quality tokens used when building thumbnail URLs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ThumbnailConfig {
    /// Name of the YouTube still image (`maxresdefault`, `hqdefault`, ...).
    #[serde(default = "default_youtube_quality")]
    pub youtube_quality: String,

    /// Drive thumbnail-service size token.
    #[serde(default = "default_drive_size")]
    pub drive_size: String,
}

impl Default for ThumbnailConfig {
    fn default() -> Self {
        Self {
            youtube_quality: default_youtube_quality(),
            drive_size: default_drive_size(),
        }
    }
}

fn default_youtube_quality() -> String {
    "maxresdefault".to_string()
}

fn default_drive_size() -> String {
    "w400-h300-c".to_string()
}

/// Resolves a thumbnail with the default configuration.
pub fn resolve_thumbnail(url: Option<&str>) -> Option<String> {
    ThumbnailResolver::default().resolve(url)
}

/// Maps featured media URLs to thumbnail URLs.
#[derive(Debug, Clone, Default)]
pub struct ThumbnailResolver {
    config: ThumbnailConfig,
}

impl ThumbnailResolver {
    /// Creates a resolver with custom size tokens.
    pub fn new(config: ThumbnailConfig) -> Self {
        Self { config }
    }

    /// Returns a directly loadable image URL, or `None` when no thumbnail
    /// can be derived.
    pub fn resolve(&self, url: Option<&str>) -> Option<String> {
        let url = url.filter(|u| !u.is_empty())?;

        if let Some(id) = youtube_id(url) {
            debug!("{} thumbnail for {url}", Provider::YouTube);
            return Some(format!(
                "https://img.youtube.com/vi/{id}/{}.jpg",
                self.config.youtube_quality
            ));
        }

        if let Some(id) = drive_file_id(url) {
            debug!("{} thumbnail for {url} (file id {id})", Provider::GoogleDrive);
            return Some(format!(
                "https://drive.google.com/thumbnail?id={id}&sz={}",
                self.config.drive_size
            ));
        }

        if IMAGE_URL.is_match(url) {
            debug!("direct image used as its own thumbnail: {url}");
            return Some(url.to_string());
        }

        debug!("no thumbnail for {url}");
        None
    }
}

impl Processor for ThumbnailResolver {
    type Input = String;
    type Output = Option<String>;
    type Context = JsonValue;

    fn process(
        &self,
        input: Self::Input,
        _context: Option<&Self::Context>,
    ) -> Result<Self::Output> {
        Ok(self.resolve(Some(&input)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_absent_input() {
        assert_eq!(resolve_thumbnail(None), None);
        assert_eq!(resolve_thumbnail(Some("")), None);
    }

    #[test]
    fn test_youtube() {
        assert_eq!(
            resolve_thumbnail(Some("https://youtu.be/dQw4w9WgXcQ")).as_deref(),
            Some("https://img.youtube.com/vi/dQw4w9WgXcQ/maxresdefault.jpg")
        );
        assert_eq!(
            resolve_thumbnail(Some(
                "https://www.youtube.com/watch?v=dQw4w9WgXcQ&t=42"
            ))
            .as_deref(),
            Some("https://img.youtube.com/vi/dQw4w9WgXcQ/maxresdefault.jpg")
        );
    }

    #[test]
    fn test_drive_shapes_normalise() {
        let expected =
            "https://drive.google.com/thumbnail?id=1AbC_d-9&sz=w400-h300-c";
        for url in [
            "https://drive.google.com/file/d/1AbC_d-9/view",
            "https://drive.google.com/file/d/1AbC_d-9/view?usp=sharing",
            "https://drive.google.com/open?id=1AbC_d-9",
            "https://drive.google.com/uc?id=1AbC_d-9",
            "https://drive.google.com/uc?export=view&id=1AbC_d-9",
        ] {
            assert_eq!(resolve_thumbnail(Some(url)).as_deref(), Some(expected));
        }
    }

    #[test]
    fn test_direct_image_unchanged() {
        for url in [
            "https://example.com/pic.PNG",
            "https://cdn.example.com/a/b.webp?w=640",
            "http://example.com/logo.svg",
        ] {
            assert_eq!(resolve_thumbnail(Some(url)).as_deref(), Some(url));
        }
    }

    #[test]
    fn test_unrecognised() {
        for url in [
            "https://example.com/page",
            "https://vimeo.com/76979871",
            "https://example.com/pic.png/edit",
        ] {
            assert_eq!(resolve_thumbnail(Some(url)), None, "{url}");
        }
    }

    #[test]
    fn test_custom_tokens() {
        let resolver = ThumbnailResolver::new(ThumbnailConfig {
            youtube_quality: "hqdefault".to_string(),
            drive_size: "w200".to_string(),
        });
        assert_eq!(
            resolver.resolve(Some("https://youtu.be/dQw4w9WgXcQ")).as_deref(),
            Some("https://img.youtube.com/vi/dQw4w9WgXcQ/hqdefault.jpg")
        );
        assert_eq!(
            resolver
                .resolve(Some("https://drive.google.com/open?id=xyz"))
                .as_deref(),
            Some("https://drive.google.com/thumbnail?id=xyz&sz=w200")
        );
    }

    #[test]
    fn test_processor_impl() -> Result<()> {
        let resolver = ThumbnailResolver::default();
        let thumb = resolver
            .process("https://example.com/cover.jpg".to_string(), None)?;
        assert_eq!(thumb.as_deref(), Some("https://example.com/cover.jpg"));
        Ok(())
    }
}
