// Copyright © 2026 Quillpost. All rights reserved.
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! # Media Providers
//!
//! URL recognition patterns shared by the [content transformer] and the
//! [thumbnail resolver]. The provider list is fixed.
//!
//! [content transformer]: crate::processors::media::ContentTransformer
//! [thumbnail resolver]: crate::processors::thumbnail::ThumbnailResolver

use regex::Regex;
use std::fmt;
use std::sync::LazyLock;

/// YouTube watch, embed and short links. Group 1 is the 11-character id.
pub const YOUTUBE_PATTERN: &str = r"(?:https?://)?(?:www\.)?(?:youtube\.com/(?:watch\?v=|embed/)|youtu\.be/)([a-zA-Z0-9_-]{11})";

/// Characters of a Google Drive file id.
pub const DRIVE_ID: &str = "[a-zA-Z0-9_-]+";

/// Extensions treated as directly loadable images.
pub const IMAGE_EXTENSIONS: &str = "jpg|jpeg|png|gif|webp|bmp|svg";

/// Extensions that mark a Drive file-view link as a video.
pub const VIDEO_EXTENSIONS: &str = "mp4|avi|mov|wmv|flv|webm|mkv";

/// Instagram post and reel permalinks. Group 1 is the shortcode.
pub const INSTAGRAM_PATTERN: &str =
    r"https://(?:www\.)?instagram\.com/(?:p|reel)/([a-zA-Z0-9_-]+)/?";

/// Facebook video links. Group 1 is the numeric video id.
pub const FACEBOOK_PATTERN: &str =
    r"(?R)https://(?:www\.)?facebook\.com/.*/videos/([0-9]+)";

/// Vimeo links. Group 1 is the numeric video id.
pub const VIMEO_PATTERN: &str = r"https://(?:www\.)?vimeo\.com/([0-9]+)";

/// Drive "file view" link, case-insensitive. Group 1 is the file id.
pub fn drive_file_view_pattern() -> String {
    format!(
        r"(?i)https://drive\.google\.com/file/d/({DRIVE_ID})/view(?:\?usp=sharing)?"
    )
}

/// Drive `open?id=` link. Group 1 is the file id.
pub fn drive_open_pattern() -> String {
    format!(r"https://drive\.google\.com/open\?id=({DRIVE_ID})")
}

/// Drive `uc?id=` and `uc?export=view&id=` links. Group 1 is the file id.
pub fn drive_uc_pattern() -> String {
    format!(r"https://drive\.google\.com/uc\?(?:export=view&)?id=({DRIVE_ID})")
}

/// A URL (whole input) that ends in an image extension, optionally
/// followed by a query string. Case-insensitive.
pub fn image_url_pattern() -> String {
    format!(r"(?i)\.(?:{IMAGE_EXTENSIONS})(?:\?.*)?$")
}

fn builtin(pattern: &str) -> Regex {
    Regex::new(pattern).unwrap_or_else(|e| {
        panic!("built-in provider pattern {pattern:?} is invalid: {e}")
    })
}

pub(crate) static YOUTUBE: LazyLock<Regex> =
    LazyLock::new(|| builtin(YOUTUBE_PATTERN));
pub(crate) static DRIVE_FILE_VIEW: LazyLock<Regex> = LazyLock::new(|| {
    builtin(&format!(r"https://drive\.google\.com/file/d/({DRIVE_ID})/view"))
});
pub(crate) static DRIVE_OPEN: LazyLock<Regex> =
    LazyLock::new(|| builtin(&drive_open_pattern()));
pub(crate) static DRIVE_UC: LazyLock<Regex> =
    LazyLock::new(|| builtin(&drive_uc_pattern()));
pub(crate) static IMAGE_URL: LazyLock<Regex> =
    LazyLock::new(|| builtin(&image_url_pattern()));
static INSTAGRAM: LazyLock<Regex> =
    LazyLock::new(|| builtin(INSTAGRAM_PATTERN));
static FACEBOOK: LazyLock<Regex> =
    LazyLock::new(|| builtin(FACEBOOK_PATTERN));
static VIMEO: LazyLock<Regex> = LazyLock::new(|| builtin(VIMEO_PATTERN));

/// A third-party media host with a recognisable URL shape.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Provider {
    /// youtube.com / youtu.be videos.
    YouTube,
    /// drive.google.com files.
    GoogleDrive,
    /// instagram.com posts and reels.
    Instagram,
    /// facebook.com videos.
    Facebook,
    /// vimeo.com videos.
    Vimeo,
    /// Any URL ending in an image extension.
    DirectImage,
}

impl Provider {
    /// Stable lowercase name used in logs and CLI output.
    pub const fn name(self) -> &'static str {
        match self {
            Provider::YouTube => "youtube",
            Provider::GoogleDrive => "google-drive",
            Provider::Instagram => "instagram",
            Provider::Facebook => "facebook",
            Provider::Vimeo => "vimeo",
            Provider::DirectImage => "image",
        }
    }

    /// Reports which provider a single URL belongs to, if any.
    ///
    /// Providers are tested in the same order the resolver uses, so a
    /// YouTube link ending in `.jpg` is still reported as YouTube.
    pub fn detect(url: &str) -> Option<Provider> {
        if url.is_empty() {
            return None;
        }
        if YOUTUBE.is_match(url) {
            Some(Provider::YouTube)
        } else if drive_file_id(url).is_some() {
            Some(Provider::GoogleDrive)
        } else if INSTAGRAM.is_match(url) {
            Some(Provider::Instagram)
        } else if FACEBOOK.is_match(url) {
            Some(Provider::Facebook)
        } else if VIMEO.is_match(url) {
            Some(Provider::Vimeo)
        } else if IMAGE_URL.is_match(url) {
            Some(Provider::DirectImage)
        } else {
            None
        }
    }
}

impl fmt::Display for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Extracts the 11-character YouTube video id from a URL.
pub fn youtube_id(url: &str) -> Option<&str> {
    YOUTUBE
        .captures(url)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}

/// Extracts a Drive file id from any recognised Drive URL shape.
///
/// Shapes are tried in order: `file/d/{id}/view`, `open?id={id}`,
/// `uc?id={id}` / `uc?export=view&id={id}`.
pub fn drive_file_id(url: &str) -> Option<&str> {
    [&*DRIVE_FILE_VIEW, &*DRIVE_OPEN, &*DRIVE_UC]
        .into_iter()
        .find_map(|re| re.captures(url).and_then(|caps| caps.get(1)))
        .map(|m| m.as_str())
}
