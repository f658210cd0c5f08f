// Copyright © 2026 Quillpost. All rights reserved.
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! # Embed Scripts
//!
//! Some embeds only become interactive once a provider script has run on
//! the page. [`EmbedScript`] hands out the `<script>` tag exactly once per
//! lifecycle, so a page that contains several Instagram posts still loads
//! the script a single time.
//!
//! The page renderer creates a fresh `EmbedScript` for every page it
//! renders. Long-lived owners call [`EmbedScript::reset`] between pages.
//!
//! ```rust
//! use quillpost::embed::EmbedScript;
//!
//! let script = EmbedScript::instagram();
//! assert!(script.ensure_loaded().is_some());
//! assert!(script.ensure_loaded().is_none());
//! script.reset();
//! assert!(!script.is_loaded());
//! ```

use std::sync::atomic::{AtomicBool, Ordering};

use log::debug;

/// Source of the Instagram embed script.
pub const INSTAGRAM_EMBED_SRC: &str = "//www.instagram.com/embed.js";

/// Class carried by Instagram placeholders in transformed markup.
const INSTAGRAM_PLACEHOLDER: &str = r#"class="instagram-media""#;

/// Whether transformed markup contains an Instagram placeholder.
pub fn needs_instagram_script(markup: &str) -> bool {
    markup.contains(INSTAGRAM_PLACEHOLDER)
}

/// An idempotent "ensure loaded" guard for one external script.
#[derive(Debug)]
pub struct EmbedScript {
    src: &'static str,
    loaded: AtomicBool,
}

impl EmbedScript {
    /// Creates a guard for the script at `src`.
    pub const fn new(src: &'static str) -> Self {
        Self {
            src,
            loaded: AtomicBool::new(false),
        }
    }

    /// Guard for the Instagram embed script.
    pub const fn instagram() -> Self {
        Self::new(INSTAGRAM_EMBED_SRC)
    }

    /// The script source.
    pub fn src(&self) -> &'static str {
        self.src
    }

    /// Returns the `<script>` tag on the first call after creation or
    /// [`reset`](Self::reset), and `None` afterwards.
    pub fn ensure_loaded(&self) -> Option<String> {
        if self.loaded.swap(true, Ordering::AcqRel) {
            return None;
        }
        debug!("loading embed script {}", self.src);
        Some(format!(r#"<script async src="{}"></script>"#, self.src))
    }

    /// Whether the script tag has been handed out.
    pub fn is_loaded(&self) -> bool {
        self.loaded.load(Ordering::Acquire)
    }

    /// Starts a new lifecycle, e.g. for the next page.
    pub fn reset(&self) {
        self.loaded.store(false, Ordering::Release);
    }
}
