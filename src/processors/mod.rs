// Copyright © 2026 Quillpost. All rights reserved.
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! # Content Processors Module
//!
//! The two pure, stateless processors at the heart of the crate, plus the
//! pieces they share.
//!
//! - [`media`]: raw article text to HTML with embedded media
//! - [`thumbnail`]: featured media URL to card thumbnail URL
//! - [`providers`]: URL recognition patterns used by both
//! - [`pipeline`]: ordered regex rewrite stages
//!
//! Both processors hold no mutable state and can be shared freely between
//! threads.
//!
//! ```rust
//! use quillpost::core::traits::Processor;
//! use quillpost::processors::{ContentTransformer, ThumbnailResolver};
//!
//! let transformer = ContentTransformer::try_new().unwrap();
//! let html = transformer.process("**hi**".to_string(), None).unwrap();
//! assert_eq!(html, r#"<strong class="font-semibold">hi</strong>"#);
//!
//! let thumb = ThumbnailResolver::default()
//!     .process("https://example.com/a.gif".to_string(), None)
//!     .unwrap();
//! assert_eq!(thumb.as_deref(), Some("https://example.com/a.gif"));
//! ```

/// Media-aware content transformation.
pub mod media;

/// Ordered regex rewrite stages.
pub mod pipeline;

/// Provider URL patterns.
pub mod providers;

/// Thumbnail resolution.
pub mod thumbnail;

pub use media::ContentTransformer;
pub use providers::Provider;
pub use thumbnail::{ThumbnailConfig, ThumbnailResolver};
