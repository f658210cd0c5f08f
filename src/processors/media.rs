// Copyright © 2026 Quillpost. All rights reserved.
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! # Media Content Transformer
//!
//! Turns raw author-entered article text into HTML with embedded media and
//! basic formatting.
//!
//! ## Stage order
//!
//! 1. Headings, longest prefix first (`### `, `## `, `# `)
//! 2. Bullet items, numbered items and quotes
//! 3. Bold, italic (never inside a bold span), underline
//! 4. Provider embeds: YouTube, Google Drive, Instagram, Facebook, Vimeo,
//!    then any remaining direct image URL
//! 5. Newlines to `<br />`
//!
//! Stages 1 and 2 are anchored to line starts and ends, so the newline
//! conversion has to run last.
//!
//! The output is not HTML-escaped: text outside the recognised patterns is
//! injected as-is. Article bodies are written by the site's single admin
//! author and treated as trusted.
//!
//! The transform is meant to be applied once, to stored content. Embeds
//! contain URLs that may match again, so applying it to its own output is
//! not a no-op.
//!
//! ## Example
//!
//! ```rust
//! use quillpost::processors::media::transform;
//!
//! let html = transform("# Hello\nhttps://youtu.be/dQw4w9WgXcQ");
//! assert!(html.starts_with("<h1"));
//! assert!(html.contains("https://www.youtube.com/embed/dQw4w9WgXcQ"));
//! ```

use std::sync::LazyLock;

use regex::Captures;
use serde_json::Value as JsonValue;

use crate::core::error::Result;
use crate::core::traits::Processor;
use crate::processors::pipeline::{
    char_before, rest_of_line, Pipeline, Rewrite, Stage,
};
use crate::processors::providers::{
    drive_file_view_pattern, FACEBOOK_PATTERN, IMAGE_EXTENSIONS,
    INSTAGRAM_PATTERN, VIDEO_EXTENSIONS, VIMEO_PATTERN, YOUTUBE_PATTERN,
};

const H3: &str =
    r#"<h3 class="text-xl font-semibold mt-6 mb-3 text-gray-800">${1}</h3>"#;
const H2: &str =
    r#"<h2 class="text-2xl font-semibold mt-8 mb-4 text-gray-900">${1}</h2>"#;
const H1: &str =
    r#"<h1 class="text-3xl font-bold mt-10 mb-5 text-gray-900">${1}</h1>"#;
const BULLET: &str = r#"<li class="ml-4 my-1">• ${1}</li>"#;
const NUMBERED: &str = r#"<li class="ml-4 my-1">${1}. ${2}</li>"#;
const QUOTE: &str = r#"<blockquote class="border-l-4 border-blue-500 pl-4 italic my-4 text-gray-700 bg-gray-50 py-2">${1}</blockquote>"#;
const BOLD: &str = r#"<strong class="font-semibold">${1}</strong>"#;
const UNDERLINE: &str = r#"<u class="underline">${1}</u>"#;

const YOUTUBE_EMBED: &str = r#"<div class="video-embed my-8 rounded-xl overflow-hidden shadow-xl bg-black"><div class="relative w-full" style="padding-bottom: 56.25%; height: 0;"><iframe class="absolute top-0 left-0 w-full h-full" src="https://www.youtube.com/embed/${1}?rel=0&modestbranding=1" frameborder="0" allowfullscreen allow="accelerometer; autoplay; clipboard-write; encrypted-media; gyroscope; picture-in-picture" loading="lazy"></iframe></div></div>"#;
const INSTAGRAM_EMBED: &str = r#"<div class="social-embed my-8 flex justify-center"><blockquote class="instagram-media" data-instgrm-permalink="https://www.instagram.com/p/${1}/" data-instgrm-version="14" style="background:#FFF; border:0; border-radius:12px; box-shadow:0 4px 12px 0 rgba(0,0,0,0.15); margin: 1px; max-width:540px; min-width:326px; padding:0; width:99.375%;"></blockquote></div>"#;
const FACEBOOK_EMBED: &str = r#"<div class="video-embed my-8 rounded-xl overflow-hidden shadow-xl bg-black"><div class="relative w-full" style="padding-bottom: 56.25%; height: 0;"><iframe class="absolute top-0 left-0 w-full h-full" src="https://www.facebook.com/plugins/video.php?href=https://www.facebook.com/facebook/videos/${1}&show_text=false&width=560" frameborder="0" allowfullscreen allow="autoplay; clipboard-write; encrypted-media; picture-in-picture; web-share" loading="lazy"></iframe></div></div>"#;
// Group 1 is the URL without its query string.
const IMAGE_EMBED: &str = r#"<div class="image-embed my-8 flex justify-center"><img src="${1}" alt="Article image" class="max-w-full h-auto rounded-xl shadow-lg hover:shadow-xl transition-all duration-300 transform hover:scale-105" loading="lazy" onerror="this.style.display='none'" /></div>"#;
const VIMEO_EMBED: &str = r#"<div class="video-embed my-8 rounded-xl overflow-hidden shadow-xl bg-black"><div class="relative w-full" style="padding-bottom: 56.25%; height: 0;"><iframe class="absolute top-0 left-0 w-full h-full" src="https://player.vimeo.com/video/${1}" frameborder="0" allowfullscreen allow="autoplay; fullscreen; picture-in-picture" loading="lazy"></iframe></div></div>"#;

/// Stage names in execution order.
pub const STAGE_ORDER: [&str; 16] = [
    "heading_h3",
    "heading_h2",
    "heading_h1",
    "bullet_item",
    "numbered_item",
    "quote",
    "bold",
    "italic",
    "underline",
    "youtube",
    "drive",
    "instagram",
    "facebook",
    "vimeo",
    "direct_image",
    "line_break",
];

static SHARED: LazyLock<ContentTransformer> = LazyLock::new(|| {
    ContentTransformer::try_new().unwrap_or_else(|e| {
        panic!("built-in media stages are invalid: {e}")
    })
});

/// Transforms raw article text with the shared transformer.
pub fn transform(raw: &str) -> String {
    ContentTransformer::shared().transform(raw)
}

/// The media-aware content transformer.
#[derive(Debug, Clone)]
pub struct ContentTransformer {
    pipeline: Pipeline,
}

impl ContentTransformer {
    /// Compiles the built-in stages.
    pub fn try_new() -> Result<Self> {
        Ok(Self {
            pipeline: Pipeline::new(builtin_stages()?),
        })
    }

    /// A process-wide instance, compiled on first use.
    pub fn shared() -> &'static ContentTransformer {
        &SHARED
    }

    /// Transforms raw text into markup. Never fails; unmatched input is
    /// passed through.
    pub fn transform(&self, raw: &str) -> String {
        self.pipeline.run(raw)
    }

    /// The underlying stage pipeline.
    pub fn pipeline(&self) -> &Pipeline {
        &self.pipeline
    }
}

impl Processor for ContentTransformer {
    type Input = String;
    type Output = String;
    type Context = JsonValue;

    fn process(
        &self,
        input: Self::Input,
        _context: Option<&Self::Context>,
    ) -> Result<Self::Output> {
        Ok(self.transform(&input))
    }
}

fn builtin_stages() -> Result<Vec<Stage>> {
    Ok(vec![
        Stage::new("heading_h3", r"(?mR)^### (.+)$", Rewrite::Template(H3))?,
        Stage::new("heading_h2", r"(?mR)^## (.+)$", Rewrite::Template(H2))?,
        Stage::new("heading_h1", r"(?mR)^# (.+)$", Rewrite::Template(H1))?,
        Stage::new("bullet_item", r"(?mR)^- (.+)$", Rewrite::Template(BULLET))?,
        Stage::new(
            "numbered_item",
            r"(?mR)^([0-9]+)\. (.+)$",
            Rewrite::Template(NUMBERED),
        )?,
        Stage::new("quote", r"(?mR)^> (.+)$", Rewrite::Template(QUOTE))?,
        Stage::new("bold", r"(?R)\*\*(.*?)\*\*", Rewrite::Template(BOLD))?,
        Stage::new("italic", r"\*([^*\n]+)\*", Rewrite::Guarded(italic))?,
        Stage::new("underline", r"(?R)<u>(.*?)</u>", Rewrite::Template(UNDERLINE))?,
        Stage::new("youtube", YOUTUBE_PATTERN, Rewrite::Template(YOUTUBE_EMBED))?,
        Stage::new(
            "drive",
            &drive_file_view_pattern(),
            Rewrite::Guarded(drive_embed),
        )?,
        Stage::new(
            "instagram",
            INSTAGRAM_PATTERN,
            Rewrite::Template(INSTAGRAM_EMBED),
        )?,
        Stage::new(
            "facebook",
            FACEBOOK_PATTERN,
            Rewrite::Template(FACEBOOK_EMBED),
        )?,
        Stage::new("vimeo", VIMEO_PATTERN, Rewrite::Template(VIMEO_EMBED))?,
        Stage::new(
            "direct_image",
            &format!(
                r"(?i)(https?://[^\s]+\.(?:{IMAGE_EXTENSIONS}))(?:\?[^\s]*)?"
            ),
            Rewrite::Template(IMAGE_EMBED),
        )?,
        Stage::new("line_break", r"\n", Rewrite::Template("<br />"))?,
    ])
}

/// `*text*` not preceded by another `*`.
fn italic(caps: &Captures<'_>, input: &str) -> Option<String> {
    let whole = caps.get(0)?;
    if char_before(input, whole.start()) == Some('*') {
        return None;
    }
    Some(format!(r#"<em class="italic">{}</em>"#, caps.get(1)?.as_str()))
}

/// Drive file-view links are images unless the rest of their line names
/// a video file (`.mp4`, `.mov`, ...).
fn drive_embed(caps: &Captures<'_>, input: &str) -> Option<String> {
    let whole = caps.get(0)?;
    let id = caps.get(1)?.as_str();
    let rest = rest_of_line(input, whole.end()).to_ascii_lowercase();

    if VIDEO_EXTENSIONS
        .split('|')
        .any(|ext| rest.contains(&format!(".{ext}")))
    {
        Some(format!(
            r#"<div class="video-embed my-8 rounded-xl overflow-hidden shadow-xl bg-black"><div class="relative w-full" style="padding-bottom: 56.25%; height: 0;"><iframe class="absolute top-0 left-0 w-full h-full" src="https://drive.google.com/file/d/{id}/preview" frameborder="0" allowfullscreen loading="lazy"></iframe></div></div>"#
        ))
    } else {
        Some(format!(
            r#"<div class="image-embed my-8 flex justify-center"><img src="https://drive.google.com/uc?export=view&id={id}" alt="Article image" class="max-w-full h-auto rounded-xl shadow-lg hover:shadow-xl transition-shadow duration-300" loading="lazy" onerror="this.src='https://drive.google.com/uc?id={id}'; this.onerror=null;" /></div>"#
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const YT_SRC: &str =
        "https://www.youtube.com/embed/dQw4w9WgXcQ?rel=0&modestbranding=1";

    #[test]
    fn test_stage_order() {
        let transformer = ContentTransformer::shared();
        assert_eq!(transformer.pipeline().stage_names(), STAGE_ORDER);
    }

    #[test]
    fn test_plain_text_only_gets_line_breaks() {
        for raw in ["", "Hello world", "one\ntwo\n\nthree", "2 * 3 = 6"] {
            assert_eq!(transform(raw), raw.replace('\n', "<br />"), "{raw}");
        }
    }

    #[test]
    fn test_heading_levels_do_not_collide() {
        let h1 = transform("# Title");
        assert_eq!(
            h1,
            r#"<h1 class="text-3xl font-bold mt-10 mb-5 text-gray-900">Title</h1>"#
        );
        assert!(!h1.contains("<h2") && !h1.contains("<h3"));

        let h2 = transform("## Section");
        assert!(h2.starts_with("<h2") && h2.contains(">Section</h2>"));
        assert!(!h2.contains("<h1") && !h2.contains("#"));

        let h3 = transform("### Detail");
        assert!(h3.starts_with("<h3") && h3.contains(">Detail</h3>"));
        assert!(!h3.contains("<h1") && !h3.contains("<h2"));
    }

    #[test]
    fn test_headings_only_match_at_line_start() {
        assert_eq!(transform("issue # 4"), "issue # 4");
    }

    #[test]
    fn test_bold_is_not_rematched_as_italic() {
        assert_eq!(
            transform("**bold** and *italic*"),
            r#"<strong class="font-semibold">bold</strong> and <em class="italic">italic</em>"#
        );
    }

    #[test]
    fn test_underline_normalised() {
        assert_eq!(
            transform("<u>under</u>"),
            r#"<u class="underline">under</u>"#
        );
    }

    #[test]
    fn test_lists_and_quotes() {
        let html = transform("- one\n2. two\n> wise words");
        assert_eq!(
            html,
            concat!(
                r#"<li class="ml-4 my-1">• one</li><br />"#,
                r#"<li class="ml-4 my-1">2. two</li><br />"#,
                r#"<blockquote class="border-l-4 border-blue-500 pl-4 italic my-4 text-gray-700 bg-gray-50 py-2">wise words</blockquote>"#
            )
        );
    }

    #[test]
    fn test_youtube_shapes_are_equivalent() {
        let outputs: Vec<String> = [
            "https://www.youtube.com/watch?v=dQw4w9WgXcQ",
            "https://youtu.be/dQw4w9WgXcQ",
            "https://www.youtube.com/embed/dQw4w9WgXcQ",
        ]
        .iter()
        .map(|url| transform(url))
        .collect();

        for html in &outputs {
            assert!(html.contains(YT_SRC), "{html}");
            assert_eq!(html.matches("<iframe").count(), 1);
        }
        assert_eq!(outputs[0], outputs[1]);
        assert_eq!(outputs[1], outputs[2]);
    }

    #[test]
    fn test_end_to_end_order() {
        let html = transform(
            "Check this out:\nhttps://youtu.be/abc12345678\n**Nice!**",
        );
        assert!(html.starts_with("Check this out:<br />"));

        let embed = html
            .find("https://www.youtube.com/embed/abc12345678")
            .unwrap_or(usize::MAX);
        let second_break = html.rfind("<br />").unwrap_or(0);
        let bold = html
            .find(r#"<strong class="font-semibold">Nice!</strong>"#)
            .unwrap_or(0);

        assert!("Check this out:<br />".len() < embed);
        assert!(embed < second_break);
        assert!(second_break < bold);
        assert!(html.ends_with("</strong>"));
        assert!(!html.contains('\n'));
    }

    #[test]
    fn test_drive_defaults_to_image() {
        let html = transform(
            "https://drive.google.com/file/d/FILEid_123/view?usp=sharing",
        );
        assert!(html.contains(
            r#"src="https://drive.google.com/uc?export=view&id=FILEid_123""#
        ));
        assert!(html.contains("this.src='https://drive.google.com/uc?id=FILEid_123'"));
        assert!(!html.contains("usp=sharing"));
        assert!(!html.contains("<iframe"));
    }

    #[test]
    fn test_drive_video_hint_on_same_line() {
        let html =
            transform("https://drive.google.com/file/d/abc/view clip.MP4");
        assert!(html.contains("https://drive.google.com/file/d/abc/preview"));
        assert!(html.contains("<iframe"));

        let html =
            transform("https://drive.google.com/file/d/abc/view\nclip.mp4");
        assert!(html.contains("uc?export=view&id=abc"));
        assert!(!html.contains("/preview"));

        let html = transform(
            "https://drive.google.com/file/d/abc/view please remove later",
        );
        assert!(html.contains("uc?export=view&id=abc"));
        assert!(!html.contains("<iframe"));
    }

    #[test]
    fn test_instagram_placeholder() {
        let html = transform("https://www.instagram.com/reel/Cx1y2z/");
        assert!(html.contains(r#"class="instagram-media""#));
        assert!(html.contains(
            r#"data-instgrm-permalink="https://www.instagram.com/p/Cx1y2z/""#
        ));
    }

    #[test]
    fn test_facebook_and_vimeo() {
        let html =
            transform("https://www.facebook.com/somepage/videos/123456");
        assert!(html.contains(
            "href=https://www.facebook.com/facebook/videos/123456&show_text=false"
        ));

        let html = transform("https://vimeo.com/76979871");
        assert!(html.contains(r#"src="https://player.vimeo.com/video/76979871""#));
    }

    #[test]
    fn test_direct_image() {
        let html = transform("look https://example.com/photos/cat.JPG?size=large");
        assert!(html.starts_with("look <div class=\"image-embed"));
        assert!(html.contains(r#"<img src="https://example.com/photos/cat.JPG""#));
        assert!(html.contains(r#"onerror="this.style.display='none'""#));
        assert!(!html.contains("size=large"));
    }

    #[test]
    fn test_image_after_quote_or_equals_is_wrapped() {
        for raw in [
            "x=https://example.com/a.png",
            "'https://example.com/a.png'",
        ] {
            let html = transform(raw);
            assert!(
                html.contains(r#"<div class="image-embed my-8 flex justify-center"><img src="https://example.com/a.png""#),
                "{html}"
            );
        }
    }

    #[test]
    fn test_vimeo_wins_over_trailing_image_path() {
        let html = transform("https://vimeo.com/123/cover.png");
        assert!(html.contains(r#"src="https://player.vimeo.com/video/123""#));
        assert!(html.ends_with("</iframe></div></div>/cover.png"));
        assert!(!html.contains("<img"));
    }

    #[test]
    fn test_numbered_items_need_ascii_digits() {
        assert_eq!(transform("\u{663}. three"), "\u{663}. three");
        assert_eq!(
            transform("12. twelve"),
            r#"<li class="ml-4 my-1">12. twelve</li>"#
        );
    }

    #[test]
    fn test_unrecognised_urls_pass_through() {
        for raw in [
            "https://example.com/page",
            "https://youtu.be/short",
            "https://vimeo.com/channels/staff",
        ] {
            assert_eq!(transform(raw), raw);
        }
    }

    #[test]
    fn test_single_application_contract() {
        let once = transform("https://youtu.be/dQw4w9WgXcQ");
        assert_eq!(once.matches("<iframe").count(), 1);
        assert!(!once.contains("youtu.be"));

        // The embed's own src matches the YouTube pattern again.
        let twice = transform(&once);
        assert_ne!(twice, once);
    }

    #[test]
    fn test_processor_impl() -> Result<()> {
        let transformer = ContentTransformer::try_new()?;
        let html = transformer.process("*hi*".to_string(), None)?;
        assert_eq!(html, r#"<em class="italic">hi</em>"#);
        Ok(())
    }

    #[test]
    fn test_isolated_stage_prefix() {
        let pipeline = ContentTransformer::shared().pipeline();
        let partial = pipeline.run_until("quote", "# A\n> B\n**c**");
        assert_eq!(
            partial.as_deref(),
            Some(concat!(
                r#"<h1 class="text-3xl font-bold mt-10 mb-5 text-gray-900">A</h1>"#,
                "\n",
                r#"<blockquote class="border-l-4 border-blue-500 pl-4 italic my-4 text-gray-700 bg-gray-50 py-2">B</blockquote>"#,
                "\n**c**"
            ))
        );
    }
}
