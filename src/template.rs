//! # Page Rendering Module
//!
//! Renders article pages and the article index with Handlebars.
//!
//! Two templates are built in, `article` and `index`. Any `*.hbs` file in
//! the configured template directory is registered under its file stem,
//! so `templates/article.hbs` replaces the built-in article page and other
//! files become partials or extra templates.
//!
//! Article bodies and featured media go through the
//! [`ContentTransformer`](crate::processors::media::ContentTransformer)
//! and are inserted unescaped (`{{{body}}}`). Titles, excerpts and other
//! plain fields are escaped by Handlebars.
//!
//! Two helpers are available to custom templates:
//!
//! - `{{media url}}` writes the transformed markup for raw text
//! - `{{thumbnail url}}` writes the resolved thumbnail URL, or nothing

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use handlebars::{
    html_escape, Context, Handlebars, Helper, HelperResult, Output,
    RenderContext,
};
use log::debug;
use serde_json::{json, Value as JsonValue};

use crate::content::{preview, Article};
use crate::core::config::Config;
use crate::core::error::{ProcessingError, Result};
use crate::embed::{needs_instagram_script, EmbedScript};
use crate::processors::media::{transform, ContentTransformer};
use crate::processors::thumbnail::ThumbnailResolver;

/// Name of the article page template.
pub const ARTICLE_TEMPLATE: &str = "article";

/// Name of the index page template.
pub const INDEX_TEMPLATE: &str = "index";

const BUILTIN_ARTICLE: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>{{title}}</title>
</head>
<body class="bg-gray-50">
<article class="max-w-3xl mx-auto bg-white shadow-lg rounded-lg">
<header class="p-4 sm:p-6">
<h1 class="text-xl sm:text-2xl lg:text-3xl font-bold leading-tight break-words">{{title}}</h1>
{{#if is_premium}}<span class="inline-flex items-center px-2.5 py-0.5 rounded-full text-xs font-medium bg-yellow-100 text-yellow-800">Premium</span>{{/if}}
{{#if excerpt}}<p class="text-base lg:text-lg text-gray-600 mb-4 leading-relaxed break-words">{{excerpt}}</p>{{/if}}
<p class="text-sm text-gray-500">{{#if author}}<span class="author">{{author}}</span>{{/if}}{{#if published_at}} <time datetime="{{published_at}}">{{published_at}}</time>{{/if}}</p>
{{#if tags}}<ul class="flex flex-wrap gap-2">{{#each tags}}<li class="text-xs text-blue-700" data-slug="{{slug}}">#{{name}}</li>{{/each}}</ul>{{/if}}
</header>
<div class="p-4 sm:p-6">
{{#if featured_media}}<div class="mb-4 sm:mb-6 overflow-hidden rounded-lg">{{{featured_media}}}</div>{{/if}}
<div class="prose max-w-none break-words">{{{body}}}</div>
{{#if is_preview}}<div class="premium-prompt mt-6 p-4 rounded-lg bg-yellow-50 text-yellow-800">This is a premium article. Sign in to read the rest.</div>{{/if}}
</div>
</article>
{{{scripts}}}
</body>
</html>
"#;

const BUILTIN_INDEX: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>{{title}}</title>
</head>
<body class="bg-gray-50">
<main class="max-w-5xl mx-auto grid gap-6 sm:grid-cols-2 lg:grid-cols-3">
{{#each articles}}
<a class="card block bg-white rounded-lg shadow hover:shadow-lg overflow-hidden" href="{{slug}}.html">
{{#if thumbnail}}<img class="w-full h-48 object-cover" src="{{thumbnail}}" alt="{{title}}" loading="lazy">{{/if}}
<div class="p-4">
<h2 class="text-lg font-semibold">{{title}}</h2>
{{#if is_premium}}<span class="text-xs font-medium text-yellow-800">Premium</span>{{/if}}
{{#if excerpt}}<p class="text-gray-600">{{excerpt}}</p>{{/if}}
{{#if published_at}}<time class="text-sm text-gray-500" datetime="{{published_at}}">{{published_at}}</time>{{/if}}
</div>
</a>
{{else}}
<p class="text-gray-500">No articles yet.</p>
{{/each}}
</main>
</body>
</html>
"#;

/// Renders article and index pages.
pub struct PageRenderer {
    engine: Handlebars<'static>,
    transformer: &'static ContentTransformer,
    resolver: ThumbnailResolver,
    template_dir: Option<PathBuf>,
    public_mode: bool,
    preview_words: usize,
}

impl fmt::Debug for PageRenderer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PageRenderer")
            .field("template_dir", &self.template_dir)
            .field("public_mode", &self.public_mode)
            .field("preview_words", &self.preview_words)
            .field("templates", &self.template_names())
            .finish()
    }
}

impl PageRenderer {
    /// Creates a renderer with the built-in templates.
    pub fn new() -> Result<Self> {
        let resolver = ThumbnailResolver::default();
        let mut engine = Handlebars::new();
        engine.register_escape_fn(html_escape);
        engine.register_helper("media", Box::new(media_helper));
        engine.register_helper(
            "thumbnail",
            Box::new(thumbnail_helper(resolver.clone())),
        );

        for (name, source) in [
            (ARTICLE_TEMPLATE, BUILTIN_ARTICLE),
            (INDEX_TEMPLATE, BUILTIN_INDEX),
        ] {
            engine.register_template_string(name, source).map_err(|e| {
                ProcessingError::template(
                    format!("Failed to register built-in template: {}", e),
                    name,
                )
            })?;
        }

        Ok(Self {
            engine,
            transformer: ContentTransformer::shared(),
            resolver,
            template_dir: None,
            public_mode: false,
            preview_words: 100,
        })
    }

    /// Creates a renderer from build settings.
    pub fn from_config(config: &Config) -> Result<Self> {
        let mut renderer = Self::new()?
            .with_public_mode(config.content.public_mode)
            .with_preview_words(config.content.preview_words)
            .with_thumbnails(ThumbnailResolver::new(
                config.thumbnail.clone(),
            ));
        if let Some(dir) = &config.template_dir {
            renderer = renderer.with_template_dir(dir)?;
        }
        Ok(renderer)
    }

    /// Registers every `*.hbs` file in `dir`, replacing built-ins with
    /// the same name.
    pub fn with_template_dir(mut self, dir: &Path) -> Result<Self> {
        let entries = fs::read_dir(dir).map_err(|e| {
            ProcessingError::file_operation(
                format!("Failed to read template directory: {}", e),
                dir.to_path_buf(),
                Some(Box::new(e)),
            )
        })?;

        for entry in entries {
            let path = entry?.path();
            if !path.is_file()
                || path.extension().and_then(|s| s.to_str()) != Some("hbs")
            {
                continue;
            }

            let name = path
                .file_stem()
                .and_then(|s| s.to_str())
                .ok_or_else(|| {
                    ProcessingError::template(
                        "Invalid template filename",
                        path.display().to_string(),
                    )
                })?
                .to_string();

            let source = fs::read_to_string(&path).map_err(|e| {
                ProcessingError::file_operation(
                    format!("Failed to read template file: {}", e),
                    path.clone(),
                    Some(Box::new(e)),
                )
            })?;

            self.engine
                .register_template_string(&name, source)
                .map_err(|e| {
                    ProcessingError::template(
                        format!("Failed to register template: {}", e),
                        &name,
                    )
                })?;
            debug!("registered template `{}` from {}", name, path.display());
        }

        self.template_dir = Some(dir.to_path_buf());
        Ok(self)
    }

    /// Renders premium articles as previews when `public` is set.
    pub fn with_public_mode(mut self, public: bool) -> Self {
        self.public_mode = public;
        self
    }

    /// Number of words kept in a premium preview.
    pub fn with_preview_words(mut self, words: usize) -> Self {
        self.preview_words = words;
        self
    }

    /// Uses `resolver` for index card thumbnails and the `thumbnail`
    /// helper.
    pub fn with_thumbnails(mut self, resolver: ThumbnailResolver) -> Self {
        self.engine.register_helper(
            "thumbnail",
            Box::new(thumbnail_helper(resolver.clone())),
        );
        self.resolver = resolver;
        self
    }

    /// Registered template names, sorted.
    pub fn template_names(&self) -> Vec<String> {
        let mut names: Vec<String> =
            self.engine.get_templates().keys().cloned().collect();
        names.sort();
        names
    }

    /// Renders a full article page.
    pub fn render_article(&self, article: &Article) -> Result<String> {
        let is_preview = article.is_premium && self.public_mode;
        let body_source = if is_preview {
            preview(&article.content, self.preview_words)
        } else {
            article.content.clone()
        };

        let featured = article
            .featured_media()
            .map(|url| self.transformer.transform(url));
        let body = self.transformer.transform(&body_source);

        let instagram = EmbedScript::instagram();
        let scripts: String = [featured.as_deref(), Some(body.as_str())]
            .into_iter()
            .flatten()
            .filter(|markup| needs_instagram_script(markup))
            .filter_map(|_| instagram.ensure_loaded())
            .collect();

        let context = json!({
            "title": article.title,
            "slug": article.slug(),
            "excerpt": article.excerpt(),
            "author": article.author,
            "published_at": article.published_at,
            "is_premium": article.is_premium,
            "is_preview": is_preview,
            "tags": article.tags(),
            "categories": article.categories,
            "featured_media": featured,
            "body": body,
            "scripts": scripts,
        });
        self.render(ARTICLE_TEMPLATE, &context)
    }

    /// Renders the index page, one card per article in the given order.
    pub fn render_index(
        &self,
        title: &str,
        articles: &[Article],
    ) -> Result<String> {
        let cards: Vec<JsonValue> = articles
            .iter()
            .map(|article| {
                json!({
                    "title": article.title,
                    "slug": article.slug(),
                    "excerpt": article.excerpt(),
                    "published_at": article.published_at,
                    "is_premium": article.is_premium,
                    "thumbnail": self.resolver.resolve(article.featured_media()),
                })
            })
            .collect();

        let context = json!({ "title": title, "articles": cards });
        self.render(INDEX_TEMPLATE, &context)
    }

    fn render(&self, template: &str, context: &JsonValue) -> Result<String> {
        self.engine.render(template, context).map_err(|e| {
            ProcessingError::template(
                format!("Template rendering failed: {}", e),
                template,
            )
        })
    }
}

fn media_helper(
    h: &Helper,
    _: &Handlebars,
    _: &Context,
    _: &mut RenderContext,
    out: &mut dyn Output,
) -> HelperResult {
    let raw = h.param(0).and_then(|p| p.value().as_str()).unwrap_or("");
    out.write(&transform(raw))?;
    Ok(())
}

fn thumbnail_helper(
    resolver: ThumbnailResolver,
) -> impl Fn(
    &Helper,
    &Handlebars,
    &Context,
    &mut RenderContext,
    &mut dyn Output,
) -> HelperResult
       + Send
       + Sync {
    move |h: &Helper,
          _: &Handlebars,
          _: &Context,
          _: &mut RenderContext,
          out: &mut dyn Output|
          -> HelperResult {
        let url = h.param(0).and_then(|p| p.value().as_str());
        if let Some(thumb) = resolver.resolve(url) {
            out.write(&html_escape(&thumb))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::Status;
    use tempfile::TempDir;

    fn article(title: &str, content: &str) -> Article {
        Article {
            title: title.to_string(),
            content: content.to_string(),
            status: Status::Published,
            ..Default::default()
        }
    }

    #[test]
    fn test_builtin_templates() -> Result<()> {
        let renderer = PageRenderer::new()?;
        assert_eq!(renderer.template_names(), vec!["article", "index"]);
        Ok(())
    }

    #[test]
    fn test_render_article() -> Result<()> {
        let renderer = PageRenderer::new()?;
        let mut post = article("Tom & Jerry", "**Bold** move\nhttps://youtu.be/dQw4w9WgXcQ");
        post.excerpt = Some("<short>".to_string());
        post.tags = vec!["Cartoons".to_string()];

        let html = renderer.render_article(&post)?;
        assert!(html.contains("<title>Tom &amp; Jerry</title>"));
        assert!(html.contains("&lt;short&gt;"));
        assert!(html.contains(r#"<strong class="font-semibold">Bold</strong> move<br />"#));
        assert!(html.contains("https://www.youtube.com/embed/dQw4w9WgXcQ"));
        assert!(html.contains("#cartoons"));
        assert!(!html.contains("instagram.com/embed.js"));
        assert!(!html.contains("premium-prompt"));
        Ok(())
    }

    #[test]
    fn test_featured_media_is_transformed() -> Result<()> {
        let renderer = PageRenderer::new()?;
        let mut post = article("Clip", "body");
        post.featured_media_url =
            Some(" https://vimeo.com/76979871 ".to_string());

        let html = renderer.render_article(&post)?;
        assert!(html.contains("https://player.vimeo.com/video/76979871"));
        Ok(())
    }

    #[test]
    fn test_instagram_script_once_per_page() -> Result<()> {
        let renderer = PageRenderer::new()?;
        let mut post = article(
            "Posts",
            "https://www.instagram.com/p/AAA/\nhttps://www.instagram.com/reel/BBB/",
        );
        post.featured_media_url =
            Some("https://www.instagram.com/p/CCC/".to_string());

        for _ in 0..2 {
            let html = renderer.render_article(&post)?;
            assert_eq!(html.matches("instagram.com/embed.js").count(), 1);
            assert_eq!(html.matches(r#"class="instagram-media""#).count(), 3);
        }
        Ok(())
    }

    #[test]
    fn test_premium_preview_in_public_mode() -> Result<()> {
        let words: Vec<String> = (1..=10).map(|n| format!("w{n}")).collect();
        let mut post = article("Paid", &words.join(" "));
        post.is_premium = true;

        let full = PageRenderer::new()?.render_article(&post)?;
        assert!(full.contains("w10"));
        assert!(!full.contains("premium-prompt"));

        let public = PageRenderer::new()?
            .with_public_mode(true)
            .with_preview_words(3)
            .render_article(&post)?;
        assert!(public.contains("w1 w2 w3..."));
        assert!(!public.contains("w4"));
        assert!(public.contains("premium-prompt"));
        Ok(())
    }

    #[test]
    fn test_render_index_thumbnails() -> Result<()> {
        let renderer = PageRenderer::new()?;
        let mut video = article("Video", "x");
        video.featured_media_url =
            Some("https://youtu.be/dQw4w9WgXcQ".to_string());
        let mut drive = article("Drive", "x");
        drive.featured_media_url =
            Some("https://drive.google.com/open?id=abc".to_string());
        let plain = article("Plain Text", "x");

        let html = renderer.render_index("Blog", &[video, drive, plain])?;
        assert!(html.contains(
            r#"src="https://img.youtube.com/vi/dQw4w9WgXcQ/maxresdefault.jpg""#
        ));
        assert!(html.contains(
            "https://drive.google.com/thumbnail?id&#x3D;abc&amp;sz&#x3D;w400-h300-c"
        ));
        assert!(html.contains(r#"href="plain-text.html""#));
        assert_eq!(html.matches("<img").count(), 2);
        Ok(())
    }

    #[test]
    fn test_empty_index() -> Result<()> {
        let html = PageRenderer::new()?.render_index("Blog", &[])?;
        assert!(html.contains("No articles yet."));
        Ok(())
    }

    #[test]
    fn test_template_dir_overrides_and_helpers() -> Result<()> {
        let dir = TempDir::new()?;
        fs::write(
            dir.path().join("article.hbs"),
            "<h1>{{title}}</h1>{{{body}}}|{{media \"*x*\"}}|{{thumbnail \"https://youtu.be/dQw4w9WgXcQ\"}}",
        )?;
        fs::write(dir.path().join("notes.txt"), "ignored")?;

        let renderer = PageRenderer::new()?
            .with_thumbnails(ThumbnailResolver::new(
                crate::processors::ThumbnailConfig {
                    youtube_quality: "hqdefault".to_string(),
                    ..Default::default()
                },
            ))
            .with_template_dir(dir.path())?;
        assert_eq!(renderer.template_names(), vec!["article", "index"]);

        let html = renderer.render_article(&article("Custom", "# Top"))?;
        assert_eq!(
            html,
            concat!(
                "<h1>Custom</h1>",
                r#"<h1 class="text-3xl font-bold mt-10 mb-5 text-gray-900">Top</h1>"#,
                r#"|<em class="italic">x</em>|"#,
                "https://img.youtube.com/vi/dQw4w9WgXcQ/hqdefault.jpg"
            )
        );
        Ok(())
    }

    #[test]
    fn test_template_errors() -> Result<()> {
        let dir = TempDir::new()?;
        fs::write(dir.path().join("index.hbs"), "{{#each articles}}")?;
        assert!(matches!(
            PageRenderer::new()?.with_template_dir(dir.path()),
            Err(ProcessingError::Template { ref template, .. }) if template == "index"
        ));

        assert!(matches!(
            PageRenderer::new()?.with_template_dir(&dir.path().join("missing")),
            Err(ProcessingError::FileOperation { .. })
        ));
        Ok(())
    }
}
