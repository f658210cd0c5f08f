// Copyright © 2026 Quillpost. All rights reserved.
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Command-line interface for Quillpost
//!
//! Argument parsing and command execution. Commands write their results to
//! the supplied writer so they can be exercised without a terminal.
//!
//! # Examples
//!
//! ```
//! use quillpost::cli;
//!
//! let matches = cli::build().get_matches_from(vec![
//!     "quillpost",
//!     "thumbnail",
//!     "https://youtu.be/dQw4w9WgXcQ",
//! ]);
//!
//! let mut out = Vec::new();
//! cli::execute(&matches, &mut out).unwrap();
//! assert_eq!(
//!     String::from_utf8(out).unwrap(),
//!     "https://img.youtube.com/vi/dQw4w9WgXcQ/maxresdefault.jpg\n"
//! );
//! ```

use std::io::{self, Read, Write};
use std::path::PathBuf;

use clap::{value_parser, Arg, ArgAction, ArgMatches, Command};
use log::{debug, info};

use crate::content::Article;
use crate::core::config::{ConfigBuilder, Profile, DEFAULT_ENV_PREFIX};
use crate::core::error::{ProcessingError, Result};
use crate::process::{build_site, read_content, write_content};
use crate::processors::media::transform;
use crate::processors::providers::Provider;
use crate::processors::thumbnail::resolve_thumbnail;
use crate::template::PageRenderer;

/// The current version of Quillpost, as defined in `Cargo.toml`.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Builds the command-line interface.
pub fn build() -> Command {
    Command::new("quillpost")
        .author("Quillpost Contributors")
        .about("Turns blog article text into embeddable HTML and derives card thumbnails.")
        .version(VERSION)
        .subcommand_required(true)
        .arg_required_else_help(true)
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .help("Increase log verbosity (-v, -vv, -vvv)")
                .action(ArgAction::Count)
                .global(true)
        )
        .subcommand(
            Command::new("transform")
                .about("Transform raw article text into HTML")
                .arg(
                    Arg::new("file")
                        .help("Input file; reads standard input when omitted")
                        .value_parser(value_parser!(PathBuf))
                )
        )
        .subcommand(
            Command::new("thumbnail")
                .about("Print the thumbnail URL for a featured media URL")
                .arg(
                    Arg::new("url")
                        .help("Featured media URL")
                        .required(true)
                        .value_parser(value_parser!(String))
                )
        )
        .subcommand(
            Command::new("render")
                .about("Render one article source file as a full page")
                .arg(
                    Arg::new("file")
                        .help("Article source with frontmatter")
                        .required(true)
                        .value_parser(value_parser!(PathBuf))
                )
                .arg(
                    Arg::new("output")
                        .short('o')
                        .long("output")
                        .help("Write the page here instead of standard output")
                        .value_parser(value_parser!(PathBuf))
                )
                .arg(
                    Arg::new("template")
                        .short('t')
                        .long("template")
                        .help("Template directory overriding the built-in pages")
                        .value_parser(value_parser!(PathBuf))
                )
                .arg(
                    Arg::new("public")
                        .long("public")
                        .help("Render premium articles as a preview")
                        .action(ArgAction::SetTrue)
                )
        )
        .subcommand(
            Command::new("build")
                .about("Build the site")
                .arg(
                    Arg::new("content")
                        .short('c')
                        .long("content")
                        .help("Content directory")
                        .value_parser(value_parser!(PathBuf))
                )
                .arg(
                    Arg::new("output")
                        .short('o')
                        .long("output")
                        .help("Output directory")
                        .value_parser(value_parser!(PathBuf))
                )
                .arg(
                    Arg::new("template")
                        .short('t')
                        .long("template")
                        .help("Template directory")
                        .value_parser(value_parser!(PathBuf))
                )
                .arg(
                    Arg::new("config")
                        .long("config")
                        .help("TOML configuration file")
                        .value_parser(value_parser!(PathBuf))
                )
                .arg(
                    Arg::new("minify")
                        .short('m')
                        .long("minify")
                        .help("Minify output")
                        .action(ArgAction::SetTrue)
                )
                .arg(
                    Arg::new("profile")
                        .long("profile")
                        .help("Configuration profile")
                        .value_parser(["development", "staging", "production"])
                )
        )
        .after_help(
            "\x1b[1;4mLicense:\x1b[0m\n  The project is licensed under the terms of \
             both the MIT license and the Apache License (Version 2.0)."
        )
}

/// Runs the subcommand in `matches`, writing its output to `out`.
pub fn execute(matches: &ArgMatches, out: &mut dyn Write) -> Result<()> {
    match matches.subcommand() {
        Some(("transform", sub)) => {
            run_transform(sub.get_one::<PathBuf>("file"), out)
        }
        Some(("thumbnail", sub)) => {
            let url = sub.get_one::<String>("url").map(String::as_str);
            run_thumbnail(url, out)
        }
        Some(("render", sub)) => run_render(sub, out),
        Some(("build", sub)) => run_build(sub, out),
        _ => Err(ProcessingError::internal_error("Unknown command")),
    }
}

fn run_transform(file: Option<&PathBuf>, out: &mut dyn Write) -> Result<()> {
    let raw = match file {
        Some(path) => read_content(path)?,
        None => {
            let mut raw = String::new();
            _ = io::stdin().read_to_string(&mut raw)?;
            raw
        }
    };
    writeln!(out, "{}", transform(&raw))?;
    Ok(())
}

fn run_thumbnail(url: Option<&str>, out: &mut dyn Write) -> Result<()> {
    if let Some(url) = url {
        match Provider::detect(url) {
            Some(provider) => debug!("{url} looks like {provider}"),
            None => debug!("{url} matches no known provider"),
        }
    }
    if let Some(thumb) = resolve_thumbnail(url) {
        writeln!(out, "{thumb}")?;
    }
    Ok(())
}

fn run_render(sub: &ArgMatches, out: &mut dyn Write) -> Result<()> {
    let Some(file) = sub.get_one::<PathBuf>("file") else {
        return Err(ProcessingError::internal_error("Missing input file"));
    };
    let article = Article::parse(&read_content(file)?)
        .map_err(|e| e.with_context(file.display().to_string()))?;
    article
        .validate()
        .map_err(|e| e.with_context(file.display().to_string()))?;

    let mut renderer =
        PageRenderer::new()?.with_public_mode(sub.get_flag("public"));
    if let Some(dir) = sub.get_one::<PathBuf>("template") {
        renderer = renderer.with_template_dir(dir)?;
    }
    let html = renderer.render_article(&article)?;

    match sub.get_one::<PathBuf>("output") {
        Some(path) => {
            write_content(path, &html)?;
            info!("wrote {}", path.display());
        }
        None => out.write_all(html.as_bytes())?,
    }
    Ok(())
}

fn run_build(sub: &ArgMatches, out: &mut dyn Write) -> Result<()> {
    let mut builder = ConfigBuilder::new().with_env_prefix(DEFAULT_ENV_PREFIX);
    if let Some(path) = sub.get_one::<PathBuf>("config") {
        builder = builder.with_file(path);
    }
    for (arg, key) in [
        ("content", "content_dir"),
        ("output", "output_dir"),
        ("template", "template_dir"),
    ] {
        if let Some(path) = sub.get_one::<PathBuf>(arg) {
            builder = builder
                .with_override(key, path.to_string_lossy().into_owned());
        }
    }
    if sub.get_flag("minify") {
        builder = builder.with_override("output.minify", true);
    }
    if let Some(profile) = sub.get_one::<String>("profile") {
        builder = builder.with_profile(match profile.as_str() {
            "production" => Profile::Production,
            "staging" => Profile::Staging,
            _ => Profile::Development,
        });
    }

    let config = builder.build()?;
    let config = config.read().clone();
    info!(
        "building {} into {}",
        config.content_dir.display(),
        config.output_dir.display()
    );

    let report = build_site(&config)?;
    writeln!(
        out,
        "Built {} article page(s) and {} ({} skipped)",
        report.pages.len(),
        report.index.display(),
        report.skipped
    )?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn run(args: &[&str]) -> Result<String> {
        let matches = build().get_matches_from(args);
        let mut out = Vec::new();
        execute(&matches, &mut out)?;
        String::from_utf8(out)
            .map_err(|e| ProcessingError::internal_error(e.to_string()))
    }

    #[test]
    fn test_build_command_parsing() {
        let matches = build().get_matches_from(vec![
            "quillpost",
            "-vv",
            "build",
            "--content",
            "content",
            "--minify",
        ]);
        assert_eq!(matches.get_count("verbose"), 2);
        let build_cmd = matches.subcommand_matches("build");
        assert_eq!(
            build_cmd.and_then(|m| m.get_one::<PathBuf>("content")),
            Some(&PathBuf::from("content"))
        );
        assert!(build_cmd.is_some_and(|m| m.get_flag("minify")));
        assert!(build_cmd
            .is_some_and(|m| m.get_one::<PathBuf>("output").is_none()));
    }

    #[test]
    fn test_verbose_after_subcommand() {
        let matches =
            build().get_matches_from(vec!["quillpost", "thumbnail", "x", "-v"]);
        assert_eq!(matches.get_count("verbose"), 1);
    }

    #[test]
    fn test_thumbnail_command() -> Result<()> {
        assert_eq!(
            run(&["quillpost", "thumbnail", "https://example.com/a.png"])?,
            "https://example.com/a.png\n"
        );
        assert_eq!(run(&["quillpost", "thumbnail", "https://example.com/"])?, "");
        Ok(())
    }

    #[test]
    fn test_transform_file() -> Result<()> {
        let dir = TempDir::new()?;
        let path = dir.path().join("post.txt");
        fs::write(&path, "## Hi\n<u>there</u>")?;
        let path = path.to_string_lossy().into_owned();

        assert_eq!(
            run(&["quillpost", "transform", &path])?,
            concat!(
                r#"<h2 class="text-2xl font-semibold mt-8 mb-4 text-gray-900">Hi</h2><br />"#,
                r#"<u class="underline">there</u>"#,
                "\n"
            )
        );
        Ok(())
    }

    #[test]
    fn test_render_command() -> Result<()> {
        let dir = TempDir::new()?;
        let source = dir.path().join("post.md");
        fs::write(&source, "---\ntitle: Rendered\n---\n**body**\n")?;
        let output = dir.path().join("out/page.html");

        let printed = run(&[
            "quillpost",
            "render",
            &source.to_string_lossy(),
            "-o",
            &output.to_string_lossy(),
        ])?;
        assert_eq!(printed, "");
        let page = fs::read_to_string(&output)?;
        assert!(page.contains("<title>Rendered</title>"));
        assert!(page.contains(r#"<strong class="font-semibold">body</strong>"#));
        Ok(())
    }

    #[test]
    fn test_render_rejects_invalid_article() -> Result<()> {
        let dir = TempDir::new()?;
        let source = dir.path().join("post.md");
        fs::write(&source, "---\ntitle: Empty\n---\n   \n")?;

        let result = run(&["quillpost", "render", &source.to_string_lossy()]);
        assert!(matches!(
            result,
            Err(ProcessingError::Validation { context: Some(_), .. })
        ));
        Ok(())
    }

    #[test]
    fn test_build_command() -> Result<()> {
        let dir = TempDir::new()?;
        let content = dir.path().join("content");
        fs::create_dir(&content)?;
        fs::write(
            content.join("hello.md"),
            "---\ntitle: Hello\nstatus: published\n---\nhi\n",
        )?;
        let output = dir.path().join("site");

        let printed = run(&[
            "quillpost",
            "build",
            "-c",
            &content.to_string_lossy(),
            "-o",
            &output.to_string_lossy(),
        ])?;
        assert!(printed.starts_with("Built 1 article page(s)"));
        assert!(output.join("hello.html").exists());
        assert!(output.join("index.html").exists());
        Ok(())
    }
}
