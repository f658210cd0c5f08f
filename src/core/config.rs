//! # Configuration Module
//!
//! Configuration for a Quillpost build, loaded from a TOML file, overridden
//! by environment variables and by values set in code, then validated.
//!
//! ```toml
//! content_dir = "content"
//! output_dir = "public"
//! template_dir = "templates"
//! profile = "production"
//!
//! [content]
//! extensions = ["md", "txt"]
//! preview_words = 100
//! public_mode = true
//!
//! [thumbnail]
//! youtube_quality = "hqdefault"
//! drive_size = "w400-h300-c"
//!
//! [output]
//! minify = true
//! ```
//!
//! Environment variables use the builder's prefix. A double underscore
//! separates section from key, so `QUILLPOST_CONTENT__PUBLIC_MODE=true`
//! sets `content.public_mode`.
//!
//! ## Example
//!
//! ```rust,no_run
//! use quillpost::core::config::{ConfigBuilder, Profile};
//!
//! let config = ConfigBuilder::new()
//!     .with_file("quillpost.toml")
//!     .with_env_prefix("QUILLPOST_")
//!     .with_profile(Profile::Production)
//!     .build()
//!     .unwrap();
//!
//! assert_eq!(config.read().profile, Profile::Production);
//! ```

use std::collections::HashMap;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use toml::Value as TomlValue;

use crate::core::error::{ProcessingError, Result};
use crate::processors::thumbnail::ThumbnailConfig;

/// Default environment variable prefix.
pub const DEFAULT_ENV_PREFIX: &str = "QUILLPOST_";

/// Operational profile.
///
/// `Production` turns on output minification regardless of
/// `[output] minify`.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Profile {
    /// Readable output, the default.
    #[default]
    Development,
    /// Intermediate profile, same output settings as development.
    Staging,
    /// Minified output.
    Production,
    /// Any other profile name.
    Custom,
}

/// All settings for a build.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Directory holding article source files.
    #[serde(default = "default_content_dir")]
    pub content_dir: PathBuf,

    /// Directory the rendered site is written to.
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,

    /// Optional directory of `*.hbs` templates overriding the built-ins.
    #[serde(default)]
    pub template_dir: Option<PathBuf>,

    /// Current operational profile.
    #[serde(default)]
    pub profile: Profile,

    /// Article loading and preview settings.
    #[serde(default)]
    pub content: ContentConfig,

    /// Thumbnail URL tokens.
    #[serde(default)]
    pub thumbnail: ThumbnailConfig,

    /// Output writer settings.
    #[serde(default)]
    pub output: OutputConfig,
}

/// Article loading and preview settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContentConfig {
    /// File extensions treated as article sources.
    #[serde(default = "default_extensions")]
    pub extensions: Vec<String>,

    /// Words kept in a premium article's public preview.
    #[serde(default = "default_preview_words")]
    pub preview_words: usize,

    /// Render premium articles as previews.
    #[serde(default)]
    pub public_mode: bool,
}

impl Default for ContentConfig {
    fn default() -> Self {
        Self {
            extensions: default_extensions(),
            preview_words: default_preview_words(),
            public_mode: false,
        }
    }
}

/// Output writer settings.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct OutputConfig {
    /// Minify written pages.
    #[serde(default)]
    pub minify: bool,
}

/// Builds a [`Config`] from a file, the environment and explicit
/// overrides, applied in that order.
#[derive(Debug, Default)]
pub struct ConfigBuilder {
    config_file: Option<PathBuf>,
    env_prefix: Option<String>,
    profile: Option<Profile>,
    overrides: HashMap<String, TomlValue>,
}

impl ConfigBuilder {
    /// Creates an empty builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads settings from a TOML file.
    pub fn with_file<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.config_file = Some(path.as_ref().to_path_buf());
        self
    }

    /// Reads overrides from environment variables starting with `prefix`
    /// (e.g. `"QUILLPOST_"`).
    pub fn with_env_prefix<S: Into<String>>(
        mut self,
        prefix: S,
    ) -> Self {
        self.env_prefix = Some(prefix.into());
        self
    }

    /// Sets the profile.
    pub fn with_profile<P: Into<Profile>>(
        mut self,
        profile: P,
    ) -> Self {
        self.profile = Some(profile.into());
        self
    }

    /// Overrides one key. Section keys use dotted names, e.g.
    /// `content.preview_words`.
    pub fn with_override<K, V>(mut self, key: K, value: V) -> Self
    where
        K: Into<String>,
        V: Into<TomlValue>,
    {
        _ = self.overrides.insert(key.into(), value.into());
        self
    }

    /// Loads, overrides and validates the configuration.
    pub fn build(self) -> Result<Arc<RwLock<Config>>> {
        let mut config = if let Some(path) = self.config_file {
            load_from_file(&path)?
        } else {
            Config::default()
        };

        if let Some(profile) = self.profile {
            config.profile = profile;
        }

        if let Some(prefix) = self.env_prefix {
            apply_env_overrides(&mut config, &prefix)?;
        }

        apply_overrides(&mut config, &self.overrides)?;
        validate_config(&config)?;

        Ok(Arc::new(RwLock::new(config)))
    }
}

impl Config {
    /// Validates directories and settings.
    pub fn validate(&self) -> Result<()> {
        validate_config(self)
    }

    /// Whether written pages should be minified.
    pub fn minify_output(&self) -> bool {
        self.output.minify || self.profile == Profile::Production
    }

    /// Whether `path` has one of the configured content extensions.
    pub fn is_content_file(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| {
                self.content
                    .extensions
                    .iter()
                    .any(|e| e.eq_ignore_ascii_case(ext))
            })
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            content_dir: default_content_dir(),
            output_dir: default_output_dir(),
            template_dir: None,
            profile: Profile::default(),
            content: ContentConfig::default(),
            thumbnail: ThumbnailConfig::default(),
            output: OutputConfig::default(),
        }
    }
}

// Internal helper functions

fn load_from_file(path: &Path) -> Result<Config> {
    let content = fs::read_to_string(path).map_err(|e| {
        ProcessingError::configuration(
            format!("Failed to read config file: {}", e),
            Some(path.to_path_buf()),
            Some(Box::new(e)),
        )
    })?;

    toml::from_str(&content).map_err(|e| {
        ProcessingError::configuration(
            format!("Failed to parse config file: {}", e),
            Some(path.to_path_buf()),
            Some(Box::new(e)),
        )
    })
}

fn apply_env_overrides(
    config: &mut Config,
    prefix: &str,
) -> Result<()> {
    for (key, value) in env::vars() {
        if let Some(stripped) = key.strip_prefix(prefix) {
            let config_key = stripped
                .trim_start_matches('_')
                .to_lowercase()
                .replace("__", ".");
            apply_config_value(config, &config_key, &value)?;
        }
    }
    Ok(())
}

fn apply_overrides(
    config: &mut Config,
    overrides: &HashMap<String, TomlValue>,
) -> Result<()> {
    for (key, value) in overrides {
        apply_config_value(config, key, value)?;
    }
    Ok(())
}

fn validate_config(config: &Config) -> Result<()> {
    validate_path(&config.content_dir, "content")?;

    if let Some(template_dir) = &config.template_dir {
        validate_path(template_dir, "template")?;
    }

    if config.content.extensions.is_empty() {
        return Err(ProcessingError::configuration(
            "No content extensions specified",
            None,
            None,
        ));
    }

    if config.content.preview_words == 0 {
        return Err(ProcessingError::configuration(
            "content.preview_words must be greater than zero",
            None,
            None,
        ));
    }

    for (name, token) in [
        ("thumbnail.youtube_quality", &config.thumbnail.youtube_quality),
        ("thumbnail.drive_size", &config.thumbnail.drive_size),
    ] {
        if token.trim().is_empty() {
            return Err(ProcessingError::configuration(
                format!("{} must not be empty", name),
                None,
                None,
            ));
        }
    }

    Ok(())
}

fn apply_config_value<T: ToString>(
    config: &mut Config,
    key: &str,
    value: &T,
) -> Result<()> {
    let value_str = value.to_string().trim_matches('"').to_string();
    match key {
        "content_dir" => config.content_dir = PathBuf::from(value_str),
        "output_dir" => config.output_dir = PathBuf::from(value_str),
        "template_dir" => {
            config.template_dir = Some(PathBuf::from(value_str))
        }
        "profile" => {
            config.profile = match value_str.to_lowercase().as_str() {
                "development" => Profile::Development,
                "staging" => Profile::Staging,
                "production" => Profile::Production,
                _ => Profile::Custom,
            };
        }
        _ => match key.split_once('.') {
            Some(("content", key)) => {
                apply_content_value(&mut config.content, key, &value_str)?
            }
            Some(("thumbnail", key)) => apply_thumbnail_value(
                &mut config.thumbnail,
                key,
                value_str,
            )?,
            Some(("output", key)) => {
                apply_output_value(&mut config.output, key, &value_str)?
            }
            Some((section, _)) => {
                return Err(ProcessingError::configuration(
                    format!("Unknown configuration section: {}", section),
                    None,
                    None,
                ));
            }
            None => {
                return Err(ProcessingError::configuration(
                    format!("Unknown configuration key: {}", key),
                    None,
                    None,
                ));
            }
        },
    }
    Ok(())
}

fn apply_content_value(
    config: &mut ContentConfig,
    key: &str,
    value: &str,
) -> Result<()> {
    match key {
        "extensions" => config.extensions = parse_list(value),
        "preview_words" => {
            config.preview_words = parse_value(key, value)?;
        }
        "public_mode" => config.public_mode = parse_value(key, value)?,
        _ => return Err(unknown_key("content", key)),
    }
    Ok(())
}

fn apply_thumbnail_value(
    config: &mut ThumbnailConfig,
    key: &str,
    value: String,
) -> Result<()> {
    match key {
        "youtube_quality" => config.youtube_quality = value,
        "drive_size" => config.drive_size = value,
        _ => return Err(unknown_key("thumbnail", key)),
    }
    Ok(())
}

fn apply_output_value(
    config: &mut OutputConfig,
    key: &str,
    value: &str,
) -> Result<()> {
    match key {
        "minify" => config.minify = parse_value(key, value)?,
        _ => return Err(unknown_key("output", key)),
    }
    Ok(())
}

fn parse_value<T>(key: &str, value: &str) -> Result<T>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    value.trim().parse().map_err(|e| {
        ProcessingError::configuration(
            format!("Invalid {} value '{}': {}", key, value, e),
            None,
            None,
        )
    })
}

/// Accepts `md,txt` from the environment and `["md", "txt"]` from a
/// TOML array override.
fn parse_list(value: &str) -> Vec<String> {
    value
        .trim_matches(|c| c == '[' || c == ']')
        .split(',')
        .map(|item| item.trim().trim_matches('"').to_string())
        .filter(|item| !item.is_empty())
        .collect()
}

fn unknown_key(section: &str, key: &str) -> ProcessingError {
    ProcessingError::configuration(
        format!("Unknown configuration key: {}.{}", section, key),
        None,
        None,
    )
}

pub(crate) fn validate_path(path: &Path, name: &str) -> Result<()> {
    if !path.exists() {
        return Err(ProcessingError::configuration(
            format!(
                "{} directory does not exist: {}",
                name,
                path.display()
            ),
            Some(path.to_path_buf()),
            None,
        ));
    }

    if !path.is_dir() {
        return Err(ProcessingError::configuration(
            format!(
                "{} path is not a directory: {}",
                name,
                path.display()
            ),
            Some(path.to_path_buf()),
            None,
        ));
    }

    Ok(())
}

// Default value functions

fn default_content_dir() -> PathBuf {
    PathBuf::from("content")
}

fn default_output_dir() -> PathBuf {
    PathBuf::from("public")
}

fn default_extensions() -> Vec<String> {
    vec!["md".to_string(), "markdown".to_string(), "txt".to_string()]
}

fn default_preview_words() -> usize {
    100
}
