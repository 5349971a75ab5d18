//! Site configuration (_config.yml)

use anyhow::{anyhow, Result};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Main site configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    // Site
    pub title: String,
    pub description: String,
    pub language: String,
    pub generator: String,
    /// Site-rooted path or absolute URL of the avatar image
    pub avatar: String,
    /// IANA timezone used for front-matter dates without an offset
    pub timezone: String,

    // URL
    pub url: String,
    pub feed_path: String,

    // Directory
    pub blog_dir: String,
    pub weekly_dir: String,
    pub public_dir: String,

    // Rendering
    pub highlight_theme: String,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            title: "My Blog".to_string(),
            description: String::new(),
            language: "zh-CN".to_string(),
            generator: "folio".to_string(),
            avatar: "/assets/avatar.png".to_string(),
            timezone: "UTC".to_string(),

            url: "http://example.com".to_string(),
            feed_path: "feed.xml".to_string(),

            blog_dir: "content/blogs".to_string(),
            weekly_dir: "content/weeklies".to_string(),
            public_dir: "public".to_string(),

            highlight_theme: "base16-ocean.dark".to_string(),
        }
    }
}

impl SiteConfig {
    /// Load configuration from a file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref())?;
        let config: SiteConfig = serde_yaml::from_str(&content)?;
        config.tz()?;
        Ok(config)
    }

    /// Resolve the configured timezone
    pub fn tz(&self) -> Result<Tz> {
        self.timezone
            .parse::<Tz>()
            .map_err(|e| anyhow!("invalid timezone `{}`: {}", self.timezone, e))
    }

    /// Site URL without a trailing slash
    pub fn base_url(&self) -> &str {
        self.url.trim_end_matches('/')
    }

    /// Turn a site-rooted path into an absolute URL; absolute URLs pass through
    pub fn absolute_url(&self, path: &str) -> String {
        if path.starts_with("http://") || path.starts_with("https://") {
            return path.to_string();
        }
        format!("{}/{}", self.base_url(), path.trim_start_matches('/'))
    }

    /// Absolute URL of the feed document
    pub fn feed_url(&self) -> String {
        self.absolute_url(&self.feed_path)
    }

    /// Absolute URL of the site avatar, used as the default cover
    pub fn avatar_url(&self) -> String {
        self.absolute_url(&self.avatar)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = SiteConfig::default();
        assert_eq!(config.language, "zh-CN");
        assert_eq!(config.blog_dir, "content/blogs");
        assert_eq!(config.tz().unwrap(), Tz::UTC);
    }

    #[test]
    fn test_parse_config() {
        let yaml = r#"
title: Notes
url: https://example.org/
timezone: Asia/Shanghai
"#;
        let config: SiteConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.title, "Notes");
        assert_eq!(config.base_url(), "https://example.org");
        assert_eq!(config.tz().unwrap(), chrono_tz::Asia::Shanghai);
        // Unset keys keep their defaults
        assert_eq!(config.feed_path, "feed.xml");
    }

    #[test]
    fn test_invalid_timezone() {
        let config = SiteConfig {
            timezone: "Mars/Olympus".to_string(),
            ..Default::default()
        };
        assert!(config.tz().is_err());
    }

    #[test]
    fn test_urls() {
        let config = SiteConfig {
            url: "https://example.org/".to_string(),
            ..Default::default()
        };
        assert_eq!(config.feed_url(), "https://example.org/feed.xml");
        assert_eq!(config.avatar_url(), "https://example.org/assets/avatar.png");
        assert_eq!(
            config.absolute_url("https://cdn.example.net/a.png"),
            "https://cdn.example.net/a.png"
        );
    }
}
