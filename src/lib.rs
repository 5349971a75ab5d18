//! folio: content ingestion and RSS feed for a markdown blog
//!
//! Blog posts and weekly notes live as markdown files with YAML front-matter
//! in two content directories. Every feed request re-reads both directories,
//! validates each file, merges the records newest first and serializes them
//! as an RSS 2.0 document.

pub mod commands;
pub mod config;
pub mod content;
pub mod error;
pub mod feed;
pub mod server;

use anyhow::Result;
use chrono_tz::Tz;
use std::path::{Path, PathBuf};

use content::{aggregate, Article, ContentKind, ContentRecord, ContentRepository};
use error::ContentError;
use feed::FeedGenerator;

/// The site: configuration plus its content repositories
#[derive(Debug, Clone)]
pub struct Folio {
    /// Site configuration
    pub config: config::SiteConfig,
    /// Base directory
    pub base_dir: PathBuf,
    /// Public (static asset) directory
    pub public_dir: PathBuf,
    blogs: ContentRepository,
    weeklies: ContentRepository,
}

impl Folio {
    /// Open a site rooted at `base_dir`, reading `_config.yml` if present
    pub fn new<P: AsRef<Path>>(base_dir: P) -> Result<Self> {
        let base_dir = base_dir.as_ref().to_path_buf();
        let config_path = base_dir.join("_config.yml");

        let config = if config_path.exists() {
            config::SiteConfig::load(&config_path)?
        } else {
            config::SiteConfig::default()
        };

        Self::with_config(base_dir, config)
    }

    /// Open a site with an explicit configuration
    pub fn with_config(base_dir: PathBuf, config: config::SiteConfig) -> Result<Self> {
        let tz: Tz = config.tz()?;
        let blogs = ContentRepository::new(base_dir.join(&config.blog_dir), ContentKind::Blog, tz);
        let weeklies =
            ContentRepository::new(base_dir.join(&config.weekly_dir), ContentKind::Weekly, tz);
        let public_dir = base_dir.join(&config.public_dir);

        Ok(Self {
            config,
            base_dir,
            public_dir,
            blogs,
            weeklies,
        })
    }

    /// Repository holding content of `kind`
    pub fn repository(&self, kind: ContentKind) -> &ContentRepository {
        match kind {
            ContentKind::Blog => &self.blogs,
            ContentKind::Weekly => &self.weeklies,
        }
    }

    /// All records of both kinds, newest first
    pub fn articles(&self) -> Result<Vec<ContentRecord>, ContentError> {
        let blogs = self.blogs.list()?;
        let weeklies = self.weeklies.list()?;
        tracing::debug!("Loaded {} blogs and {} weeklies", blogs.len(), weeklies.len());
        Ok(aggregate([blogs, weeklies]))
    }

    /// Build the RSS document from the current content
    pub fn feed_xml(&self) -> Result<String> {
        let start = std::time::Instant::now();
        let articles = self.articles()?;
        let xml = FeedGenerator::new(&self.config).render(&articles)?;
        tracing::info!(
            "Generated feed with {} items in {:.2}ms",
            articles.len(),
            start.elapsed().as_secs_f64() * 1000.0
        );
        Ok(xml)
    }

    /// Look up a single article
    pub fn article(&self, kind: ContentKind, slug: &str) -> Result<Option<Article>, ContentError> {
        self.repository(kind).get(slug)
    }
}
