//! RSS 2.0 feed generation.
//!
//! Projects aggregated content records into feed items and serializes the
//! channel. Nothing is cached: every call rebuilds the whole document.

use anyhow::{anyhow, Result};
use chrono::{DateTime, FixedOffset, Utc};
use percent_encoding::{utf8_percent_encode, AsciiSet, CONTROLS};
use rss::extension::atom::{AtomExtension, Link};
use rss::validation::Validate;
use rss::{Channel, ChannelBuilder, EnclosureBuilder, GuidBuilder, ImageBuilder, ItemBuilder};

use crate::config::SiteConfig;
use crate::content::ContentRecord;

/// Content type of the serialized feed
pub const FEED_CONTENT_TYPE: &str = "application/xml";

/// Characters escaped in a slug used as a URL path segment
const PATH_SEGMENT: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'/')
    .add(b'<')
    .add(b'>')
    .add(b'?')
    .add(b'`')
    .add(b'{')
    .add(b'}');

/// One feed entry, derived from a content record
#[derive(Debug, Clone, PartialEq)]
pub struct FeedItem {
    pub title: String,
    /// `{kind}-{slug}`
    pub guid: String,
    /// `{site}/{kind}/{slug}`
    pub url: String,
    pub description: String,
    pub pub_date: DateTime<FixedOffset>,
    /// Absolute URL of the cover image
    pub enclosure: String,
}

impl FeedItem {
    /// Project a record, filling in site-wide defaults
    pub fn from_record(record: &ContentRecord, config: &SiteConfig) -> Self {
        let url = format!(
            "{}/{}/{}",
            config.base_url(),
            record.kind,
            utf8_percent_encode(&record.slug, PATH_SEGMENT)
        );
        let description = record
            .description
            .clone()
            .unwrap_or_else(|| config.title.clone());
        let enclosure = match &record.cover {
            Some(cover) => config.absolute_url(cover),
            None => config.avatar_url(),
        };

        Self {
            title: record.title.clone(),
            guid: record.guid(),
            url,
            description,
            pub_date: record.date,
            enclosure,
        }
    }

    fn into_rss(self) -> rss::Item {
        let enclosure = EnclosureBuilder::default()
            .mime_type(image_mime_type(&self.enclosure).to_string())
            .length("0".to_string())
            .url(self.enclosure)
            .build();

        ItemBuilder::default()
            .title(self.title)
            .link(Some(self.url))
            .guid(GuidBuilder::default().permalink(false).value(self.guid).build())
            .description(self.description)
            .pub_date(self.pub_date.to_rfc2822())
            .enclosure(enclosure)
            .build()
    }
}

/// Builds the site feed from aggregated records
pub struct FeedGenerator<'a> {
    config: &'a SiteConfig,
}

impl<'a> FeedGenerator<'a> {
    pub fn new(config: &'a SiteConfig) -> Self {
        Self { config }
    }

    /// Feed items in the order of `records`
    pub fn items(&self, records: &[ContentRecord]) -> Vec<FeedItem> {
        records
            .iter()
            .map(|record| FeedItem::from_record(record, self.config))
            .collect()
    }

    /// Build the RSS channel
    pub fn channel(&self, records: &[ContentRecord]) -> Channel {
        let config = self.config;
        let items: Vec<_> = self
            .items(records)
            .into_iter()
            .map(FeedItem::into_rss)
            .collect();

        let image = ImageBuilder::default()
            .url(config.avatar_url())
            .title(config.title.clone())
            .link(config.base_url().to_string())
            .build();

        let mut self_link = Link::default();
        self_link.set_href(config.feed_url());
        self_link.set_rel("self");
        self_link.set_mime_type(Some("application/rss+xml".to_string()));
        let mut atom = AtomExtension::default();
        atom.set_links(vec![self_link]);

        ChannelBuilder::default()
            .title(config.title.clone())
            .link(config.base_url().to_string())
            .description(config.description.clone())
            .language(Some(config.language.clone()))
            .generator(Some(config.generator.clone()))
            .image(Some(image))
            .last_build_date(Some(Utc::now().to_rfc2822()))
            .atom_ext(Some(atom))
            .items(items)
            .build()
    }

    /// Validate and serialize the feed as XML
    pub fn render(&self, records: &[ContentRecord]) -> Result<String> {
        let channel = self.channel(records);
        channel
            .validate()
            .map_err(|e| anyhow!("RSS validation failed: {e}"))?;
        Ok(channel.to_string())
    }
}

/// Guess an image MIME type from the URL's file extension
fn image_mime_type(url: &str) -> &'static str {
    let path = url.split(['?', '#']).next().unwrap_or(url);
    let ext = path
        .rsplit('/')
        .next()
        .and_then(|name| name.rsplit_once('.'))
        .map(|(_, ext)| ext.to_ascii_lowercase());

    match ext.as_deref() {
        Some("png") => "image/png",
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("gif") => "image/gif",
        Some("webp") => "image/webp",
        Some("avif") => "image/avif",
        Some("svg") => "image/svg+xml",
        _ => "application/octet-stream",
    }
}
