//! Content record models

use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Kind of content, one per content directory
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentKind {
    Blog,
    Weekly,
}

impl ContentKind {
    pub const ALL: [ContentKind; 2] = [ContentKind::Blog, ContentKind::Weekly];

    /// Name used in guids and URL paths
    pub fn as_str(&self) -> &'static str {
        match self {
            ContentKind::Blog => "blog",
            ContentKind::Weekly => "weekly",
        }
    }
}

impl fmt::Display for ContentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ContentKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "blog" => Ok(ContentKind::Blog),
            "weekly" => Ok(ContentKind::Weekly),
            other => Err(format!("unknown content kind: {}", other)),
        }
    }
}

/// Validated front-matter of one content file
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ContentRecord {
    /// File name without extension
    pub slug: String,

    pub title: String,

    /// Publication date
    pub date: DateTime<FixedOffset>,

    pub description: Option<String>,

    /// Absolute URL or site-rooted path of the cover image
    pub cover: Option<String>,

    #[serde(rename = "type")]
    pub kind: ContentKind,
}

impl ContentRecord {
    /// Feed guid, unique per (kind, slug)
    pub fn guid(&self) -> String {
        format!("{}-{}", self.kind, self.slug)
    }
}

/// A record together with its markdown body
#[derive(Debug, Clone)]
pub struct Article {
    pub record: ContentRecord,
    pub body: String,
}
