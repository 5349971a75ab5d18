//! Content module - front-matter ingestion, repositories and aggregation

mod aggregate;
mod frontmatter;
mod markdown;
mod record;
mod repository;

pub use aggregate::aggregate;
pub use frontmatter::{parse_date, FrontMatter, RawContentFile};
pub use markdown::{html_escape, MarkdownRenderer};
pub use record::{Article, ContentKind, ContentRecord};
pub use repository::{slug_from_path, ContentRepository};
