//! Content repository - loads every record of one kind from its directory

use chrono_tz::Tz;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

use super::{Article, ContentKind, ContentRecord, RawContentFile};
use crate::error::ContentError;

/// Extension of content files; the slug is the file name without it
const CONTENT_EXT: &str = "md";

/// A directory of content files of a single kind
#[derive(Debug, Clone)]
pub struct ContentRepository {
    dir: PathBuf,
    kind: ContentKind,
    tz: Tz,
}

impl ContentRepository {
    /// Create a repository over `dir`
    pub fn new(dir: impl Into<PathBuf>, kind: ContentKind, tz: Tz) -> Self {
        Self {
            dir: dir.into(),
            kind,
            tz,
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn kind(&self) -> ContentKind {
        self.kind
    }

    /// Load every content file in the directory
    ///
    /// Fails as a whole if the directory or any file is unreadable, or if any
    /// file has invalid front-matter.
    pub fn list(&self) -> Result<Vec<ContentRecord>, ContentError> {
        if !self.dir.is_dir() {
            return Err(ContentError::io(
                &self.dir,
                io::Error::new(io::ErrorKind::NotFound, "content directory not found"),
            ));
        }

        let mut records = Vec::new();

        for entry in WalkDir::new(&self.dir)
            .min_depth(1)
            .max_depth(1)
            .follow_links(true)
            .sort_by_file_name()
        {
            let entry = entry.map_err(|e| {
                let path = e.path().unwrap_or(self.dir.as_path()).to_path_buf();
                ContentError::io(path, e.into())
            })?;
            let path = entry.path();

            if !entry.file_type().is_file() || is_hidden(path) || !is_content_file(path) {
                continue;
            }

            let record = self.load_record(path)?;
            tracing::debug!("Loaded {} `{}` from {:?}", self.kind, record.slug, path);
            records.push(record);
        }

        Ok(records)
    }

    /// Load one article by slug, `None` if no such file exists
    pub fn get(&self, slug: &str) -> Result<Option<Article>, ContentError> {
        if !is_safe_slug(slug) {
            return Ok(None);
        }

        let path = self.dir.join(format!("{}.{}", slug, CONTENT_EXT));
        let text = match fs::read_to_string(&path) {
            Ok(text) => text,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(ContentError::io(path, e)),
        };

        let raw = RawContentFile::split(&path, &text)
            .map_err(|e| ContentError::validation(&path, e))?;
        let record = raw
            .record(slug, self.kind, self.tz)
            .map_err(|e| ContentError::validation(&path, e))?;

        Ok(Some(Article {
            record,
            body: raw.body.to_string(),
        }))
    }

    fn load_record(&self, path: &Path) -> Result<ContentRecord, ContentError> {
        let text = fs::read_to_string(path).map_err(|e| ContentError::io(path, e))?;
        let slug = slug_from_path(path).ok_or_else(|| {
            ContentError::io(
                path,
                io::Error::new(io::ErrorKind::InvalidData, "file name is not valid UTF-8"),
            )
        })?;

        RawContentFile::split(path, &text)
            .and_then(|raw| raw.record(&slug, self.kind, self.tz))
            .map_err(|e| ContentError::validation(path, e))
    }
}

/// Slug of a content file: its file name without extension
pub fn slug_from_path(path: &Path) -> Option<String> {
    path.file_stem()
        .and_then(|s| s.to_str())
        .map(|s| s.to_string())
}

fn is_content_file(path: &Path) -> bool {
    path.extension().and_then(|e| e.to_str()) == Some(CONTENT_EXT)
}

fn is_hidden(path: &Path) -> bool {
    path.file_name()
        .and_then(|n| n.to_str())
        .map(|n| n.starts_with('.'))
        .unwrap_or(false)
}

fn is_safe_slug(slug: &str) -> bool {
    !slug.is_empty() && !slug.starts_with('.') && !slug.contains(['/', '\\'])
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write(dir: &Path, name: &str, content: &str) {
        fs::write(dir.join(name), content).unwrap();
    }

    fn post(title: &str, date: &str) -> String {
        format!("---\ntitle: {}\ndate: {}\n---\n\nBody of {}.\n", title, date, title)
    }

    #[test]
    fn test_slug_is_file_stem() {
        assert_eq!(
            slug_from_path(Path::new("content/blogs/hello-world.md")).as_deref(),
            Some("hello-world")
        );
        assert_eq!(slug_from_path(Path::new("notes.v2.md")).as_deref(), Some("notes.v2"));
    }

    #[test]
    fn test_list_records() {
        let tmp = TempDir::new().unwrap();
        write(tmp.path(), "second.md", &post("Second", "2024-02-01"));
        write(tmp.path(), "first.md", &post("First", "2024-01-01"));

        let repo = ContentRepository::new(tmp.path(), ContentKind::Weekly, Tz::UTC);
        let records = repo.list().unwrap();

        let slugs: Vec<_> = records.iter().map(|r| r.slug.as_str()).collect();
        assert_eq!(slugs, vec!["first", "second"]);
        assert!(records.iter().all(|r| r.kind == ContentKind::Weekly));
        assert_eq!(records[0].title, "First");
    }

    #[test]
    fn test_list_skips_hidden_files_and_subdirectories() {
        let tmp = TempDir::new().unwrap();
        write(tmp.path(), "visible.md", &post("Visible", "2024-01-01"));
        write(tmp.path(), ".DS_Store", "binary junk");
        fs::create_dir(tmp.path().join("drafts")).unwrap();
        write(&tmp.path().join("drafts"), "draft.md", "no front-matter");

        let repo = ContentRepository::new(tmp.path(), ContentKind::Blog, Tz::UTC);
        let records = repo.list().unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].slug, "visible");
    }

    #[test]
    fn test_list_only_reads_markdown_files() {
        let tmp = TempDir::new().unwrap();
        write(tmp.path(), "a.md", &post("A", "2024-01-01"));
        write(tmp.path(), "a.markdown", &post("Other A", "2024-01-02"));
        write(tmp.path(), "notes.txt", "plain notes, no front-matter");

        let repo = ContentRepository::new(tmp.path(), ContentKind::Blog, Tz::UTC);
        let records = repo.list().unwrap();
        let guids: Vec<_> = records.iter().map(|r| r.guid()).collect();
        assert_eq!(guids, vec!["blog-a"]);

        // Every listed slug resolves through lookup
        let article = repo.get("a").unwrap().unwrap();
        assert_eq!(article.record, records[0]);
        assert!(repo.get("notes").unwrap().is_none());
    }

    #[test]
    fn test_one_invalid_file_fails_listing() {
        let tmp = TempDir::new().unwrap();
        write(tmp.path(), "good.md", &post("Good", "2024-01-01"));
        write(tmp.path(), "bad.md", "---\ndate: 2024-01-01\n---\nNo title\n");

        let repo = ContentRepository::new(tmp.path(), ContentKind::Blog, Tz::UTC);
        let err = repo.list().unwrap_err();
        assert!(err.is_validation());
        match err {
            ContentError::Validation { path, .. } => assert!(path.ends_with("bad.md")),
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_missing_directory_is_io_error() {
        let tmp = TempDir::new().unwrap();
        let repo = ContentRepository::new(tmp.path().join("nope"), ContentKind::Blog, Tz::UTC);
        assert!(matches!(repo.list(), Err(ContentError::Io { .. })));
    }

    #[test]
    fn test_get_by_slug() {
        let tmp = TempDir::new().unwrap();
        write(tmp.path(), "hello.md", &post("Hello", "2024-01-01"));

        let repo = ContentRepository::new(tmp.path(), ContentKind::Blog, Tz::UTC);
        let article = repo.get("hello").unwrap().unwrap();
        assert_eq!(article.record.slug, "hello");
        assert_eq!(article.body, "Body of Hello.\n");

        assert!(repo.get("missing").unwrap().is_none());
        assert!(repo.get("../hello").unwrap().is_none());
        assert!(repo.get(".hidden").unwrap().is_none());
    }
}
