//! List site content

use anyhow::Result;

use crate::content::{aggregate, ContentKind, ContentRecord};
use crate::Folio;

/// List aggregated records, optionally restricted to one kind
pub fn run(folio: &Folio, content_type: &str, json: bool) -> Result<()> {
    let records = select(folio, content_type)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&records)?);
        return Ok(());
    }

    println!("Articles ({}):", records.len());
    for record in &records {
        println!(
            "  {} - {} [{}]",
            record.date.format("%Y-%m-%d"),
            record.title,
            record.guid()
        );
    }

    Ok(())
}

fn select(folio: &Folio, content_type: &str) -> Result<Vec<ContentRecord>> {
    let records = match content_type {
        "all" => folio.articles()?,
        other => {
            let name = match other {
                "blogs" => "blog",
                "weeklies" => "weekly",
                name => name,
            };
            let kind: ContentKind = name.parse().map_err(|e: String| {
                anyhow::anyhow!("{}. Available: all, blog, weekly", e)
            })?;
            aggregate([folio.repository(kind).list()?])
        }
    };
    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_select_by_kind() {
        let tmp = TempDir::new().unwrap();
        fs::create_dir_all(tmp.path().join("content/blogs")).unwrap();
        fs::create_dir_all(tmp.path().join("content/weeklies")).unwrap();
        fs::write(
            tmp.path().join("content/blogs/a.md"),
            "---\ntitle: A\ndate: 2024-01-01\n---\n",
        )
        .unwrap();
        fs::write(
            tmp.path().join("content/weeklies/b.md"),
            "---\ntitle: B\ndate: 2024-02-01\n---\n",
        )
        .unwrap();

        let folio = Folio::new(tmp.path()).unwrap();
        assert_eq!(select(&folio, "all").unwrap().len(), 2);

        let weeklies = select(&folio, "weekly").unwrap();
        assert_eq!(weeklies.len(), 1);
        assert_eq!(weeklies[0].slug, "b");
        assert_eq!(select(&folio, "weeklies").unwrap(), weeklies);
        assert_eq!(select(&folio, "blogs").unwrap()[0].slug, "a");

        assert!(select(&folio, "tag").is_err());
    }
}
