//! Write the feed to disk

use anyhow::Result;
use std::fs;
use std::path::{Path, PathBuf};

use crate::Folio;

/// Generate the feed and write it to `output`, or under the public directory
pub fn run(folio: &Folio, output: Option<&Path>) -> Result<PathBuf> {
    let xml = folio.feed_xml()?;

    let output_path = match output {
        Some(path) => path.to_path_buf(),
        None => folio
            .public_dir
            .join(folio.config.feed_path.trim_start_matches('/')),
    };

    if let Some(parent) = output_path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(&output_path, xml)?;
    tracing::info!("Wrote {:?}", output_path);

    Ok(output_path)
}
