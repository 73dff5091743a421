use crate::{Article, ArticleCollection, ArticleId, DatasetVersion};
use anyhow::{bail, Context, Result};
use serde::Deserialize;
use std::fs::{self, File};
use std::io::Read;
use std::path::Path;

/// Columns every dataset must provide. Others are ignored.
pub const REQUIRED_COLUMNS: [&str; 4] = ["headlines", "content", "category", "url"];

#[derive(Debug, Deserialize)]
struct ArticleRow {
    headlines: String,
    content: String,
    category: String,
    url: String,
}

/// Resolve the content identity of the dataset at `path`.
pub fn dataset_version(path: &Path) -> Result<DatasetVersion> {
    let path = fs::canonicalize(path)
        .with_context(|| format!("dataset not found at {}", path.display()))?;
    let meta = fs::metadata(&path)
        .with_context(|| format!("failed to stat dataset {}", path.display()))?;
    if !meta.is_file() {
        bail!("dataset path {} is not a file", path.display());
    }
    Ok(DatasetVersion { modified: meta.modified().ok(), path })
}

/// Load a CSV dataset from disk.
pub fn load_articles(path: &Path) -> Result<ArticleCollection> {
    let version = dataset_version(path)?;
    let f = File::open(&version.path)
        .with_context(|| format!("failed to open dataset {}", version.path.display()))?;
    read_articles(f, version)
}

/// Parse CSV rows from `reader`. The header row must name every column in [`REQUIRED_COLUMNS`].
pub fn read_articles<R: Read>(reader: R, version: DatasetVersion) -> Result<ArticleCollection> {
    let mut rdr = csv::ReaderBuilder::new().has_headers(true).from_reader(reader);
    let headers = rdr
        .headers()
        .with_context(|| format!("failed to read header of {}", version.path.display()))?
        .clone();
    for column in REQUIRED_COLUMNS {
        if !headers.iter().any(|h| h == column) {
            bail!("dataset {} is missing required column `{}`", version.path.display(), column);
        }
    }

    let mut articles = Vec::new();
    for (row, record) in rdr.deserialize::<ArticleRow>().enumerate() {
        let record = record
            .with_context(|| format!("malformed row {} in {}", row + 1, version.path.display()))?;
        articles.push(Article {
            id: row as ArticleId,
            headline: record.headlines,
            content: record.content,
            category: record.category,
            url: record.url,
        });
    }

    tracing::info!(path = %version.path.display(), rows = articles.len(), "loaded dataset");
    Ok(ArticleCollection::new(version, articles))
}
