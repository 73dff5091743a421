use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::path::PathBuf;
use std::time::SystemTime;

/// Zero-based row position of an article in its source file.
pub type ArticleId = u32;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Article {
    pub id: ArticleId,
    pub headline: String,
    pub content: String,
    pub category: String,
    pub url: String,
}

/// Content identity of a loaded dataset: where it came from and when that file last changed.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DatasetVersion {
    pub path: PathBuf,
    pub modified: Option<SystemTime>,
}

impl DatasetVersion {
    /// Version for collections assembled in memory rather than read from disk.
    pub fn in_memory(label: &str) -> Self {
        Self { path: PathBuf::from(label), modified: None }
    }
}

/// Articles in source order. Ids are ascending.
#[derive(Debug, Clone)]
pub struct ArticleCollection {
    pub version: DatasetVersion,
    articles: Vec<Article>,
}

impl ArticleCollection {
    pub fn new(version: DatasetVersion, articles: Vec<Article>) -> Self {
        Self { version, articles }
    }

    pub fn articles(&self) -> &[Article] { &self.articles }

    pub fn len(&self) -> usize { self.articles.len() }

    pub fn is_empty(&self) -> bool { self.articles.is_empty() }

    pub fn get(&self, id: ArticleId) -> Option<&Article> {
        self.articles
            .binary_search_by_key(&id, |a| a.id)
            .ok()
            .map(|idx| &self.articles[idx])
    }

    /// Distinct category values, sorted.
    pub fn categories(&self) -> Vec<String> {
        self.articles
            .iter()
            .map(|a| a.category.as_str())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .map(str::to_string)
            .collect()
    }
}
