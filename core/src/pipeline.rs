use crate::cache::{DatasetCache, MemoCache};
use crate::search::{normalize_query, search_articles};
use crate::topics::summarize_topics;
use crate::{Article, ArticleCollection, ArticleId, CategoryFilter, DatasetVersion, ExplorerConfig, Preprocessor, TopicModel, TopicSummary};
use anyhow::Result;
use parking_lot::Mutex;
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// What the topic step produced for one search.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "state", content = "topics", rename_all = "snake_case")]
pub enum TopicOutcome {
    /// Nothing matched; no model was built.
    NoResults,
    /// Matches exist but none has any modelable content.
    NoContent,
    Topics(Vec<TopicSummary>),
}

/// Matches are stored as ids into the shared collection they were found in.
#[derive(Debug, Clone, Serialize)]
pub struct SearchOutcome {
    pub query: String,
    pub category: String,
    pub hits: Vec<ArticleId>,
    pub topics: TopicOutcome,
    #[serde(skip)]
    collection: Arc<ArticleCollection>,
}

impl SearchOutcome {
    /// Matched articles in source order.
    pub fn articles(&self) -> impl Iterator<Item = &Article> + '_ {
        self.hits.iter().filter_map(|&id| self.collection.get(id))
    }

    pub fn len(&self) -> usize { self.hits.len() }

    pub fn is_empty(&self) -> bool { self.hits.is_empty() }

    pub fn collection(&self) -> &Arc<ArticleCollection> { &self.collection }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SearchKey {
    pub query: String,
    pub category: CategoryFilter,
    pub version: DatasetVersion,
}

impl SearchKey {
    pub fn new(query: &str, category: &CategoryFilter, version: &DatasetVersion) -> Self {
        Self { query: normalize_query(query), category: category.clone(), version: version.clone() }
    }
}

/// Filter, preprocess, fit and summarize in one synchronous pass.
pub fn run_search(
    collection: &Arc<ArticleCollection>,
    preprocessor: &Preprocessor,
    config: &ExplorerConfig,
    query: &str,
    category: &CategoryFilter,
) -> Result<SearchOutcome> {
    let articles = search_articles(collection.articles(), query, category);
    tracing::debug!(query, %category, hits = articles.len(), "filtered articles");

    let topics = if articles.is_empty() {
        TopicOutcome::NoResults
    } else {
        let docs: Vec<Vec<String>> = articles.iter().map(|a| preprocessor.preprocess(&a.content)).collect();
        if docs.iter().all(Vec::is_empty) {
            TopicOutcome::NoContent
        } else {
            let topic_model = TopicModel::build(&docs, &config.lda())?;
            TopicOutcome::Topics(summarize_topics(&topic_model, config.top_terms))
        }
    };

    Ok(SearchOutcome {
        query: normalize_query(query),
        category: category.to_string(),
        hits: articles.iter().map(|a| a.id).collect(),
        topics,
        collection: Arc::clone(collection),
    })
}

/// Search session over one dataset file.
pub struct Explorer {
    dataset_path: PathBuf,
    config: ExplorerConfig,
    preprocessor: Preprocessor,
    datasets: DatasetCache,
    outcomes: MemoCache<SearchKey, SearchOutcome>,
    current_version: Mutex<Option<DatasetVersion>>,
}

impl Explorer {
    /// Validate `config`, provision the stopword list and load the dataset. Any failure is fatal.
    pub fn open(dataset_path: impl AsRef<Path>, config: ExplorerConfig) -> Result<Self> {
        config.validate()?;
        let preprocessor = config.preprocessor()?;
        let explorer = Self {
            dataset_path: dataset_path.as_ref().to_path_buf(),
            config,
            preprocessor,
            datasets: DatasetCache::new(),
            outcomes: MemoCache::new(),
            current_version: Mutex::new(None),
        };
        explorer.collection()?;
        Ok(explorer)
    }

    pub fn config(&self) -> &ExplorerConfig { &self.config }

    pub fn dataset_path(&self) -> &Path { &self.dataset_path }

    /// The current dataset. Results cached against an older version are dropped.
    pub fn collection(&self) -> Result<Arc<ArticleCollection>> {
        let collection = self.datasets.load(&self.dataset_path)?;
        let mut current = self.current_version.lock();
        if current.as_ref() != Some(&collection.version) {
            if current.is_some() {
                self.outcomes.retain(|key| key.version == collection.version);
            }
            *current = Some(collection.version.clone());
        }
        Ok(collection)
    }

    pub fn categories(&self) -> Result<Vec<String>> {
        Ok(self.collection()?.categories())
    }

    pub fn article(&self, id: ArticleId) -> Result<Option<Article>> {
        Ok(self.collection()?.get(id).cloned())
    }

    pub fn search(&self, query: &str, category: &CategoryFilter) -> Result<Arc<SearchOutcome>> {
        let collection = self.collection()?;
        let key = SearchKey::new(query, category, &collection.version);
        self.outcomes.get_or_try_insert_with(key, || {
            run_search(&collection, &self.preprocessor, &self.config, query, category)
        })
    }

    /// Forget cached search results and datasets; the next call reloads from disk.
    pub fn invalidate(&self) {
        self.outcomes.clear();
        self.datasets.clear();
        *self.current_version.lock() = None;
        tracing::info!(path = %self.dataset_path.display(), "cleared cached datasets and results");
    }

    pub fn cached_searches(&self) -> usize { self.outcomes.len() }
}
