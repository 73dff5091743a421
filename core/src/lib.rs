pub mod article;
pub mod cache;
pub mod config;
pub mod dataset;
pub mod dictionary;
pub mod lda;
pub mod pipeline;
pub mod search;
pub mod tokenizer;
pub mod topics;

pub use article::{Article, ArticleCollection, ArticleId, DatasetVersion};
pub use config::ExplorerConfig;
pub use dictionary::{BagOfWords, TermDictionary, TermId};
pub use lda::{LdaConfig, LdaModel, TopicModel};
pub use pipeline::{Explorer, SearchOutcome, TopicOutcome};
pub use search::CategoryFilter;
pub use tokenizer::Preprocessor;
pub use topics::{TopicSummary, TopicTerm};
