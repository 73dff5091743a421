use anyhow::Result;
use axum::{extract::{Path, Query, State}, http::StatusCode, routing::get, Json, Router};
use newsscope_core::search::ALL_CATEGORIES;
use newsscope_core::{ArticleId, CategoryFilter, Explorer, ExplorerConfig, TopicOutcome};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::sync::Arc;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::trace::TraceLayer;

const SNIPPET_BEFORE: usize = 100;
const SNIPPET_AFTER: usize = 200;

#[derive(Deserialize)]
pub struct SearchParams {
    #[serde(default)]
    pub q: String,
    #[serde(default = "default_category")]
    pub category: String,
}
fn default_category() -> String { ALL_CATEGORIES.to_string() }

#[derive(Serialize)]
pub struct SearchResponse {
    pub query: String,
    pub category: String,
    pub took_ms: u128,
    pub took_s: f64,
    pub total_hits: usize,
    pub results: Vec<SearchHit>,
    pub topics: TopicOutcome,
}

#[derive(Serialize)]
pub struct SearchHit {
    pub article_id: ArticleId,
    pub headline: String,
    pub category: String,
    pub url: String,
    pub snippet: Option<String>,
}

#[derive(Clone)]
pub struct AppState {
    pub explorer: Arc<Explorer>,
}

type ApiError = (StatusCode, Json<serde_json::Value>);

/// Load the dataset and build the router. Fails if the dataset cannot be loaded.
pub fn build_app(dataset: impl Into<PathBuf>, config: ExplorerConfig) -> Result<Router> {
    let dataset = dataset.into();
    let explorer = Explorer::open(&dataset, config)?;
    tracing::info!(dataset = %dataset.display(), "dataset ready");
    let app_state = AppState { explorer: Arc::new(explorer) };

    // CORS: read CORS_ALLOW_ORIGIN (comma-separated) or allow Any by default
    let cors = match std::env::var("CORS_ALLOW_ORIGIN") {
        Ok(val) => {
            let origins: Vec<_> = val
                .split(',')
                .filter_map(|s| s.trim().parse().ok())
                .collect();
            if origins.is_empty() {
                CorsLayer::new().allow_origin(Any).allow_methods(Any).allow_headers(Any)
            } else {
                CorsLayer::new().allow_origin(AllowOrigin::list(origins)).allow_methods(Any).allow_headers(Any)
            }
        }
        Err(_) => CorsLayer::new().allow_origin(Any).allow_methods(Any).allow_headers(Any),
    };

    let app = Router::new()
        .route("/health", get(|| async { "ok" }))
        .route("/categories", get(categories_handler))
        .route("/search", get(search_handler))
        .route("/article/:article_id", get(article_handler))
        .with_state(app_state)
        .layer(cors)
        .layer(TraceLayer::new_for_http());
    Ok(app)
}

pub async fn categories_handler(State(state): State<AppState>) -> Result<Json<Vec<String>>, ApiError> {
    let mut categories = vec![ALL_CATEGORIES.to_string()];
    categories.extend(state.explorer.categories().map_err(internal_error)?);
    Ok(Json(categories))
}

pub async fn search_handler(State(state): State<AppState>, Query(params): Query<SearchParams>) -> Result<Json<SearchResponse>, ApiError> {
    let start = std::time::Instant::now();
    let category = CategoryFilter::parse(&params.category);
    let explorer = Arc::clone(&state.explorer);
    let query = params.q.clone();
    // Topic fitting is CPU-bound; keep it off the async workers.
    let outcome = tokio::task::spawn_blocking(move || explorer.search(&query, &category))
        .await
        .map_err(|e| internal_error(anyhow::Error::new(e)))?
        .map_err(internal_error)?;

    let needle = params.q.trim();
    let results: Vec<SearchHit> = outcome
        .articles()
        .map(|a| SearchHit {
            article_id: a.id,
            headline: a.headline.clone(),
            category: a.category.clone(),
            url: a.url.clone(),
            snippet: snippet_from_text(&a.content, needle),
        })
        .collect();

    let elapsed = start.elapsed();
    tracing::debug!(query = %outcome.query, category = %outcome.category, hits = results.len(), "search served");
    Ok(Json(SearchResponse {
        query: outcome.query.clone(),
        category: outcome.category.clone(),
        took_ms: elapsed.as_millis(),
        took_s: elapsed.as_secs_f64(),
        total_hits: results.len(),
        results,
        topics: outcome.topics.clone(),
    }))
}

pub async fn article_handler(State(state): State<AppState>, Path(article_id): Path<ArticleId>) -> Result<Json<serde_json::Value>, ApiError> {
    match state.explorer.article(article_id).map_err(internal_error)? {
        Some(article) => Ok(Json(serde_json::json!({
            "article_id": article.id,
            "headline": article.headline,
            "content": article.content,
            "category": article.category,
            "url": article.url,
        }))),
        None => Err((StatusCode::NOT_FOUND, Json(serde_json::json!({ "error": "not found" })))),
    }
}

fn internal_error(err: anyhow::Error) -> ApiError {
    tracing::error!(error = %format!("{err:#}"), "request failed");
    (StatusCode::INTERNAL_SERVER_ERROR, Json(serde_json::json!({ "error": format!("{err:#}") })))
}

/// Up to ~300 bytes of `text` around the first case-insensitive occurrence of `needle`,
/// with every occurrence wrapped in `<em>`.
pub fn snippet_from_text(text: &str, needle: &str) -> Option<String> {
    if text.is_empty() { return None; }
    let snippet = match find_case_insensitive(text, needle) {
        Some(idx) => {
            let start = floor_char_boundary(text, idx.saturating_sub(SNIPPET_BEFORE));
            let end = floor_char_boundary(text, (idx + SNIPPET_AFTER).min(text.len()));
            &text[start..end]
        }
        None => &text[..floor_char_boundary(text, SNIPPET_AFTER.min(text.len()))],
    };
    Some(highlight_terms(snippet, needle))
}

fn find_case_insensitive(haystack: &str, needle: &str) -> Option<usize> {
    if needle.is_empty() { return None; }
    let h = haystack.to_lowercase();
    // Offsets are only meaningful while lowercasing preserved byte lengths.
    if h.len() != haystack.len() { return None; }
    h.find(&needle.to_lowercase())
}

fn floor_char_boundary(s: &str, mut idx: usize) -> usize {
    while idx > 0 && !s.is_char_boundary(idx) {
        idx -= 1;
    }
    idx
}

fn highlight_terms(snippet: &str, needle: &str) -> String {
    if needle.is_empty() { return snippet.to_string(); }
    match regex::RegexBuilder::new(&regex::escape(needle)).case_insensitive(true).build() {
        Ok(pat) => pat.replace_all(snippet, |caps: &regex::Captures| format!("<em>{}</em>", &caps[0])).to_string(),
        Err(_) => snippet.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn snippet_highlights_match() {
        let s = snippet_from_text("India beat Australia in a Cricket thriller.", "cricket").unwrap();
        assert_eq!(s, "India beat Australia in a <em>Cricket</em> thriller.");
    }

    #[test]
    fn snippet_without_query_is_prefix() {
        let text = "é".repeat(150);
        let s = snippet_from_text(&text, "").unwrap();
        assert_eq!(s.chars().count(), 100);
        assert!(snippet_from_text("", "x").is_none());
    }

    #[test]
    fn snippet_window_around_late_match() {
        let text = format!("{}needle{}", "a".repeat(500), "b".repeat(500));
        let s = snippet_from_text(&text, "needle").unwrap();
        assert!(s.starts_with(&"a".repeat(100)));
        assert!(s.contains("<em>needle</em>"));
        assert_eq!(s.len(), 300 + "<em></em>".len());
    }
}
