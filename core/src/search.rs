use crate::Article;
use std::fmt;

/// Category selection value meaning "do not filter by category".
pub const ALL_CATEGORIES: &str = "All";

#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub enum CategoryFilter {
    #[default]
    All,
    /// Exact, case-sensitive category value.
    Exact(String),
}

impl CategoryFilter {
    pub fn parse(value: &str) -> Self {
        if value == ALL_CATEGORIES {
            CategoryFilter::All
        } else {
            CategoryFilter::Exact(value.to_string())
        }
    }

    pub fn matches(&self, category: &str) -> bool {
        match self {
            CategoryFilter::All => true,
            CategoryFilter::Exact(c) => c == category,
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            CategoryFilter::All => ALL_CATEGORIES,
            CategoryFilter::Exact(c) => c,
        }
    }
}

impl fmt::Display for CategoryFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(self.as_str()) }
}

/// Lowercased, trimmed form of a query as used for matching.
pub fn normalize_query(query: &str) -> String {
    query.trim().to_lowercase()
}

/// Articles in `category` whose headline or content contains `query` (case-insensitive
/// literal substring). An empty query keeps everything. Source order is preserved.
pub fn search_articles<'a>(articles: &'a [Article], query: &str, category: &CategoryFilter) -> Vec<&'a Article> {
    let needle = normalize_query(query);
    articles
        .iter()
        .filter(|a| category.matches(&a.category))
        .filter(|a| {
            needle.is_empty()
                || a.headline.to_lowercase().contains(&needle)
                || a.content.to_lowercase().contains(&needle)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn article(id: u32, headline: &str, content: &str, category: &str) -> Article {
        Article {
            id,
            headline: headline.into(),
            content: content.into(),
            category: category.into(),
            url: String::new(),
        }
    }

    #[test]
    fn parse_sentinel() {
        assert_eq!(CategoryFilter::parse("All"), CategoryFilter::All);
        assert_eq!(CategoryFilter::parse("all"), CategoryFilter::Exact("all".into()));
    }

    #[test]
    fn category_match_is_case_sensitive() {
        let articles = vec![article(0, "a", "", "Sports"), article(1, "b", "", "sports")];
        let hits = search_articles(&articles, "", &CategoryFilter::parse("Sports"));
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].id, 0);
    }

    #[test]
    fn query_matches_headline_or_content_ignoring_case() {
        let articles = vec![
            article(0, "CRICKET final", "", "Sports"),
            article(1, "Budget", "talk of cricket funding", "Business"),
            article(2, "Weather", "rain", "India"),
        ];
        let hits = search_articles(&articles, "  Cricket ", &CategoryFilter::All);
        let ids: Vec<u32> = hits.iter().map(|a| a.id).collect();
        assert_eq!(ids, vec![0, 1]);
    }

    #[test]
    fn query_is_a_literal_substring() {
        let articles = vec![article(0, "a.b", "", "x"), article(1, "axb", "", "x")];
        let hits = search_articles(&articles, "a.b", &CategoryFilter::All);
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].id, 0);
    }
}
