use anyhow::{bail, Context, Result};
use lazy_static::lazy_static;
use regex::Regex;
use unicode_normalization::UnicodeNormalization;
use std::collections::HashSet;
use std::fs;
use std::path::Path;

lazy_static! {
    // Word characters joined by internal hyphens, apostrophes or periods: `well-known`, `o'clock`, `u.s`.
    static ref RE: Regex = Regex::new(r"\w+(?:[-'.]\w+)*").expect("valid regex");
    static ref ENGLISH: Preprocessor = Preprocessor::new(ENGLISH_STOPWORDS.iter().copied());
}

/// The NLTK English stopword list.
pub const ENGLISH_STOPWORDS: &[&str] = &[
    "i","me","my","myself","we","our","ours","ourselves","you","you're","you've","you'll","you'd","your","yours","yourself","yourselves",
    "he","him","his","himself","she","she's","her","hers","herself","it","it's","its","itself",
    "they","them","their","theirs","themselves","what","which","who","whom","this","that","that'll","these","those",
    "am","is","are","was","were","be","been","being","have","has","had","having","do","does","did","doing",
    "a","an","the","and","but","if","or","because","as","until","while","of","at","by","for","with","about","against",
    "between","into","through","during","before","after","above","below","to","from","up","down","in","out","on","off",
    "over","under","again","further","then","once","here","there","when","where","why","how","all","any","both","each",
    "few","more","most","other","some","such","no","nor","not","only","own","same","so","than","too","very",
    "s","t","can","will","just","don","don't","should","should've","now","d","ll","m","o","re","ve","y",
    "ain","aren","aren't","couldn","couldn't","didn","didn't","doesn","doesn't","hadn","hadn't","hasn","hasn't",
    "haven","haven't","isn","isn't","ma","mightn","mightn't","mustn","mustn't","needn","needn't","shan","shan't",
    "shouldn","shouldn't","wasn","wasn't","weren","weren't","won","won't","wouldn","wouldn't",
];

/// Contraction suffixes split off as their own token (`don't` -> `do`, `n't`).
const CLITICS: &[&str] = &["n't", "'s", "'m", "'d", "'ll", "'re", "'ve"];

/// Lowercase `text` (after NFKC normalization) and split it into word tokens.
pub fn tokenize(text: &str) -> Vec<String> {
    let normalized = text.nfkc().collect::<String>().to_lowercase().replace('\u{2019}', "'");
    let mut tokens = Vec::new();
    for m in RE.find_iter(&normalized) {
        let word = m.as_str();
        match CLITICS.iter().find(|c| word.len() > c.len() && word.ends_with(*c)) {
            Some(clitic) => {
                let (stem, suffix) = word.split_at(word.len() - clitic.len());
                tokens.push(stem.to_string());
                tokens.push(suffix.to_string());
            }
            None => tokens.push(word.to_string()),
        }
    }
    tokens
}

/// Preprocess with the embedded English stopword list.
pub fn preprocess(text: &str) -> Vec<String> {
    ENGLISH.preprocess(text)
}

/// Maps raw text to normalized tokens: lowercase, alphabetic-only, stopword-filtered.
#[derive(Debug, Clone)]
pub struct Preprocessor {
    stopwords: HashSet<String>,
}

impl Default for Preprocessor {
    fn default() -> Self { ENGLISH.clone() }
}

impl Preprocessor {
    pub fn new<I, S>(stopwords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let stopwords = stopwords.into_iter().map(|s| s.as_ref().to_lowercase()).collect();
        Self { stopwords }
    }

    pub fn english() -> Self { Self::default() }

    /// Load a stopword list with one word per line. Blank lines and `#` comments are skipped.
    pub fn from_stopword_file(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("failed to read stopword list {}", path.display()))?;
        let words: Vec<&str> = text
            .lines()
            .map(str::trim)
            .filter(|l| !l.is_empty() && !l.starts_with('#'))
            .collect();
        if words.is_empty() {
            bail!("stopword list {} is empty", path.display());
        }
        tracing::info!(path = %path.display(), words = words.len(), "loaded stopword list");
        Ok(Self::new(words))
    }

    pub fn is_stopword(&self, token: &str) -> bool { self.stopwords.contains(token) }

    pub fn stopword_count(&self) -> usize { self.stopwords.len() }

    pub fn preprocess(&self, text: &str) -> Vec<String> {
        tokenize(text)
            .into_iter()
            .filter(|t| t.chars().all(char::is_alphabetic))
            .filter(|t| !self.is_stopword(t))
            .collect()
    }
}
