use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};

pub type TermId = u32;

/// One document as `(term id, count)` pairs, sorted by term id.
pub type BagOfWords = Vec<(TermId, u32)>;

/// Bidirectional token <-> id mapping over a single batch of documents.
///
/// Ids are dense and handed out in first-seen order.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TermDictionary {
    token_to_id: HashMap<String, TermId>,
    id_to_token: Vec<String>,
    df: Vec<u32>,
    num_docs: u32,
}

impl TermDictionary {
    pub fn new() -> Self { Self::default() }

    pub fn from_documents(docs: &[Vec<String>]) -> Self {
        let mut dict = Self::new();
        for doc in docs {
            dict.add_document(doc);
        }
        dict
    }

    pub fn add_document(&mut self, doc: &[String]) {
        let mut seen_in_doc: HashSet<TermId> = HashSet::new();
        for token in doc {
            let tid = match self.token_to_id.get(token) {
                Some(&tid) => tid,
                None => {
                    let tid = self.id_to_token.len() as TermId;
                    self.token_to_id.insert(token.clone(), tid);
                    self.id_to_token.push(token.clone());
                    self.df.push(0);
                    tid
                }
            };
            if seen_in_doc.insert(tid) {
                self.df[tid as usize] += 1;
            }
        }
        self.num_docs += 1;
    }

    pub fn len(&self) -> usize { self.id_to_token.len() }

    pub fn is_empty(&self) -> bool { self.id_to_token.is_empty() }

    pub fn num_docs(&self) -> u32 { self.num_docs }

    pub fn id(&self, token: &str) -> Option<TermId> { self.token_to_id.get(token).copied() }

    pub fn token(&self, id: TermId) -> Option<&str> {
        self.id_to_token.get(id as usize).map(String::as_str)
    }

    /// Number of documents containing the term.
    pub fn doc_freq(&self, id: TermId) -> u32 { self.df.get(id as usize).copied().unwrap_or(0) }

    pub fn tokens(&self) -> impl Iterator<Item = &str> {
        self.id_to_token.iter().map(String::as_str)
    }

    /// Count known tokens of `doc`. Tokens outside the dictionary are ignored.
    pub fn doc2bow(&self, doc: &[String]) -> BagOfWords {
        let mut counts: HashMap<TermId, u32> = HashMap::new();
        for token in doc {
            if let Some(tid) = self.id(token) {
                *counts.entry(tid).or_insert(0) += 1;
            }
        }
        let mut bow: BagOfWords = counts.into_iter().collect();
        bow.sort_by_key(|(tid, _)| *tid);
        bow
    }

    pub fn corpus(&self, docs: &[Vec<String>]) -> Vec<BagOfWords> {
        docs.iter().map(|doc| self.doc2bow(doc)).collect()
    }

    /// Expand a bag of words back into tokens, grouped by term id.
    pub fn bow2doc(&self, bow: &[(TermId, u32)]) -> Vec<String> {
        let mut tokens = Vec::new();
        for &(tid, count) in bow {
            if let Some(token) = self.token(tid) {
                tokens.extend(std::iter::repeat(token.to_string()).take(count as usize));
            }
        }
        tokens
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doc(words: &[&str]) -> Vec<String> { words.iter().map(|w| w.to_string()).collect() }

    #[test]
    fn ids_follow_first_seen_order() {
        let dict = TermDictionary::from_documents(&[doc(&["rain", "flood", "rain"]), doc(&["flood", "relief"])]);
        assert_eq!(dict.id("rain"), Some(0));
        assert_eq!(dict.id("flood"), Some(1));
        assert_eq!(dict.id("relief"), Some(2));
        assert_eq!(dict.len(), 3);
        assert_eq!(dict.doc_freq(1), 2);
        assert_eq!(dict.doc_freq(0), 1);
        assert_eq!(dict.num_docs(), 2);
    }

    #[test]
    fn doc2bow_counts_and_sorts() {
        let dict = TermDictionary::from_documents(&[doc(&["a", "b", "c"])]);
        let bow = dict.doc2bow(&doc(&["c", "a", "c", "unknown"]));
        assert_eq!(bow, vec![(0, 1), (2, 2)]);
    }

    #[test]
    fn empty_batch_gives_empty_dictionary() {
        let dict = TermDictionary::from_documents(&[doc(&[]), doc(&[])]);
        assert!(dict.is_empty());
        assert_eq!(dict.num_docs(), 2);
    }
}
