use crate::{BagOfWords, TermDictionary, TermId};
use anyhow::{bail, Result};
use rand::distributions::{Distribution, WeightedIndex};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use std::time::Instant;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LdaConfig {
    pub num_topics: usize,
    /// Full Gibbs sweeps over the corpus.
    pub passes: usize,
    /// Document-topic prior. `None` means symmetric `1 / num_topics`.
    pub alpha: Option<f64>,
    /// Topic-term prior.
    pub beta: f64,
    /// Fixed seed for reproducible fits; unseeded fits draw from entropy.
    pub seed: Option<u64>,
}

impl Default for LdaConfig {
    fn default() -> Self {
        Self { num_topics: 5, passes: 10, alpha: None, beta: 0.01, seed: None }
    }
}

impl LdaConfig {
    pub fn alpha(&self) -> f64 {
        self.alpha.unwrap_or(1.0 / self.num_topics.max(1) as f64)
    }
}

/// A fitted LDA model over a fixed vocabulary.
#[derive(Debug, Clone)]
pub struct LdaModel {
    num_topics: usize,
    vocab_size: usize,
    alpha: f64,
    beta: f64,
    ndk: Vec<Vec<u32>>, // [doc][topic]
    nkw: Vec<Vec<u32>>, // [topic][term]
    nk: Vec<u32>,       // [topic]
    doc_lengths: Vec<u32>,
}

impl LdaModel {
    /// Fit by collapsed Gibbs sampling: random topic per token, then `passes` sweeps.
    pub fn fit(corpus: &[BagOfWords], vocab_size: usize, config: &LdaConfig) -> Result<Self> {
        let k = config.num_topics;
        if k == 0 {
            bail!("num_topics must be at least 1");
        }
        if corpus.is_empty() {
            bail!("cannot fit LDA on an empty corpus");
        }
        if vocab_size == 0 {
            bail!("cannot fit LDA over an empty vocabulary");
        }
        let alpha = config.alpha();
        let beta = config.beta;
        if !(alpha > 0.0 && beta > 0.0) {
            bail!("alpha and beta must be positive (alpha={alpha}, beta={beta})");
        }

        // Expand bags of words into one term id per token position.
        let mut docs: Vec<Vec<TermId>> = Vec::with_capacity(corpus.len());
        for bow in corpus {
            let mut doc = Vec::new();
            for &(tid, count) in bow {
                if tid as usize >= vocab_size {
                    bail!("term id {tid} outside vocabulary of {vocab_size}");
                }
                doc.extend(std::iter::repeat(tid).take(count as usize));
            }
            docs.push(doc);
        }

        let start = Instant::now();
        let mut rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        };

        let mut ndk = vec![vec![0u32; k]; docs.len()];
        let mut nkw = vec![vec![0u32; vocab_size]; k];
        let mut nk = vec![0u32; k];
        let mut z: Vec<Vec<usize>> = Vec::with_capacity(docs.len());
        for (di, doc) in docs.iter().enumerate() {
            let mut assignments = Vec::with_capacity(doc.len());
            for &w in doc {
                let t = rng.gen_range(0..k);
                ndk[di][t] += 1;
                nkw[t][w as usize] += 1;
                nk[t] += 1;
                assignments.push(t);
            }
            z.push(assignments);
        }

        let vb = vocab_size as f64 * beta;
        let mut weights = vec![0.0f64; k];
        for pass in 0..config.passes {
            for (di, doc) in docs.iter().enumerate() {
                for (pi, &w) in doc.iter().enumerate() {
                    let w = w as usize;
                    let old_t = z[di][pi];
                    ndk[di][old_t] -= 1;
                    nkw[old_t][w] -= 1;
                    nk[old_t] -= 1;

                    // p(t) ∝ (ndk[d][t] + α) * (nkw[t][w] + β) / (nk[t] + Vβ)
                    for (t, weight) in weights.iter_mut().enumerate() {
                        *weight = (ndk[di][t] as f64 + alpha) * (nkw[t][w] as f64 + beta) / (nk[t] as f64 + vb);
                    }
                    let new_t = match WeightedIndex::new(&weights) {
                        Ok(dist) => dist.sample(&mut rng),
                        Err(_) => rng.gen_range(0..k),
                    };

                    z[di][pi] = new_t;
                    ndk[di][new_t] += 1;
                    nkw[new_t][w] += 1;
                    nk[new_t] += 1;
                }
            }
            tracing::trace!(pass = pass + 1, passes = config.passes, "lda pass complete");
        }

        let doc_lengths = docs.iter().map(|d| d.len() as u32).collect();
        tracing::debug!(
            docs = docs.len(),
            vocab_size,
            num_topics = k,
            passes = config.passes,
            elapsed_ms = start.elapsed().as_millis() as u64,
            "fitted lda model"
        );
        Ok(Self { num_topics: k, vocab_size, alpha, beta, ndk, nkw, nk, doc_lengths })
    }

    pub fn num_topics(&self) -> usize { self.num_topics }

    pub fn vocab_size(&self) -> usize { self.vocab_size }

    /// φ[t][w] = (nkw[t][w] + β) / (nk[t] + Vβ)
    pub fn topic_term_weights(&self, topic: usize) -> Vec<f64> {
        let denom = self.nk[topic] as f64 + self.vocab_size as f64 * self.beta;
        self.nkw[topic]
            .iter()
            .map(|&count| (count as f64 + self.beta) / denom)
            .collect()
    }

    /// θ[d][t] = (ndk[d][t] + α) / (N_d + Kα)
    pub fn document_topics(&self, doc: usize) -> Vec<f64> {
        let denom = self.doc_lengths[doc] as f64 + self.num_topics as f64 * self.alpha;
        self.ndk[doc]
            .iter()
            .map(|&count| (count as f64 + self.alpha) / denom)
            .collect()
    }

    /// Top `n` terms of `topic` by weight, heaviest first. Ties go to the lower term id.
    pub fn top_terms(&self, topic: usize, n: usize) -> Vec<(TermId, f64)> {
        let mut pairs: Vec<(TermId, f64)> = self
            .topic_term_weights(topic)
            .into_iter()
            .enumerate()
            .map(|(w, p)| (w as TermId, p))
            .collect();
        pairs.sort_by(|a, b| b.1.total_cmp(&a.1).then(a.0.cmp(&b.0)));
        pairs.truncate(n);
        pairs
    }
}

/// A fitted model together with the dictionary its term ids refer to.
#[derive(Debug, Clone)]
pub struct TopicModel {
    pub dictionary: TermDictionary,
    pub model: LdaModel,
}

impl TopicModel {
    /// Build a dictionary and bag-of-words corpus over `docs`, then fit.
    pub fn build(docs: &[Vec<String>], config: &LdaConfig) -> Result<Self> {
        if docs.is_empty() {
            bail!("no documents to model");
        }
        let dictionary = TermDictionary::from_documents(docs);
        if dictionary.is_empty() {
            bail!("documents contain no terms to model");
        }
        let corpus = dictionary.corpus(docs);
        let model = LdaModel::fit(&corpus, dictionary.len(), config)?;
        Ok(Self { dictionary, model })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seeded(num_topics: usize) -> LdaConfig {
        LdaConfig { num_topics, seed: Some(7), ..LdaConfig::default() }
    }

    #[test]
    fn topic_weights_are_distributions() {
        let corpus = vec![vec![(0, 3), (1, 1)], vec![(1, 2), (2, 4)], vec![(0, 1), (2, 1)]];
        let model = LdaModel::fit(&corpus, 3, &seeded(2)).unwrap();
        for t in 0..model.num_topics() {
            let sum: f64 = model.topic_term_weights(t).iter().sum();
            assert!((sum - 1.0).abs() < 1e-9);
        }
        for d in 0..corpus.len() {
            let sum: f64 = model.document_topics(d).iter().sum();
            assert!((sum - 1.0).abs() < 1e-9);
        }
    }

    #[test]
    fn same_seed_same_fit() {
        let corpus = vec![vec![(0, 2), (1, 1), (3, 1)], vec![(2, 2), (3, 3)]];
        let a = LdaModel::fit(&corpus, 4, &seeded(3)).unwrap();
        let b = LdaModel::fit(&corpus, 4, &seeded(3)).unwrap();
        for t in 0..3 {
            assert_eq!(a.top_terms(t, 4), b.top_terms(t, 4));
        }
    }

    #[test]
    fn rejects_degenerate_input() {
        assert!(LdaModel::fit(&[], 3, &seeded(2)).is_err());
        assert!(LdaModel::fit(&[vec![]], 0, &seeded(2)).is_err());
        assert!(LdaModel::fit(&[vec![(5, 1)]], 2, &seeded(2)).is_err());
        assert!(LdaModel::fit(&[vec![(0, 1)]], 1, &seeded(0)).is_err());
    }

    #[test]
    fn top_terms_capped_by_vocabulary() {
        let model = LdaModel::fit(&[vec![(0, 1), (1, 1)]], 2, &seeded(2)).unwrap();
        assert_eq!(model.top_terms(0, 5).len(), 2);
    }

    #[test]
    fn build_refuses_empty_vocabulary() {
        let docs = vec![Vec::<String>::new()];
        assert!(TopicModel::build(&docs, &seeded(2)).is_err());
        assert!(TopicModel::build(&[], &seeded(2)).is_err());
    }
}
