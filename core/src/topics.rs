use crate::TopicModel;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TopicTerm {
    pub term: String,
    pub weight: f64,
}

/// Top terms of one topic. `index` is 1-based.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TopicSummary {
    pub index: usize,
    pub terms: Vec<TopicTerm>,
}

impl fmt::Display for TopicSummary {
    /// `Topic 1: 0.042*"cricket" + 0.031*"match"`
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Topic {}: ", self.index)?;
        for (i, t) in self.terms.iter().enumerate() {
            if i > 0 {
                f.write_str(" + ")?;
            }
            write!(f, "{:.3}*\"{}\"", t.weight, t.term)?;
        }
        Ok(())
    }
}

/// The `top_terms` heaviest terms of every topic slot, in slot order.
pub fn summarize_topics(topic_model: &TopicModel, top_terms: usize) -> Vec<TopicSummary> {
    let dictionary = &topic_model.dictionary;
    (0..topic_model.model.num_topics())
        .map(|topic| TopicSummary {
            index: topic + 1,
            terms: topic_model
                .model
                .top_terms(topic, top_terms)
                .into_iter()
                .filter_map(|(tid, weight)| {
                    dictionary.token(tid).map(|term| TopicTerm { term: term.to_string(), weight })
                })
                .collect(),
        })
        .collect()
}
