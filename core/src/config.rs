use crate::{LdaConfig, Preprocessor};
use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

/// Tunables for a search session. Missing JSON fields take their defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExplorerConfig {
    pub num_topics: usize,
    pub passes: usize,
    /// Terms listed per topic.
    pub top_terms: usize,
    pub alpha: Option<f64>,
    pub beta: f64,
    pub seed: Option<u64>,
    /// Stopword list to use instead of the embedded English one.
    pub stopwords: Option<PathBuf>,
}

impl Default for ExplorerConfig {
    fn default() -> Self {
        let lda = LdaConfig::default();
        Self {
            num_topics: lda.num_topics,
            passes: lda.passes,
            top_terms: 5,
            alpha: lda.alpha,
            beta: lda.beta,
            seed: lda.seed,
            stopwords: None,
        }
    }
}

impl ExplorerConfig {
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let mut f = File::open(path)
            .with_context(|| format!("failed to open config {}", path.display()))?;
        let mut buf = String::new();
        f.read_to_string(&mut buf)?;
        let config: ExplorerConfig = serde_json::from_str(&buf)
            .with_context(|| format!("invalid config {}", path.display()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.num_topics == 0 {
            bail!("num_topics must be at least 1");
        }
        if self.passes == 0 {
            bail!("passes must be at least 1");
        }
        if self.top_terms == 0 {
            bail!("top_terms must be at least 1");
        }
        if !(self.beta > 0.0) {
            bail!("beta must be positive, got {}", self.beta);
        }
        if let Some(alpha) = self.alpha {
            if !(alpha > 0.0) {
                bail!("alpha must be positive, got {alpha}");
            }
        }
        Ok(())
    }

    pub fn lda(&self) -> LdaConfig {
        LdaConfig {
            num_topics: self.num_topics,
            passes: self.passes,
            alpha: self.alpha,
            beta: self.beta,
            seed: self.seed,
        }
    }

    pub fn preprocessor(&self) -> Result<Preprocessor> {
        match &self.stopwords {
            Some(path) => Preprocessor::from_stopword_file(path),
            None => Ok(Preprocessor::english()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_json_uses_defaults() {
        let config: ExplorerConfig = serde_json::from_str(r#"{"num_topics": 8, "seed": 3}"#).unwrap();
        assert_eq!(config.num_topics, 8);
        assert_eq!(config.seed, Some(3));
        assert_eq!(config.passes, 10);
        assert_eq!(config.top_terms, 5);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn zero_topics_rejected() {
        let config = ExplorerConfig { num_topics: 0, ..ExplorerConfig::default() };
        assert!(config.validate().is_err());
    }
}
