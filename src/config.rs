use serde::{Deserialize, Serialize};
use std::path::Path;
use crate::error::{GraphError, Result};
use crate::neighbourhood::{Sampler, SamplingStrategy};

/// Settings for neighbourhood sampling
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TraversalConfig {
    /// Sample size per depth; the number of entries is the traversal depth
    pub sample_sizes: Vec<usize>,
    /// Each sampler examines at most `sample_size * limit_factor` candidates
    pub limit_factor: usize,
    pub strategy: SamplingStrategy,
}

impl Default for TraversalConfig {
    fn default() -> Self {
        Self {
            sample_sizes: vec![2, 3],
            limit_factor: 2,
            strategy: SamplingStrategy::Ordered,
        }
    }
}

impl TraversalConfig {
    pub async fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let text = tokio::fs::read_to_string(path).await?;
        Self::from_json_str(&text)
    }

    pub fn from_json_str(text: &str) -> Result<Self> {
        let config: TraversalConfig = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.sample_sizes.is_empty() {
            return Err(GraphError::invalid_parameter("sample_sizes must name at least one depth"));
        }

        if self.limit_factor == 0 {
            return Err(GraphError::invalid_parameter("limit_factor must be greater than 0"));
        }

        Ok(())
    }

    /// One sampler per depth, sharing a single sampling method
    pub fn build_samplers(&self) -> Result<Vec<Sampler>> {
        self.validate()?;

        let method = self.strategy.method();
        Ok(self
            .sample_sizes
            .iter()
            .map(|&size| Sampler::new(size, method.clone()).with_limit(size.saturating_mul(self.limit_factor)))
            .collect())
    }
}
