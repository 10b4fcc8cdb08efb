use std::collections::hash_map::DefaultHasher;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;
use rand::SeedableRng;
use rand_pcg::Pcg64;
use serde::{Deserialize, Serialize};
use crate::error::Result;

/// Deterministic choice of which candidates to keep.
///
/// Implementations return the selected positions in ascending order, so the
/// sample keeps the relative order of the candidates. `salt` identifies the
/// call site; equal salts and sizes must give equal selections.
pub trait SamplingMethod: Send + Sync + fmt::Debug {
    fn select(&self, population_size: usize, sample_size: usize, salt: u64) -> Vec<usize>;

    fn name(&self) -> &'static str;
}

/// Keeps the first `sample_size` candidates
#[derive(Debug, Clone, Copy, Default)]
pub struct OrderedSampling;

impl SamplingMethod for OrderedSampling {
    fn select(&self, population_size: usize, sample_size: usize, _salt: u64) -> Vec<usize> {
        (0..population_size.min(sample_size)).collect()
    }

    fn name(&self) -> &'static str {
        "ordered"
    }
}

/// Uniform sampling without replacement, seeded so repeated calls agree.
///
/// The generator is keyed by both the seed and the salt, so different concepts
/// with equally sized candidate lists draw different positions.
#[derive(Debug, Clone, Copy)]
pub struct SeededRandomSampling {
    pub seed: u64,
}

impl SeededRandomSampling {
    pub fn new(seed: u64) -> Self {
        Self { seed }
    }
}

impl SamplingMethod for SeededRandomSampling {
    fn select(&self, population_size: usize, sample_size: usize, salt: u64) -> Vec<usize> {
        let amount = population_size.min(sample_size);
        let mut rng = Pcg64::seed_from_u64(self.seed ^ salt);
        let mut selected = rand::seq::index::sample(&mut rng, population_size, amount).into_vec();
        selected.sort_unstable();
        selected
    }

    fn name(&self) -> &'static str {
        "random"
    }
}

/// Serializable choice of sampling method
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase", tag = "method")]
pub enum SamplingStrategy {
    #[default]
    Ordered,
    Random { seed: u64 },
}

impl SamplingStrategy {
    pub fn method(&self) -> Arc<dyn SamplingMethod> {
        match *self {
            SamplingStrategy::Ordered => Arc::new(OrderedSampling),
            SamplingStrategy::Random { seed } => Arc::new(SeededRandomSampling::new(seed)),
        }
    }
}

/// Bounded sampler for one traversal depth.
///
/// Looks at no more than `limit` candidates and keeps at most `sample_size` of them.
#[derive(Debug, Clone)]
pub struct Sampler {
    sample_size: usize,
    limit: usize,
    method: Arc<dyn SamplingMethod>,
}

impl Sampler {
    /// Sampler examining up to twice `sample_size` candidates
    pub fn new(sample_size: usize, method: Arc<dyn SamplingMethod>) -> Self {
        Self {
            sample_size,
            limit: sample_size.saturating_mul(2),
            method,
        }
    }

    pub fn ordered(sample_size: usize) -> Self {
        Self::new(sample_size, Arc::new(OrderedSampling))
    }

    pub fn with_limit(mut self, limit: usize) -> Self {
        if limit < self.sample_size {
            log::warn!(
                "Sampler limit {} is below sample size {}, samples will hold at most {} items",
                limit, self.sample_size, limit
            );
        }
        self.limit = limit;
        self
    }

    pub fn sample_size(&self) -> usize {
        self.sample_size
    }

    pub fn limit(&self) -> usize {
        self.limit
    }

    pub fn method(&self) -> &dyn SamplingMethod {
        self.method.as_ref()
    }

    /// Draw a sample from `candidates`, stopping at the first error
    pub fn sample<T, I>(&self, candidates: I) -> Result<Vec<T>>
    where
        I: IntoIterator<Item = Result<T>>,
    {
        self.sample_salted(0, candidates)
    }

    /// Like `sample`, with the random selection keyed by `salt`
    pub fn sample_salted<T, I>(&self, salt: u64, candidates: I) -> Result<Vec<T>>
    where
        I: IntoIterator<Item = Result<T>>,
    {
        if self.sample_size == 0 || self.limit == 0 {
            return Ok(Vec::new());
        }

        let population: Vec<T> = candidates.into_iter().take(self.limit).collect::<Result<_>>()?;
        let selected = self.method.select(population.len(), self.sample_size, salt);

        log::debug!(
            "{} sampling kept {} of {} candidates",
            self.method.name(),
            selected.len(),
            population.len()
        );

        let mut selected = selected.into_iter().peekable();
        let sample = population
            .into_iter()
            .enumerate()
            .filter_map(|(position, item)| {
                if selected.peek() == Some(&position) {
                    selected.next();
                    Some(item)
                } else {
                    None
                }
            })
            .collect();

        Ok(sample)
    }
}

/// Stable salt for sampling the neighbours of `concept_id` at `depth`
pub fn concept_salt(concept_id: &str, depth: usize) -> u64 {
    let mut hasher = DefaultHasher::new();
    concept_id.hash(&mut hasher);
    depth.hash(&mut hasher);
    hasher.finish()
}
