//! Normalization pipeline configuration

use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};

pub const TARGET_CHANNELS: usize = 2;
pub const TARGET_SAMPLE_RATE: u32 = 16000;
pub const TARGET_DURATION_MS: u32 = 10000;

/// Shape every waveform is normalized to
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    pub target_channels: usize,
    pub target_sample_rate: u32,
    pub target_duration_ms: u32,
    /// Seed for padding placement; `None` draws from OS entropy per call
    pub random_seed: Option<u64>,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            target_channels: TARGET_CHANNELS,
            target_sample_rate: TARGET_SAMPLE_RATE,
            target_duration_ms: TARGET_DURATION_MS,
            random_seed: None,
        }
    }
}

impl PipelineConfig {
    pub fn new(target_channels: usize, target_sample_rate: u32, target_duration_ms: u32) -> Self {
        Self {
            target_channels,
            target_sample_rate,
            target_duration_ms,
            random_seed: None,
        }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.random_seed = Some(seed);
        self
    }

    /// Fresh RNG for one pipeline run
    pub fn rng(&self) -> StdRng {
        match self.random_seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_entropy(),
        }
    }
}
