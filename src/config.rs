//! Feature configuration - every recognized option in one flat value
//!
//! Matches the option set handed in by the surrounding application:
//! `{target_channels, target_sample_rate, target_duration_ms, n_mels, n_fft,
//! hop_len, top_db, random_seed}` plus the filterbank options. Missing keys
//! fall back to the defaults.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::pipeline::config::{
    PipelineConfig, TARGET_CHANNELS, TARGET_DURATION_MS, TARGET_SAMPLE_RATE,
};
use crate::spectrogram::config::{MelNorm, MelScale, SpectrogramConfig, N_FFT, N_MELS, TOP_DB};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FeatureConfig {
    pub target_channels: usize,
    pub target_sample_rate: u32,
    pub target_duration_ms: u32,
    pub n_mels: usize,
    pub n_fft: usize,
    pub hop_len: Option<usize>,
    pub top_db: f32,
    pub random_seed: Option<u64>,
    pub f_min: f32,
    pub f_max: Option<f32>,
    pub mel_scale: MelScale,
    pub mel_norm: MelNorm,
}

impl Default for FeatureConfig {
    fn default() -> Self {
        Self {
            target_channels: TARGET_CHANNELS,
            target_sample_rate: TARGET_SAMPLE_RATE,
            target_duration_ms: TARGET_DURATION_MS,
            n_mels: N_MELS,
            n_fft: N_FFT,
            hop_len: None,
            top_db: TOP_DB,
            random_seed: None,
            f_min: 0.0,
            f_max: None,
            mel_scale: MelScale::default(),
            mel_norm: MelNorm::default(),
        }
    }
}

impl FeatureConfig {
    pub fn from_json_str(json: &str) -> Result<Self> {
        serde_json::from_str(json).context("Failed to parse feature config JSON")
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read feature config {}", path.display()))?;
        Self::from_json_str(&contents)
            .with_context(|| format!("Invalid feature config {}", path.display()))
    }

    pub fn pipeline(&self) -> PipelineConfig {
        PipelineConfig {
            target_channels: self.target_channels,
            target_sample_rate: self.target_sample_rate,
            target_duration_ms: self.target_duration_ms,
            random_seed: self.random_seed,
        }
    }

    pub fn spectrogram(&self) -> SpectrogramConfig {
        SpectrogramConfig {
            n_mels: self.n_mels,
            n_fft: self.n_fft,
            hop_len: self.hop_len,
            top_db: self.top_db,
            f_min: self.f_min,
            f_max: self.f_max,
            mel_scale: self.mel_scale,
            mel_norm: self.mel_norm,
        }
    }
}
