//! Spectrogram configuration and constants

use serde::{Deserialize, Serialize};

use crate::error::{AudioError, Result};

pub const N_MELS: usize = 64;
pub const N_FFT: usize = 1024;
pub const TOP_DB: f32 = 80.0;
/// Power floor before the log, keeps silence finite (-100 dB)
pub const AMIN: f32 = 1e-10;

/// Frequency warping used to place the mel bands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum MelScale {
    /// `2595 * log10(1 + f / 700)`
    #[default]
    Htk,
    /// Linear below 1 kHz, logarithmic above
    Slaney,
}

/// Per-band weighting of the triangular filters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum MelNorm {
    /// Unit peak for every triangle
    #[default]
    None,
    /// Constant area per band
    Slaney,
}

/// Parameters of the log-mel spectrogram
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SpectrogramConfig {
    pub n_mels: usize,
    pub n_fft: usize,
    /// Frame step; `None` means `n_fft / 4`
    pub hop_len: Option<usize>,
    /// Dynamic range kept below the peak, in dB
    pub top_db: f32,
    pub f_min: f32,
    /// Upper edge of the filterbank; `None` means Nyquist
    pub f_max: Option<f32>,
    pub mel_scale: MelScale,
    pub mel_norm: MelNorm,
}

impl Default for SpectrogramConfig {
    fn default() -> Self {
        Self {
            n_mels: N_MELS,
            n_fft: N_FFT,
            hop_len: None,
            top_db: TOP_DB,
            f_min: 0.0,
            f_max: None,
            mel_scale: MelScale::default(),
            mel_norm: MelNorm::default(),
        }
    }
}

impl SpectrogramConfig {
    pub fn with_n_mels(mut self, n_mels: usize) -> Self {
        self.n_mels = n_mels;
        self
    }

    pub fn with_n_fft(mut self, n_fft: usize) -> Self {
        self.n_fft = n_fft;
        self
    }

    pub fn with_hop_len(mut self, hop_len: usize) -> Self {
        self.hop_len = Some(hop_len);
        self
    }

    pub fn with_top_db(mut self, top_db: f32) -> Self {
        self.top_db = top_db;
        self
    }

    pub fn with_mel_scale(mut self, mel_scale: MelScale) -> Self {
        self.mel_scale = mel_scale;
        self
    }

    /// Effective hop length
    pub fn hop_length(&self) -> usize {
        self.hop_len.unwrap_or((self.n_fft / 4).max(1))
    }

    /// Effective upper filterbank edge for `sample_rate`
    pub fn f_max_for(&self, sample_rate: u32) -> f32 {
        self.f_max.unwrap_or(sample_rate as f32 / 2.0)
    }

    /// Reject parameters that cannot produce a spectrogram at `sample_rate`
    pub fn validate(&self, sample_rate: u32) -> Result<()> {
        let invalid = |msg: String| Err(AudioError::InvalidSpectrogramConfig(msg));

        if self.n_fft == 0 {
            return invalid("n_fft must be positive".to_string());
        }
        if self.n_mels == 0 {
            return invalid("n_mels must be positive".to_string());
        }
        if self.hop_len == Some(0) {
            return invalid("hop_len must be positive".to_string());
        }
        if !self.top_db.is_finite() || self.top_db < 0.0 {
            return invalid(format!("top_db must be a non-negative number, got {}", self.top_db));
        }
        if !self.f_min.is_finite() || self.f_min < 0.0 {
            return invalid(format!("f_min must be non-negative, got {}", self.f_min));
        }

        let nyquist = sample_rate as f32 / 2.0;
        let f_max = self.f_max_for(sample_rate);
        if !f_max.is_finite() || f_max <= self.f_min {
            return invalid(format!("f_max {} must exceed f_min {}", f_max, self.f_min));
        }
        if f_max > nyquist {
            return invalid(format!("f_max {} exceeds Nyquist {}", f_max, nyquist));
        }

        Ok(())
    }
}
