//! Spectrogram output type

use ndarray::{Array3, ArrayView3};

/// Log-mel spectrogram in dB, indexed `(channel, mel_band, frame)`
#[derive(Debug, Clone, PartialEq)]
pub struct Spectrogram {
    values: Array3<f32>,
    sample_rate: u32,
    hop_len: usize,
}

impl Spectrogram {
    pub(crate) fn new(values: Array3<f32>, sample_rate: u32, hop_len: usize) -> Self {
        Self {
            values,
            sample_rate,
            hop_len,
        }
    }

    /// `(channels, n_mels, frames)`
    pub fn shape(&self) -> (usize, usize, usize) {
        self.values.dim()
    }

    pub fn num_channels(&self) -> usize {
        self.values.dim().0
    }

    pub fn n_mels(&self) -> usize {
        self.values.dim().1
    }

    pub fn num_frames(&self) -> usize {
        self.values.dim().2
    }

    /// Sample rate of the waveform the filterbank was placed for
    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    pub fn hop_len(&self) -> usize {
        self.hop_len
    }

    pub fn values(&self) -> ArrayView3<'_, f32> {
        self.values.view()
    }

    pub fn into_array(self) -> Array3<f32> {
        self.values
    }

    pub fn max_db(&self) -> f32 {
        self.values.iter().copied().fold(f32::NEG_INFINITY, f32::max)
    }

    pub fn min_db(&self) -> f32 {
        self.values.iter().copied().fold(f32::INFINITY, f32::min)
    }
}
