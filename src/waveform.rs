//! Waveform buffer - planar multi-channel samples tagged with a sample rate

use ndarray::{Array2, ArrayView1, ArrayView2};
use std::fmt;

use crate::error::{AudioError, Result};

/// Decoded audio as a `(channels, samples)` buffer.
///
/// Every channel has the same length by construction, there is at least one
/// channel and the sample rate is non-zero. Transforms never edit a waveform
/// in place; they return a new one.
#[derive(Debug, Clone, PartialEq)]
pub struct Waveform {
    samples: Array2<f32>,
    sample_rate: u32,
}

impl Waveform {
    /// Wrap a planar `(channels, samples)` buffer
    pub fn new(samples: Array2<f32>, sample_rate: u32) -> Result<Self> {
        if samples.nrows() == 0 {
            return Err(AudioError::InvalidWaveform(
                "waveform must have at least one channel".to_string(),
            ));
        }
        if sample_rate == 0 {
            return Err(AudioError::InvalidSampleRate(sample_rate));
        }

        Ok(Self::from_parts(samples, sample_rate))
    }

    /// Build from one sample vector per channel
    pub fn from_channels(channels: Vec<Vec<f32>>, sample_rate: u32) -> Result<Self> {
        let num_channels = channels.len();
        let len = channels.first().map(Vec::len).unwrap_or(0);

        if let Some((idx, ch)) = channels.iter().enumerate().find(|(_, ch)| ch.len() != len) {
            return Err(AudioError::InvalidWaveform(format!(
                "channel {} has {} samples, expected {}",
                idx,
                ch.len(),
                len
            )));
        }

        let flat: Vec<f32> = channels.into_iter().flatten().collect();
        let samples = Array2::from_shape_vec((num_channels, len), flat)
            .map_err(|e| AudioError::InvalidWaveform(e.to_string()))?;

        Self::new(samples, sample_rate)
    }

    /// Build from frame-interleaved samples (`L R L R ...`), as decoders emit them
    pub fn from_interleaved(interleaved: &[f32], channels: usize, sample_rate: u32) -> Result<Self> {
        if channels == 0 {
            return Err(AudioError::InvalidWaveform(
                "waveform must have at least one channel".to_string(),
            ));
        }
        if interleaved.len() % channels != 0 {
            return Err(AudioError::InvalidWaveform(format!(
                "{} interleaved samples do not divide into {} channels",
                interleaved.len(),
                channels
            )));
        }

        let frames = interleaved.len() / channels;
        let samples = Array2::from_shape_fn((channels, frames), |(ch, i)| {
            interleaved[i * channels + ch]
        });

        Self::new(samples, sample_rate)
    }

    /// All-zero waveform
    pub fn silence(channels: usize, len: usize, sample_rate: u32) -> Result<Self> {
        Self::new(Array2::zeros((channels, len)), sample_rate)
    }

    /// Invariants already hold (used by the transforms)
    pub(crate) fn from_parts(samples: Array2<f32>, sample_rate: u32) -> Self {
        debug_assert!(samples.nrows() > 0 && sample_rate > 0);
        Self { samples, sample_rate }
    }

    pub fn num_channels(&self) -> usize {
        self.samples.nrows()
    }

    /// Samples per channel
    pub fn len(&self) -> usize {
        self.samples.ncols()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    pub fn channel(&self, index: usize) -> Option<ArrayView1<'_, f32>> {
        (index < self.num_channels()).then(|| self.samples.row(index))
    }

    pub fn samples(&self) -> ArrayView2<'_, f32> {
        self.samples.view()
    }

    pub fn into_samples(self) -> Array2<f32> {
        self.samples
    }

    /// Duration in whole milliseconds (floor)
    pub fn duration_ms(&self) -> u64 {
        self.len() as u64 * 1000 / self.sample_rate as u64
    }
}

impl fmt::Display for Waveform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Waveform(sample_rate={}Hz, shape=[{}, {}])",
            self.sample_rate,
            self.num_channels(),
            self.len()
        )
    }
}
