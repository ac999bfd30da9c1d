//! Error types for waveform normalization and feature extraction

use std::fmt;

/// Errors raised by the normalization pipeline and the spectrogram generator
#[derive(Debug, Clone, PartialEq)]
pub enum AudioError {
    /// Channel count change outside the supported conversion table
    UnsupportedChannelConversion { from: usize, to: usize },
    /// Sample rate of zero
    InvalidSampleRate(u32),
    /// Target duration of zero milliseconds
    InvalidDuration(u32),
    /// STFT / mel / dB parameters that cannot produce a spectrogram
    InvalidSpectrogramConfig(String),
    /// Malformed sample buffer handed to a constructor
    InvalidWaveform(String),
    /// Resampler backend failure
    Resampling(String),
}

impl fmt::Display for AudioError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AudioError::UnsupportedChannelConversion { from, to } => write!(
                f,
                "Unsupported channel conversion: {} -> {} channels",
                from, to
            ),
            AudioError::InvalidSampleRate(rate) => write!(f, "Invalid sample rate: {}Hz", rate),
            AudioError::InvalidDuration(ms) => write!(f, "Invalid target duration: {}ms", ms),
            AudioError::InvalidSpectrogramConfig(msg) => {
                write!(f, "Invalid spectrogram config: {}", msg)
            }
            AudioError::InvalidWaveform(msg) => write!(f, "Invalid waveform: {}", msg),
            AudioError::Resampling(msg) => write!(f, "Resampling failed: {}", msg),
        }
    }
}

impl std::error::Error for AudioError {}

pub type Result<T> = std::result::Result<T, AudioError>;
