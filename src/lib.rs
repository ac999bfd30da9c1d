// Audio Features - waveform normalization and log-mel spectrograms
//
// Turns a decoded recording of any shape into a fixed channel count, sample
// rate and duration, then computes a dB-scaled mel spectrogram of it for the
// downstream emotion classifier. Decoding, model inference and UI live
// outside this crate.

// Stage logging macros - exported for use by other modules
#[macro_use]
pub mod macros;

pub mod config;
pub mod error;
pub mod pipeline;
pub mod processing;
pub mod spectrogram;
pub mod waveform;

pub use config::FeatureConfig;
pub use error::{AudioError, Result};
pub use pipeline::{extract_features, process, process_with_rng, PipelineConfig};
pub use processing::{normalize_channels, normalize_duration, resample, ChannelStrategy};
pub use spectrogram::{make_spectrogram, MelNorm, MelScale, Spectrogram, SpectrogramConfig};
pub use waveform::Waveform;
