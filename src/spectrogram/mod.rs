//! Log-mel spectrogram generation
//!
//! Module structure:
//! - config.rs: SpectrogramConfig, mel scale / norm options, defaults
//! - features.rs: Hann window, centered STFT, mel filterbank, dB scaling
//! - types.rs: Spectrogram output type
//!
//! Frames are centered: the signal is padded by `n_fft / 2` on both sides and
//! a waveform of `len` samples yields `len / hop_len + 1` frames.

pub mod config;
pub mod features;
pub mod types;

use ndarray::{s, Array3};

pub use config::{MelNorm, MelScale, SpectrogramConfig};
pub use types::Spectrogram;

use crate::error::Result;
use crate::waveform::Waveform;
use features::{create_mel_filterbank, frame_count, power_to_db, Stft};

/// Compute the dB-scaled mel spectrogram of every channel of `waveform`
pub fn make_spectrogram(waveform: &Waveform, config: &SpectrogramConfig) -> Result<Spectrogram> {
    let sample_rate = waveform.sample_rate();
    config.validate(sample_rate)?;

    let hop_len = config.hop_length();
    let num_frames = frame_count(waveform.len(), hop_len);

    stage_debug!(
        "spectrogram",
        "{} channels x {} samples @ {}Hz: n_fft={}, hop={}, n_mels={}, frames={}",
        waveform.num_channels(),
        waveform.len(),
        sample_rate,
        config.n_fft,
        hop_len,
        config.n_mels,
        num_frames
    );

    let mel_basis = create_mel_filterbank(
        sample_rate,
        config.n_fft,
        config.n_mels,
        config.f_min,
        config.f_max_for(sample_rate),
        config.mel_scale,
        config.mel_norm,
    );

    let stft = Stft::new(config.n_fft, hop_len);
    let mut mel_spec = Array3::<f32>::zeros((waveform.num_channels(), config.n_mels, num_frames));
    for (ch, channel) in waveform.samples().rows().into_iter().enumerate() {
        let power = stft.power(channel)?;
        mel_spec.slice_mut(s![ch, .., ..]).assign(&mel_basis.dot(&power));
    }

    power_to_db(&mut mel_spec, config.top_db);

    Ok(Spectrogram::new(mel_spec, sample_rate, hop_len))
}
