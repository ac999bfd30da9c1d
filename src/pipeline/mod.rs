//! Normalization pipeline - channels, then sample rate, then duration
//!
//! Duration is measured in samples at the target rate, so resampling has to
//! run before padding/truncation. Any stage error is returned as-is.

pub mod config;

use rand::Rng;

pub use config::PipelineConfig;

use crate::config::FeatureConfig;
use crate::error::Result;
use crate::processing::{normalize_channels, normalize_duration, resample};
use crate::spectrogram::{make_spectrogram, Spectrogram};
use crate::waveform::Waveform;

/// Normalize `waveform` to the configured shape.
///
/// Padding placement comes from an RNG seeded with `config.random_seed`, or
/// from OS entropy when no seed is set.
pub fn process(waveform: &Waveform, config: &PipelineConfig) -> Result<Waveform> {
    process_with_rng(waveform, config, &mut config.rng())
}

/// Same as [`process`] with a caller-supplied RNG (`config.random_seed` is ignored)
pub fn process_with_rng<R: Rng + ?Sized>(
    waveform: &Waveform,
    config: &PipelineConfig,
    rng: &mut R,
) -> Result<Waveform> {
    stage_debug!(
        "pipeline",
        "normalizing {} to {}ch / {}Hz / {}ms",
        waveform,
        config.target_channels,
        config.target_sample_rate,
        config.target_duration_ms
    );

    let rechanneled = normalize_channels(waveform, config.target_channels)?;
    let resampled = resample(&rechanneled, config.target_sample_rate)?;
    let normalized = normalize_duration(&resampled, config.target_duration_ms, rng)?;

    stage_trace!("pipeline", "normalized to {}", normalized);

    Ok(normalized)
}

/// Normalize, then compute the log-mel spectrogram of the result
pub fn extract_features(
    waveform: &Waveform,
    config: &FeatureConfig,
) -> Result<(Waveform, Spectrogram)> {
    let normalized = process(waveform, &config.pipeline())?;
    let spectrogram = make_spectrogram(&normalized, &config.spectrogram())?;
    Ok((normalized, spectrogram))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AudioError;
    use crate::spectrogram::SpectrogramConfig;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::f32::consts::PI;

    fn init_logger() {
        let _ = env_logger::builder().is_test(true).try_init();
    }

    fn chirp(channels: usize, sample_rate: u32, len: usize) -> Waveform {
        let data = (0..channels)
            .map(|ch| {
                (0..len)
                    .map(|i| {
                        let t = i as f32 / sample_rate as f32;
                        0.3 * (2.0 * PI * (200.0 + 100.0 * ch as f32) * t).sin()
                    })
                    .collect()
            })
            .collect();
        Waveform::from_channels(data, sample_rate).unwrap()
    }

    #[test]
    fn test_silent_mono_clip_normalizes_to_stereo_second() {
        init_logger();
        let wav = Waveform::silence(1, 4000, 8000).unwrap();
        let config = PipelineConfig::new(2, 16000, 1000).with_seed(0);

        let out = process(&wav, &config).unwrap();
        assert_eq!(out.num_channels(), 2);
        assert_eq!(out.sample_rate(), 16000);
        assert_eq!(out.len(), 16000);
        assert!(out.samples().iter().all(|&x| x == 0.0));

        let spec_config = SpectrogramConfig::default().with_n_mels(64).with_n_fft(1024);
        let spec = make_spectrogram(&out, &spec_config).unwrap();
        assert_eq!(spec.shape(), (2, 64, 16000 / 256 + 1));
        assert_eq!(spec.min_db(), spec.max_db());
    }

    #[test]
    fn test_normalized_input_passes_through() {
        init_logger();
        let wav = chirp(2, 16000, 16000);
        let config = PipelineConfig::new(2, 16000, 1000);
        assert_eq!(process(&wav, &config).unwrap(), wav);
    }

    #[test]
    fn test_second_pass_is_noop() {
        let wav = chirp(1, 22050, 5000);
        let config = PipelineConfig::new(2, 16000, 500).with_seed(99);

        let once = process(&wav, &config).unwrap();
        let twice = process(&once, &config).unwrap();
        assert_eq!(once, twice);
    }

    #[test]
    fn test_seed_makes_padding_reproducible() {
        let wav = chirp(1, 8000, 1000);
        let config = PipelineConfig::new(1, 8000, 1000).with_seed(5);
        assert_eq!(process(&wav, &config).unwrap(), process(&wav, &config).unwrap());
    }

    #[test]
    fn test_explicit_rng_matches_seeded_config() {
        let wav = chirp(2, 8000, 1000);
        let config = PipelineConfig::new(2, 8000, 1000).with_seed(17);

        let seeded = process(&wav, &config).unwrap();
        let explicit = process_with_rng(&wav, &config, &mut StdRng::seed_from_u64(17)).unwrap();
        assert_eq!(seeded, explicit);
    }

    #[test]
    fn test_long_clip_is_truncated_after_resampling() {
        let wav = chirp(2, 44100, 44100);
        let config = PipelineConfig::new(1, 16000, 500);

        let out = process(&wav, &config).unwrap();
        assert_eq!(out.num_channels(), 1);
        assert_eq!(out.len(), 8000);
    }

    #[test]
    fn test_stage_errors_propagate() {
        let wav = chirp(3, 16000, 100);
        let err = process(&wav, &PipelineConfig::new(2, 16000, 1000)).unwrap_err();
        assert_eq!(err, AudioError::UnsupportedChannelConversion { from: 3, to: 2 });

        let wav = chirp(2, 16000, 100);
        let err = process(&wav, &PipelineConfig::new(2, 0, 1000)).unwrap_err();
        assert_eq!(err, AudioError::InvalidSampleRate(0));

        let err = process(&wav, &PipelineConfig::new(2, 16000, 0)).unwrap_err();
        assert_eq!(err, AudioError::InvalidDuration(0));
    }

    #[test]
    fn test_extract_features_chains_both_stages() {
        init_logger();
        let wav = chirp(1, 8000, 2000);
        let config = FeatureConfig {
            target_duration_ms: 500,
            n_mels: 32,
            n_fft: 512,
            random_seed: Some(3),
            ..Default::default()
        };

        let (normalized, spec) = extract_features(&wav, &config).unwrap();
        assert_eq!(normalized.samples().dim(), (2, 8000));
        assert_eq!(spec.shape(), (2, 32, 8000 / 128 + 1));
        assert_eq!(spec.sample_rate(), 16000);
    }
}
