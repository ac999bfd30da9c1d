// Audio Processing - Channel count normalization
use ndarray::{concatenate, s, Axis};

use crate::error::{AudioError, Result};
use crate::waveform::Waveform;

/// How a supported `(from, to)` channel conversion is carried out
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChannelStrategy {
    /// Counts already match
    Keep,
    /// Keep only the first channel, drop the rest (no downmix)
    TakeFirst,
    /// Copy the single mono channel into both stereo channels
    Duplicate,
}

impl ChannelStrategy {
    /// Look up the conversion table. Anything not listed is unsupported.
    pub fn for_conversion(from: usize, to: usize) -> Result<Self> {
        match (from, to) {
            (f, t) if f == t && t > 0 => Ok(ChannelStrategy::Keep),
            (f, 1) if f > 1 => Ok(ChannelStrategy::TakeFirst),
            (1, 2) => Ok(ChannelStrategy::Duplicate),
            _ => Err(AudioError::UnsupportedChannelConversion { from, to }),
        }
    }
}

/// Convert `waveform` to `target_channels` channels
pub fn normalize_channels(waveform: &Waveform, target_channels: usize) -> Result<Waveform> {
    let from = waveform.num_channels();
    let strategy = ChannelStrategy::for_conversion(from, target_channels)?;

    let samples = waveform.samples();
    let remapped = match strategy {
        ChannelStrategy::Keep => return Ok(waveform.clone()),
        ChannelStrategy::TakeFirst => samples.slice(s![..1, ..]).to_owned(),
        ChannelStrategy::Duplicate => concatenate(Axis(0), &[samples, samples])
            .map_err(|e| AudioError::InvalidWaveform(e.to_string()))?,
    };

    stage_debug!(
        "channels",
        "{:?}: {} -> {} channels ({} samples)",
        strategy,
        from,
        target_channels,
        waveform.len()
    );

    Ok(Waveform::from_parts(remapped, waveform.sample_rate()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ramp(channels: usize, len: usize) -> Waveform {
        let data = (0..channels)
            .map(|ch| (0..len).map(|i| (ch * 1000 + i) as f32).collect())
            .collect();
        Waveform::from_channels(data, 8000).unwrap()
    }

    #[test]
    fn test_matching_count_is_identity() {
        for channels in 1..=3 {
            let wav = ramp(channels, 16);
            assert_eq!(normalize_channels(&wav, channels).unwrap(), wav);
        }
    }

    #[test]
    fn test_downmix_takes_first_channel_only() {
        let wav = ramp(2, 8);
        let mono = normalize_channels(&wav, 1).unwrap();

        assert_eq!(mono.num_channels(), 1);
        assert_eq!(mono.channel(0), wav.channel(0));
        assert_eq!(mono.sample_rate(), 8000);
    }

    #[test]
    fn test_many_to_mono_takes_first_channel() {
        let wav = ramp(6, 4);
        let mono = normalize_channels(&wav, 1).unwrap();
        assert_eq!(mono.channel(0), wav.channel(0));
    }

    #[test]
    fn test_mono_to_stereo_duplicates() {
        let wav = ramp(1, 8);
        let stereo = normalize_channels(&wav, 2).unwrap();

        assert_eq!(stereo.num_channels(), 2);
        assert_eq!(stereo.channel(0), wav.channel(0));
        assert_eq!(stereo.channel(1), wav.channel(0));
    }

    #[test]
    fn test_idempotent() {
        let wav = ramp(1, 32);
        let once = normalize_channels(&wav, 2).unwrap();
        let twice = normalize_channels(&once, 2).unwrap();
        assert_eq!(once, twice);
    }

    #[test]
    fn test_unsupported_conversions_are_rejected() {
        let cases = [(3, 2), (1, 3), (2, 6), (2, 0)];
        for (from, to) in cases {
            let err = normalize_channels(&ramp(from, 4), to).unwrap_err();
            assert_eq!(err, AudioError::UnsupportedChannelConversion { from, to });
        }
    }

    #[test]
    fn test_zero_length_input() {
        let wav = Waveform::silence(1, 0, 16000).unwrap();
        let stereo = normalize_channels(&wav, 2).unwrap();
        assert_eq!(stereo.num_channels(), 2);
        assert!(stereo.is_empty());
    }
}
