// Audio Processing - Duration normalization (pad / truncate)
use ndarray::{s, Array2};
use rand::Rng;

use crate::error::{AudioError, Result};
use crate::waveform::Waveform;

/// Samples per channel for `target_ms` at `sample_rate`.
///
/// Floors the per-millisecond rate first (`sample_rate / 1000 * target_ms`),
/// so 22050 Hz yields 22 samples per millisecond.
pub fn target_length(sample_rate: u32, target_ms: u32) -> usize {
    (sample_rate / 1000) as usize * target_ms as usize
}

/// Zero padding placed before and after the signal
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PaddingSplit {
    pub begin: usize,
    pub end: usize,
}

impl PaddingSplit {
    /// Pick `begin` uniformly in `[0, deficit]`; `end` takes the remainder
    pub fn draw<R: Rng + ?Sized>(deficit: usize, rng: &mut R) -> Self {
        let begin = rng.gen_range(0..=deficit);
        Self {
            begin,
            end: deficit - begin,
        }
    }

    pub fn total(&self) -> usize {
        self.begin + self.end
    }
}

/// Pad or truncate every channel to exactly `target_length(rate, target_ms)` samples
pub fn normalize_duration<R: Rng + ?Sized>(
    waveform: &Waveform,
    target_ms: u32,
    rng: &mut R,
) -> Result<Waveform> {
    if target_ms == 0 {
        return Err(AudioError::InvalidDuration(target_ms));
    }

    let target_len = target_length(waveform.sample_rate(), target_ms);
    let len = waveform.len();
    let samples = waveform.samples();

    let resized = if len > target_len {
        stage_debug!("duration", "truncating {} -> {} samples", len, target_len);
        samples.slice(s![.., ..target_len]).to_owned()
    } else if len < target_len {
        let split = PaddingSplit::draw(target_len - len, rng);
        stage_debug!(
            "duration",
            "padding {} -> {} samples (begin {}, end {})",
            len,
            target_len,
            split.begin,
            split.end
        );

        let mut padded = Array2::zeros((waveform.num_channels(), target_len));
        padded
            .slice_mut(s![.., split.begin..split.begin + len])
            .assign(&samples);
        padded
    } else {
        return Ok(waveform.clone());
    };

    Ok(Waveform::from_parts(resized, waveform.sample_rate()))
}
