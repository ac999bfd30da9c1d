//! Feature extraction - Hann window, centered STFT, mel filterbank, dB scaling

use ndarray::{Array2, Array3, ArrayView1};
use realfft::{RealFftPlanner, RealToComplex};
use std::f32::consts::PI;
use std::sync::Arc;

use super::config::{MelNorm, MelScale, AMIN};
use crate::error::{AudioError, Result};

/// Periodic Hann window
pub fn hann_window(window_length: usize) -> Vec<f32> {
    (0..window_length)
        .map(|i| 0.5 - 0.5 * ((2.0 * PI * i as f32) / window_length as f32).cos())
        .collect()
}

/// Pad `pad` samples on both sides for centered frames.
///
/// Reflects the signal when it is long enough (`len > pad`), otherwise pads
/// with zeros so short and empty inputs still yield frames.
pub fn center_pad(audio: &[f32], pad: usize) -> Vec<f32> {
    let len = audio.len();
    let mut padded = Vec::with_capacity(len + 2 * pad);

    if len > pad {
        padded.extend((0..pad).map(|i| audio[pad - i]));
        padded.extend_from_slice(audio);
        padded.extend((0..pad).map(|i| audio[len - 2 - i]));
    } else {
        padded.resize(pad, 0.0);
        padded.extend_from_slice(audio);
        padded.resize(len + 2 * pad, 0.0);
    }

    padded
}

/// Frames produced for `len` samples with centered framing
pub fn frame_count(len: usize, hop_len: usize) -> usize {
    len / hop_len + 1
}

/// Centered power STFT, planned once and reused across channels
pub struct Stft {
    fft: Arc<dyn RealToComplex<f32>>,
    window: Vec<f32>,
    n_fft: usize,
    hop_len: usize,
}

impl Stft {
    pub fn new(n_fft: usize, hop_len: usize) -> Self {
        let mut planner = RealFftPlanner::<f32>::new();
        Self {
            fft: planner.plan_fft_forward(n_fft),
            window: hann_window(n_fft),
            n_fft,
            hop_len,
        }
    }

    /// Power spectrogram `|STFT|^2`, shape `(n_fft / 2 + 1, frames)`
    pub fn power(&self, audio: ArrayView1<'_, f32>) -> Result<Array2<f32>> {
        let padded = center_pad(&audio.to_vec(), self.n_fft / 2);

        let num_frames = frame_count(audio.len(), self.hop_len);
        let freq_bins = self.n_fft / 2 + 1;
        let mut spectrogram = Array2::<f32>::zeros((freq_bins, num_frames));

        let mut frame = self.fft.make_input_vec();
        let mut spectrum = self.fft.make_output_vec();

        for frame_idx in 0..num_frames {
            let start = frame_idx * self.hop_len;
            for (i, slot) in frame.iter_mut().enumerate() {
                *slot = padded.get(start + i).copied().unwrap_or(0.0) * self.window[i];
            }

            // Buffers come from the plan itself, so this only fails on a length mismatch
            self.fft.process(&mut frame, &mut spectrum).map_err(|e| {
                AudioError::InvalidSpectrogramConfig(format!(
                    "FFT buffer length mismatch for n_fft={}: {}",
                    self.n_fft, e
                ))
            })?;

            for (k, bin) in spectrum.iter().enumerate() {
                spectrogram[[k, frame_idx]] = bin.norm_sqr();
            }
        }

        Ok(spectrogram)
    }
}

/// Convert Hz to Mel scale (HTK formula)
pub fn hz_to_mel_htk(hz: f64) -> f64 {
    2595.0 * (1.0 + hz / 700.0).log10()
}

/// Convert Mel to Hz scale (HTK formula)
pub fn mel_to_hz_htk(mel: f64) -> f64 {
    700.0 * (10f64.powf(mel / 2595.0) - 1.0)
}

/// Convert Hz to Mel scale (Slaney formula)
pub fn hz_to_mel_slaney(hz: f64) -> f64 {
    let f_sp = 200.0 / 3.0;
    let min_log_hz = 1000.0;
    let min_log_mel = min_log_hz / f_sp;
    let logstep = (6.4f64).ln() / 27.0;

    if hz >= min_log_hz {
        min_log_mel + (hz / min_log_hz).ln() / logstep
    } else {
        hz / f_sp
    }
}

/// Convert Mel to Hz scale (Slaney formula)
pub fn mel_to_hz_slaney(mel: f64) -> f64 {
    let f_sp = 200.0 / 3.0;
    let min_log_hz = 1000.0;
    let min_log_mel = min_log_hz / f_sp;
    let logstep = (6.4f64).ln() / 27.0;

    if mel >= min_log_mel {
        min_log_hz * (logstep * (mel - min_log_mel)).exp()
    } else {
        f_sp * mel
    }
}

impl MelScale {
    pub fn hz_to_mel(self, hz: f64) -> f64 {
        match self {
            MelScale::Htk => hz_to_mel_htk(hz),
            MelScale::Slaney => hz_to_mel_slaney(hz),
        }
    }

    pub fn mel_to_hz(self, mel: f64) -> f64 {
        match self {
            MelScale::Htk => mel_to_hz_htk(mel),
            MelScale::Slaney => mel_to_hz_slaney(mel),
        }
    }
}

/// Triangular filterbank, shape `(n_mels, n_fft / 2 + 1)`
pub fn create_mel_filterbank(
    sample_rate: u32,
    n_fft: usize,
    n_mels: usize,
    f_min: f32,
    f_max: f32,
    scale: MelScale,
    norm: MelNorm,
) -> Array2<f32> {
    let freq_bins = n_fft / 2 + 1;
    let mut filterbank = Array2::<f32>::zeros((n_mels, freq_bins));

    let fftfreqs: Vec<f64> = (0..freq_bins)
        .map(|k| k as f64 * sample_rate as f64 / n_fft as f64)
        .collect();

    let fmin_mel = scale.hz_to_mel(f_min as f64);
    let fmax_mel = scale.hz_to_mel(f_max as f64);
    let mel_f: Vec<f64> = (0..=n_mels + 1)
        .map(|i| {
            let mel = fmin_mel + (fmax_mel - fmin_mel) * i as f64 / (n_mels + 1) as f64;
            scale.mel_to_hz(mel)
        })
        .collect();

    let fdiff: Vec<f64> = mel_f.windows(2).map(|w| w[1] - w[0]).collect();

    for i in 0..n_mels {
        for k in 0..freq_bins {
            let lower = (fftfreqs[k] - mel_f[i]) / fdiff[i];
            let upper = (mel_f[i + 2] - fftfreqs[k]) / fdiff[i + 1];
            filterbank[[i, k]] = 0.0f64.max(lower.min(upper)) as f32;
        }
    }

    if norm == MelNorm::Slaney {
        for i in 0..n_mels {
            let enorm = 2.0 / (mel_f[i + 2] - mel_f[i]);
            for k in 0..freq_bins {
                filterbank[[i, k]] *= enorm as f32;
            }
        }
    }

    filterbank
}

/// Power to decibels, then raise everything below `peak - top_db` to that floor.
///
/// The peak is taken over the whole tensor, across channels.
pub fn power_to_db(power: &mut Array3<f32>, top_db: f32) {
    power.mapv_inplace(|x| 10.0 * x.max(AMIN).log10());

    let peak = power.iter().copied().fold(f32::NEG_INFINITY, f32::max);
    let floor = peak - top_db;
    power.mapv_inplace(|x| x.max(floor));
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::Array1;

    #[test]
    fn test_hann_window_is_periodic() {
        let window = hann_window(8);
        assert_eq!(window[0], 0.0);
        assert!((window[4] - 1.0).abs() < 1e-6);
        assert!((window[2] - window[6]).abs() < 1e-6);
    }

    #[test]
    fn test_center_pad_reflects() {
        let padded = center_pad(&[1.0, 2.0, 3.0, 4.0, 5.0], 2);
        assert_eq!(padded, vec![3.0, 2.0, 1.0, 2.0, 3.0, 4.0, 5.0, 4.0, 3.0]);
    }

    #[test]
    fn test_center_pad_short_input_uses_zeros() {
        assert_eq!(center_pad(&[1.0, 2.0], 2), vec![0.0, 0.0, 1.0, 2.0, 0.0, 0.0]);
        assert_eq!(center_pad(&[], 3), vec![0.0; 6]);
    }

    #[test]
    fn test_stft_shape_and_peak_bin() {
        let n_fft = 256;
        let sample_rate = 8000.0;
        // bin 16 of a 256-point FFT at 8 kHz
        let freq = 16.0 * sample_rate / n_fft as f32;
        let audio = Array1::from_shape_fn(2048, |i| (2.0 * PI * freq * i as f32 / sample_rate).sin());

        let spec = Stft::new(n_fft, 64).power(audio.view()).unwrap();
        assert_eq!(spec.dim(), (129, 2048 / 64 + 1));

        let mid = spec.column(16);
        let peak_bin = mid
            .iter()
            .enumerate()
            .max_by(|a, b| a.1.total_cmp(b.1))
            .map(|(k, _)| k)
            .unwrap();
        assert_eq!(peak_bin, 16);
    }

    #[test]
    fn test_stft_of_empty_signal_has_one_frame() {
        let audio = Array1::<f32>::zeros(0);
        let spec = Stft::new(512, 128).power(audio.view()).unwrap();
        assert_eq!(spec.dim(), (257, 1));
        assert!(spec.iter().all(|&x| x == 0.0));
    }

    #[test]
    fn test_reused_plan_matches_fresh_plan() {
        let first = Array1::from_shape_fn(1000, |i| (i as f32 * 0.05).sin());
        let second = Array1::from_shape_fn(1000, |i| (i as f32 * 0.31).cos());

        let shared = Stft::new(256, 64);
        shared.power(first.view()).unwrap();
        assert_eq!(
            shared.power(second.view()).unwrap(),
            Stft::new(256, 64).power(second.view()).unwrap()
        );
    }

    #[test]
    fn test_mel_scales_round_trip() {
        for hz in [0.0, 440.0, 1000.0, 3500.0, 8000.0] {
            for scale in [MelScale::Htk, MelScale::Slaney] {
                let back = scale.mel_to_hz(scale.hz_to_mel(hz));
                assert!((back - hz).abs() < 1e-6, "{:?} {} -> {}", scale, hz, back);
            }
        }
        assert!((hz_to_mel_htk(700.0) - 2595.0 * 2f64.log10()).abs() < 1e-9);
    }

    #[test]
    fn test_filterbank_triangles() {
        let fb = create_mel_filterbank(16000, 1024, 64, 0.0, 8000.0, MelScale::Htk, MelNorm::None);
        assert_eq!(fb.dim(), (64, 513));
        assert!(fb.iter().all(|&w| (0.0..=1.0).contains(&w)));

        // every band picks up at least one bin and peaks near 1 at the high end
        for band in fb.rows() {
            assert!(band.iter().any(|&w| w > 0.0));
        }
        let top = fb.row(63).iter().copied().fold(0.0f32, f32::max);
        assert!(top > 0.5);
    }

    #[test]
    fn test_slaney_norm_scales_bands() {
        let plain = create_mel_filterbank(16000, 512, 40, 0.0, 8000.0, MelScale::Slaney, MelNorm::None);
        let normed = create_mel_filterbank(16000, 512, 40, 0.0, 8000.0, MelScale::Slaney, MelNorm::Slaney);
        let plain_top: f32 = plain.row(39).sum();
        let normed_top: f32 = normed.row(39).sum();
        assert!(normed_top < plain_top);
    }

    #[test]
    fn test_power_to_db_clamps_to_top_db() {
        let mut power = Array3::from_shape_vec((1, 2, 2), vec![1.0, 1e-3, 1e-9, 0.0]).unwrap();
        power_to_db(&mut power, 40.0);

        assert!((power[[0, 0, 0]] - 0.0).abs() < 1e-5);
        assert!((power[[0, 0, 1]] + 30.0).abs() < 1e-4);
        assert_eq!(power[[0, 1, 0]], -40.0);
        assert_eq!(power[[0, 1, 1]], -40.0);
    }
}
