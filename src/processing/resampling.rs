// Audio Processing - Resampling
use ndarray::Array2;
use rubato::{
    calculate_cutoff, Resampler, SincFixedIn, SincInterpolationParameters,
    SincInterpolationType, WindowFunction,
};

use crate::error::{AudioError, Result};
use crate::waveform::Waveform;

const CHUNK_SIZE: usize = 1024;
const WINDOW: WindowFunction = WindowFunction::BlackmanHarris2;

/// Widest conversion accepted, in either direction
pub const MAX_RATIO: f64 = 64.0;

/// Output samples per channel: `round(len * target / source)`
pub fn resampled_length(len: usize, source_rate: u32, target_rate: u32) -> usize {
    let source = source_rate as u64;
    ((len as u64 * target_rate as u64 + source / 2) / source) as usize
}

/// Sinc parameters scaled to the conversion ratio
fn interpolation_params(ratio: f64) -> SincInterpolationParameters {
    let (sinc_len, interpolation, oversampling_factor) = if ratio >= 2.0 || ratio <= 0.5 {
        (512, SincInterpolationType::Cubic, 512)
    } else if ratio >= 1.5 {
        (384, SincInterpolationType::Cubic, 384)
    } else if ratio > 1.0 {
        (256, SincInterpolationType::Linear, 256)
    } else {
        (384, SincInterpolationType::Linear, 384)
    };

    SincInterpolationParameters {
        sinc_len,
        f_cutoff: calculate_cutoff(sinc_len, WINDOW),
        interpolation,
        oversampling_factor,
        window: WINDOW,
    }
}

/// Leading output frames to drop so frame `n` sits at input time `n / ratio`.
///
/// `SincFixedIn` places output frame `n` at input time `(n + 1) / ratio - 1`
/// of whatever it was fed. With one zero frame fed ahead of the signal that
/// becomes `(n + 1) / ratio - 2`, which is `n / ratio` once `2 * ratio - 1`
/// frames are skipped. Rounding leaves at most half an output frame of offset
/// when upsampling, and under one when downsampling below 1/4.
fn alignment_skip(ratio: f64) -> usize {
    (2.0 * ratio - 1.0).round().max(0.0) as usize
}

fn resampler_error<E: std::fmt::Display>(e: E) -> AudioError {
    AudioError::Resampling(e.to_string())
}

/// Convert every channel of `waveform` to `target_rate`.
///
/// All channels go through one band-limited sinc resampler, so they share the
/// filter and come out the same length. Output is time-aligned with the input
/// and cut (or zero-extended) to exactly `resampled_length` samples. Ratios
/// beyond [`MAX_RATIO`] either way are rejected.
pub fn resample(waveform: &Waveform, target_rate: u32) -> Result<Waveform> {
    if target_rate == 0 {
        return Err(AudioError::InvalidSampleRate(target_rate));
    }

    let source_rate = waveform.sample_rate();
    if source_rate == target_rate {
        return Ok(waveform.clone());
    }

    let ratio = target_rate as f64 / source_rate as f64;
    if !(1.0 / MAX_RATIO..=MAX_RATIO).contains(&ratio) {
        return Err(AudioError::Resampling(format!(
            "{}Hz -> {}Hz exceeds the maximum conversion ratio of {}",
            source_rate, target_rate, MAX_RATIO
        )));
    }

    let channels = waveform.num_channels();
    let target_len = resampled_length(waveform.len(), source_rate, target_rate);
    if waveform.is_empty() || target_len == 0 {
        return Ok(Waveform::from_parts(Array2::zeros((channels, target_len)), target_rate));
    }

    let mut resampler =
        SincFixedIn::<f32>::new(ratio, 1.1, interpolation_params(ratio), CHUNK_SIZE, channels)
            .map_err(resampler_error)?;

    let skip = alignment_skip(ratio);
    let needed = skip + target_len;

    stage_debug!(
        "resample",
        "{}Hz -> {}Hz (ratio {:.3}): {} -> {} samples x {} channels, skip {}",
        source_rate,
        target_rate,
        ratio,
        waveform.len(),
        target_len,
        channels,
        skip
    );

    let inputs: Vec<Vec<f32>> = waveform
        .samples()
        .rows()
        .into_iter()
        .map(|row| std::iter::once(0.0).chain(row.iter().copied()).collect())
        .collect();
    let mut remaining: Vec<&[f32]> = inputs.iter().map(Vec::as_slice).collect();
    let mut outputs: Vec<Vec<f32>> = vec![Vec::with_capacity(needed + CHUNK_SIZE); channels];
    let mut out_buffer = resampler.output_buffer_allocate(true);

    while remaining[0].len() >= resampler.input_frames_next() {
        let (nbr_in, nbr_out) = resampler
            .process_into_buffer(remaining.as_slice(), &mut out_buffer, None)
            .map_err(resampler_error)?;
        for slice in remaining.iter_mut() {
            let rest: &[f32] = *slice;
            *slice = &rest[nbr_in..];
        }
        append_frames(&mut outputs, &out_buffer, nbr_out);
    }

    if !remaining[0].is_empty() {
        let (_nbr_in, nbr_out) = resampler
            .process_partial_into_buffer(Some(remaining.as_slice()), &mut out_buffer, None)
            .map_err(resampler_error)?;
        append_frames(&mut outputs, &out_buffer, nbr_out);
    }

    // Push silence through until the filter tail has come out
    let flush: Option<&[&[f32]]> = None;
    while outputs[0].len() < needed {
        let (_nbr_in, nbr_out) = resampler
            .process_partial_into_buffer(flush, &mut out_buffer, None)
            .map_err(resampler_error)?;
        if nbr_out == 0 {
            break;
        }
        append_frames(&mut outputs, &out_buffer, nbr_out);
    }

    let produced = outputs[0].len();
    if outputs.iter().any(|ch| ch.len() != produced) {
        return Err(AudioError::Resampling(
            "resampled channels differ in length".to_string(),
        ));
    }

    let mut flat = Vec::with_capacity(channels * target_len);
    for ch in &outputs {
        let aligned = ch.get(skip..).unwrap_or(&[]);
        let kept = aligned.len().min(target_len);
        flat.extend_from_slice(&aligned[..kept]);
        flat.resize(flat.len() + (target_len - kept), 0.0);
    }

    let samples = Array2::from_shape_vec((channels, target_len), flat).map_err(resampler_error)?;

    stage_trace!("resample", "produced {} raw frames per channel", produced);

    Ok(Waveform::from_parts(samples, target_rate))
}

fn append_frames(outputs: &mut [Vec<f32>], buffer: &[Vec<f32>], frames: usize) {
    for (out, buf) in outputs.iter_mut().zip(buffer.iter()) {
        out.extend_from_slice(&buf[..frames]);
    }
}
