//! Sample-rate conversion

use rubato::{FftFixedIn, Resampler};

use crate::{Error, Result};

const CHUNK_SIZE: usize = 1024;
const SUB_CHUNKS: usize = 2;

/// Resample mono audio using rubato
///
/// Input is fed in the chunk size the resampler asks for, zero-padding the
/// tail, and the output is trimmed to the length implied by the rate ratio.
#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_precision_loss,
    clippy::cast_sign_loss
)]
pub fn resample(samples: &[f32], from_rate: u32, to_rate: u32) -> Result<Vec<f32>> {
    if from_rate == to_rate || samples.is_empty() {
        return Ok(samples.to_vec());
    }

    let mut resampler =
        FftFixedIn::<f32>::new(from_rate as usize, to_rate as usize, CHUNK_SIZE, SUB_CHUNKS, 1)
            .map_err(|e| Error::Audio(format!("resampler init failed: {e}")))?;

    let expected =
        (samples.len() as f64 * f64::from(to_rate) / f64::from(from_rate)).round() as usize;
    let delay = resampler.output_delay();
    let wanted = delay + expected;
    let mut output = Vec::with_capacity(wanted);
    let mut position = 0;

    while output.len() < wanted {
        let frames = resampler.input_frames_next();
        let mut chunk = vec![0.0f32; frames];
        if position < samples.len() {
            let end = (position + frames).min(samples.len());
            chunk[..end - position].copy_from_slice(&samples[position..end]);
            position = end;
        }

        let result = resampler
            .process(&[chunk], None)
            .map_err(|e| Error::Audio(format!("resample failed: {e}")))?;
        output.extend_from_slice(&result[0]);
    }

    output.truncate(wanted);
    Ok(output.split_off(delay))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_same_rate_is_identity() {
        let samples = vec![0.1, 0.2, 0.3];
        assert_eq!(resample(&samples, 16000, 16000).unwrap(), samples);
    }

    #[test]
    fn test_downsample_length() {
        let samples = vec![0.0f32; 48000];
        let out = resample(&samples, 48000, 16000).unwrap();
        assert_eq!(out.len(), 16000);
    }

    #[test]
    fn test_upsample_length() {
        let samples = vec![0.25f32; 2000];
        let out = resample(&samples, 16000, 24000).unwrap();
        assert_eq!(out.len(), 3000);
    }
}
