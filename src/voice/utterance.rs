//! End-of-utterance detection
//!
//! Splits a microphone stream into one utterance using local energy
//! detection: speech starts when the RMS level crosses a threshold and ends
//! after a stretch of silence.

use super::capture::SAMPLE_RATE;

/// Minimum audio energy threshold to consider speech
const ENERGY_THRESHOLD: f32 = 0.03;

/// Minimum duration of speech for a complete utterance
const MIN_SPEECH_MS: u64 = 300;

/// Trailing silence that ends an utterance
const END_SILENCE_MS: u64 = 500;

/// Silence before any speech that ends the attempt
pub const INITIAL_SILENCE_MS: u64 = 5000;

/// Longest utterance captured before it is cut off
const MAX_UTTERANCE_MS: u64 = 15_000;

#[allow(clippy::cast_possible_truncation, clippy::cast_lossless)]
const fn samples_for(ms: u64, sample_rate: u32) -> usize {
    (ms * sample_rate as u64 / 1000) as usize
}

/// State of the utterance detector
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DetectorState {
    /// Waiting for speech to start
    Waiting,
    /// Speech started, accumulating
    Speaking,
}

/// What a chunk of audio meant to the detector
#[derive(Debug, Clone, PartialEq)]
pub enum UtteranceEvent {
    /// Keep feeding audio
    Pending,
    /// An utterance finished; holds its samples
    Complete(Vec<f32>),
    /// No speech started in time
    InitialSilenceTimeout,
}

/// Detects a single utterance in mono audio
pub struct UtteranceDetector {
    state: DetectorState,
    speech_buffer: Vec<f32>,
    silence_counter: usize,
    waited: usize,
    min_speech: usize,
    end_silence: usize,
    initial_silence: usize,
    max_utterance: usize,
}

impl Default for UtteranceDetector {
    fn default() -> Self {
        Self::new()
    }
}

impl UtteranceDetector {
    /// Create a detector for 16kHz audio
    #[must_use]
    pub const fn new() -> Self {
        Self::with_sample_rate(SAMPLE_RATE)
    }

    /// Create a detector for audio at the given rate
    #[must_use]
    pub const fn with_sample_rate(sample_rate: u32) -> Self {
        Self {
            state: DetectorState::Waiting,
            speech_buffer: Vec::new(),
            silence_counter: 0,
            waited: 0,
            min_speech: samples_for(MIN_SPEECH_MS, sample_rate),
            end_silence: samples_for(END_SILENCE_MS, sample_rate),
            initial_silence: samples_for(INITIAL_SILENCE_MS, sample_rate),
            max_utterance: samples_for(MAX_UTTERANCE_MS, sample_rate),
        }
    }

    /// Feed audio samples
    pub fn process(&mut self, samples: &[f32]) -> UtteranceEvent {
        let energy = calculate_energy(samples);
        let is_speech = energy > ENERGY_THRESHOLD;

        match self.state {
            DetectorState::Waiting => {
                if is_speech {
                    self.state = DetectorState::Speaking;
                    self.speech_buffer.clear();
                    self.speech_buffer.extend_from_slice(samples);
                    self.silence_counter = 0;
                    tracing::trace!(energy, "speech started");
                    return UtteranceEvent::Pending;
                }

                self.waited += samples.len();
                if self.waited > self.initial_silence {
                    tracing::debug!(waited = self.waited, "initial silence timeout");
                    self.reset();
                    return UtteranceEvent::InitialSilenceTimeout;
                }
            }
            DetectorState::Speaking => {
                self.speech_buffer.extend_from_slice(samples);

                if is_speech {
                    self.silence_counter = 0;
                } else {
                    self.silence_counter += samples.len();
                }

                tracing::trace!(
                    buffer_len = self.speech_buffer.len(),
                    silence = self.silence_counter,
                    is_speech,
                    energy,
                    "speaking state"
                );

                let ended = self.silence_counter > self.end_silence;
                if ended && self.speech_buffer.len() > self.min_speech + self.silence_counter {
                    return self.finish();
                }
                if self.speech_buffer.len() >= self.max_utterance {
                    tracing::debug!("utterance reached maximum length");
                    return self.finish();
                }

                // A blip too short to be speech
                if ended {
                    tracing::trace!("speech too short - waiting again");
                    self.state = DetectorState::Waiting;
                    self.speech_buffer.clear();
                    self.silence_counter = 0;
                }
            }
        }

        UtteranceEvent::Pending
    }

    fn finish(&mut self) -> UtteranceEvent {
        let samples = std::mem::take(&mut self.speech_buffer);
        tracing::debug!(samples = samples.len(), "utterance complete");
        self.reset();
        UtteranceEvent::Complete(samples)
    }

    /// Reset detector to waiting state
    pub fn reset(&mut self) {
        self.state = DetectorState::Waiting;
        self.speech_buffer.clear();
        self.silence_counter = 0;
        self.waited = 0;
    }

    /// Get current state
    #[must_use]
    pub const fn state(&self) -> DetectorState {
        self.state
    }
}

/// Calculate RMS energy of audio samples
#[allow(clippy::cast_precision_loss)]
#[must_use]
pub fn calculate_energy(samples: &[f32]) -> f32 {
    if samples.is_empty() {
        return 0.0;
    }

    let sum_squares: f32 = samples.iter().map(|s| s * s).sum();
    (sum_squares / samples.len() as f32).sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_energy_calculation() {
        let silence = vec![0.0f32; 100];
        assert!(calculate_energy(&silence) < 0.001);

        let loud = vec![0.5f32; 100];
        assert!(calculate_energy(&loud) > 0.4);

        assert!(calculate_energy(&[]) < f32::EPSILON);
    }

    #[test]
    fn test_short_blip_is_ignored() {
        let mut detector = UtteranceDetector::new();
        assert_eq!(detector.process(&[0.5; 800]), UtteranceEvent::Pending);
        assert_eq!(detector.state(), DetectorState::Speaking);

        // 0.6s of silence after 50ms of noise
        assert_eq!(detector.process(&[0.0; 9600]), UtteranceEvent::Pending);
        assert_eq!(detector.state(), DetectorState::Waiting);
    }
}
