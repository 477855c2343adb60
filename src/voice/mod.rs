//! Voice processing module
//!
//! Handles microphone capture, utterance detection, resampling and playback.

mod capture;
mod playback;
mod resample;
mod utterance;

pub use capture::{Microphone, SAMPLE_RATE, samples_to_wav};
pub use playback::{AudioPlayback, PLAYBACK_SAMPLE_RATE, decode_mp3};
pub use resample::resample;
pub use utterance::{
    DetectorState, INITIAL_SILENCE_MS, UtteranceDetector, UtteranceEvent, calculate_energy,
};
