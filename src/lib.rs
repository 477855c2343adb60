//! Voice Translator - speak in one language, hear it back in another
//!
//! Each cycle captures one utterance from the default microphone, recognizes
//! and translates it in the cloud, prints both texts and speaks the
//! translation on the default output device.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────┐
//! │                  TranslationLoop                     │
//! │   prompt → recognize_once → report → speak → report  │
//! └───────────┬──────────────────────────────┬───────────┘
//!             │ Recognizer                   │ SynthesizerFactory
//! ┌───────────▼───────────┐      ┌───────────▼───────────┐
//! │    AzureRecognizer    │      │  AzureSynthesizer     │
//! │ Microphone → STT →    │      │  TTS → AudioPlayback  │
//! │ Translator            │      │  (one per cycle)      │
//! └───────────────────────┘      └───────────────────────┘
//! ```

pub mod config;
pub mod console;
pub mod error;
pub mod session;
pub mod speech;
pub mod voice;

pub use config::{ConfigLoadError, Settings};
pub use error::{Error, Result};
pub use session::{EXIT_PHRASE, LoopState, LoopSummary, TranslationLoop};
pub use speech::{
    AzureRecognizer, AzureSynthesizerFactory, RecognitionOutcome, Recognizer, SynthesisOutcome,
    Synthesizer, SynthesizerFactory,
};
