//! Speech recognition, translation and synthesis
//!
//! The orchestration loop only sees the [`Recognizer`] and
//! [`SynthesizerFactory`] capabilities. The Azure adapters implement them
//! over the public Cognitive Services REST endpoints.

mod recognizer;
mod stt;
mod synthesizer;
mod translate;
mod tts;

use std::fmt;

use async_trait::async_trait;

use crate::{Error, Result};

pub use recognizer::AzureRecognizer;
pub use stt::{RecognitionStatus, SpeechToText, Transcript};
pub use synthesizer::{AzureSynthesizer, AzureSynthesizerFactory};
pub use translate::{Translator, translator_language};
pub use tts::{DEFAULT_VOICE, TextToSpeech, build_ssml, voice_locale};

/// Why a recognition attempt ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecognitionReason {
    /// Speech was recognized and translated
    TranslatedSpeech,
    /// Speech was recognized but translation failed
    RecognizedSpeech,
    /// Nothing intelligible was heard
    NoMatch,
    /// The attempt failed, see [`CancellationDetails`]
    Canceled,
}

/// Why a synthesis attempt ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SynthesisReason {
    /// Audio was synthesized and played
    SynthesizingAudioCompleted,
    /// The attempt failed, see [`CancellationDetails`]
    Canceled,
}

/// Why an operation was canceled
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CancellationReason {
    /// An error occurred
    Error,
    /// The audio source ran out
    EndOfStream,
    /// The caller stopped the operation
    CancelledByUser,
}

impl fmt::Display for CancellationReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Error => "Error",
            Self::EndOfStream => "EndOfStream",
            Self::CancelledByUser => "CancelledByUser",
        };
        f.write_str(name)
    }
}

/// Error category attached to a cancellation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CancellationErrorCode {
    NoError,
    AuthenticationFailure,
    BadRequest,
    TooManyRequests,
    Forbidden,
    ConnectionFailure,
    ServiceTimeout,
    ServiceError,
    ServiceUnavailable,
    RuntimeError,
}

impl CancellationErrorCode {
    /// Map a non-success HTTP status to an error code
    #[must_use]
    pub fn from_status(status: reqwest::StatusCode) -> Self {
        match status.as_u16() {
            400 => Self::BadRequest,
            401 => Self::AuthenticationFailure,
            403 => Self::Forbidden,
            408 | 504 => Self::ServiceTimeout,
            429 => Self::TooManyRequests,
            503 => Self::ServiceUnavailable,
            500..=599 => Self::ServiceError,
            _ => Self::RuntimeError,
        }
    }

    /// Classify a library error
    #[must_use]
    pub fn from_error(error: &Error) -> Self {
        match error {
            Error::Api { status, .. } => Self::from_status(*status),
            Error::Http(e) if e.is_timeout() => Self::ServiceTimeout,
            Error::Http(e) if e.is_connect() => Self::ConnectionFailure,
            Error::Http(e) => e.status().map_or(Self::ConnectionFailure, Self::from_status),
            Error::Config(_) => Self::AuthenticationFailure,
            _ => Self::RuntimeError,
        }
    }
}

impl fmt::Display for CancellationErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::NoError => "NoError",
            Self::AuthenticationFailure => "AuthenticationFailure",
            Self::BadRequest => "BadRequest",
            Self::TooManyRequests => "TooManyRequests",
            Self::Forbidden => "Forbidden",
            Self::ConnectionFailure => "ConnectionFailure",
            Self::ServiceTimeout => "ServiceTimeout",
            Self::ServiceError => "ServiceError",
            Self::ServiceUnavailable => "ServiceUnavailable",
            Self::RuntimeError => "RuntimeError",
        };
        f.write_str(name)
    }
}

/// Details of a canceled recognition or synthesis
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CancellationDetails {
    pub reason: CancellationReason,
    pub error_code: CancellationErrorCode,
    pub error_details: String,
}

impl CancellationDetails {
    /// Cancellation caused by an error
    #[must_use]
    pub fn from_error(error: &Error) -> Self {
        Self {
            reason: CancellationReason::Error,
            error_code: CancellationErrorCode::from_error(error),
            error_details: error.to_string(),
        }
    }
}

/// Result of one [`Recognizer::recognize_once`] call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecognitionOutcome {
    pub reason: RecognitionReason,
    /// Raw recognized text in the source language
    pub text: String,
    /// Translations as `(language, text)`, in target order
    pub translations: Vec<(String, String)>,
    pub cancellation: Option<CancellationDetails>,
}

impl RecognitionOutcome {
    /// Recognized and translated speech
    #[must_use]
    pub fn translated(
        text: impl Into<String>,
        translations: Vec<(String, String)>,
    ) -> Self {
        Self {
            reason: RecognitionReason::TranslatedSpeech,
            text: text.into(),
            translations,
            cancellation: None,
        }
    }

    /// Nothing recognized
    #[must_use]
    pub const fn no_match() -> Self {
        Self {
            reason: RecognitionReason::NoMatch,
            text: String::new(),
            translations: Vec::new(),
            cancellation: None,
        }
    }

    /// Recognized text whose translation failed
    ///
    /// The raw text is kept so the exit phrase still ends the loop.
    #[must_use]
    pub fn untranslated(text: impl Into<String>, details: Option<CancellationDetails>) -> Self {
        Self {
            reason: RecognitionReason::RecognizedSpeech,
            text: text.into(),
            translations: Vec::new(),
            cancellation: details,
        }
    }

    /// Recognition failed
    #[must_use]
    pub fn canceled(details: CancellationDetails) -> Self {
        Self {
            reason: RecognitionReason::Canceled,
            text: String::new(),
            translations: Vec::new(),
            cancellation: Some(details),
        }
    }

    /// First translation, if any
    #[must_use]
    pub fn first_translation(&self) -> Option<&str> {
        self.translations.first().map(|(_, text)| text.as_str())
    }
}

/// Result of one [`Synthesizer::speak`] call
///
/// A canceled outcome always carries its [`CancellationDetails`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SynthesisOutcome {
    reason: SynthesisReason,
    cancellation: Option<CancellationDetails>,
}

impl SynthesisOutcome {
    /// Audio was played to the end
    #[must_use]
    pub const fn completed() -> Self {
        Self {
            reason: SynthesisReason::SynthesizingAudioCompleted,
            cancellation: None,
        }
    }

    /// Synthesis or playback failed
    #[must_use]
    pub const fn canceled(details: CancellationDetails) -> Self {
        Self {
            reason: SynthesisReason::Canceled,
            cancellation: Some(details),
        }
    }

    /// Why synthesis ended
    #[must_use]
    pub const fn reason(&self) -> SynthesisReason {
        self.reason
    }

    /// Cancellation details, present exactly when canceled
    #[must_use]
    pub const fn cancellation(&self) -> Option<&CancellationDetails> {
        self.cancellation.as_ref()
    }
}

/// Captures one utterance and translates it
#[async_trait(?Send)]
pub trait Recognizer {
    /// Listen until one utterance has been recognized and translated
    ///
    /// Failures are reported through [`RecognitionReason::Canceled`].
    async fn recognize_once(&mut self) -> RecognitionOutcome;
}

/// Speaks text on an output device for as long as it is held
#[async_trait(?Send)]
pub trait Synthesizer {
    /// Synthesize `text` and play it to the end
    ///
    /// Failures are reported through [`SynthesisReason::Canceled`].
    async fn speak(&mut self, text: &str) -> SynthesisOutcome;
}

/// Opens scoped synthesis sessions
///
/// A session holds its output device until dropped.
pub trait SynthesizerFactory {
    type Session: Synthesizer;

    /// Acquire a new session
    ///
    /// # Errors
    ///
    /// Returns error if the output device cannot be opened
    fn open(&self) -> Result<Self::Session>;
}
