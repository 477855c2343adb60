//! One-shot recognition and translation from the default microphone

use std::time::{Duration, Instant};

use async_trait::async_trait;

use super::stt::{RecognitionStatus, SpeechToText, Transcript};
use super::translate::Translator;
use super::{
    CancellationDetails, CancellationErrorCode, CancellationReason, RecognitionOutcome,
    Recognizer,
};
use crate::config::Settings;
use crate::voice::{
    INITIAL_SILENCE_MS, Microphone, SAMPLE_RATE, UtteranceDetector, UtteranceEvent, resample,
    samples_to_wav,
};
use crate::{Error, Result};

/// How often the microphone buffer is drained
const POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Recognizes speech with Azure STT and translates it with Azure Translator
pub struct AzureRecognizer {
    microphone: Microphone,
    stt: SpeechToText,
    translator: Translator,
}

impl AzureRecognizer {
    /// Open the default microphone and build the cloud clients
    ///
    /// # Errors
    ///
    /// Returns error if no microphone exists
    pub fn new(settings: &Settings) -> Result<Self> {
        let stt = SpeechToText::new(
            settings.speech_key().to_string(),
            settings.speech_region().to_string(),
            settings.recognition_language().to_string(),
        );
        let translator = Translator::new(
            settings.speech_key().to_string(),
            settings.speech_region().to_string(),
            settings.recognition_language(),
            settings.target_language().to_string(),
        );
        let microphone = Microphone::open()?;

        Ok(Self {
            microphone,
            stt,
            translator,
        })
    }

    /// Capture audio until an utterance ends
    ///
    /// Returns `None` when no speech started before the initial silence timeout.
    #[allow(clippy::future_not_send)]
    async fn listen(&mut self) -> Result<Option<Vec<f32>>> {
        let mut detector = UtteranceDetector::with_sample_rate(self.microphone.sample_rate());
        let stall_timeout = Duration::from_millis(INITIAL_SILENCE_MS);

        self.microphone.clear_buffer();
        self.microphone.start()?;
        tracing::debug!("listening for utterance");

        let mut last_audio = Instant::now();
        let result = loop {
            tokio::time::sleep(POLL_INTERVAL).await;

            let chunk = self.microphone.take_buffer();
            if chunk.is_empty() {
                if last_audio.elapsed() > stall_timeout {
                    break Err(Error::Audio("microphone delivered no audio".to_string()));
                }
                continue;
            }
            last_audio = Instant::now();

            match detector.process(&chunk) {
                UtteranceEvent::Pending => {}
                UtteranceEvent::Complete(samples) => break Ok(Some(samples)),
                UtteranceEvent::InitialSilenceTimeout => break Ok(None),
            }
        };

        self.microphone.stop();
        result
    }

    #[allow(clippy::future_not_send)]
    async fn try_recognize(&mut self) -> Result<RecognitionOutcome> {
        let Some(samples) = self.listen().await? else {
            return Ok(RecognitionOutcome::no_match());
        };

        let samples = resample(&samples, self.microphone.sample_rate(), SAMPLE_RATE)?;
        let wav = samples_to_wav(&samples, SAMPLE_RATE)?;
        let transcript = self.stt.recognize(wav, SAMPLE_RATE).await?;

        let text = match recognized_text(transcript) {
            Ok(text) => text,
            Err(outcome) => return Ok(outcome),
        };
        let translation = self.translator.translate(&text).await;
        Ok(translation_outcome(text, self.translator.target(), translation))
    }
}

/// Text worth translating, or the outcome that ends recognition early
fn recognized_text(transcript: Transcript) -> std::result::Result<String, RecognitionOutcome> {
    match transcript.recognition_status {
        RecognitionStatus::Success if transcript.display_text.trim().is_empty() => {
            Err(RecognitionOutcome::no_match())
        }
        RecognitionStatus::Success => Ok(transcript.display_text),
        status if status.is_no_match() => Err(RecognitionOutcome::no_match()),
        status => Err(RecognitionOutcome::canceled(CancellationDetails {
            reason: CancellationReason::Error,
            error_code: CancellationErrorCode::ServiceError,
            error_details: format!("recognition status {status:?}"),
        })),
    }
}

/// Combine recognized text with its translation
///
/// A failed translation keeps the recognized text.
fn translation_outcome(
    text: String,
    target: &str,
    translation: Result<String>,
) -> RecognitionOutcome {
    match translation {
        Ok(translated) => {
            RecognitionOutcome::translated(text, vec![(target.to_string(), translated)])
        }
        Err(e) => {
            tracing::warn!(error = %e, "translation failed");
            RecognitionOutcome::untranslated(text, Some(CancellationDetails::from_error(&e)))
        }
    }
}

#[async_trait(?Send)]
impl Recognizer for AzureRecognizer {
    async fn recognize_once(&mut self) -> RecognitionOutcome {
        match self.try_recognize().await {
            Ok(outcome) => outcome,
            Err(e) => {
                self.microphone.stop();
                RecognitionOutcome::canceled(CancellationDetails::from_error(&e))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::speech::RecognitionReason;

    fn transcript(status: RecognitionStatus, text: &str) -> Transcript {
        Transcript {
            recognition_status: status,
            display_text: text.to_string(),
        }
    }

    #[test]
    fn test_success_yields_text() {
        let text = recognized_text(transcript(RecognitionStatus::Success, "Exit.")).unwrap();
        assert_eq!(text, "Exit.");
    }

    #[test]
    fn test_blank_success_is_no_match() {
        for text in ["", "  ", "\n\t"] {
            let outcome =
                recognized_text(transcript(RecognitionStatus::Success, text)).unwrap_err();
            assert_eq!(outcome, RecognitionOutcome::no_match());
        }
    }

    #[test]
    fn test_silence_statuses_are_no_match() {
        for status in [
            RecognitionStatus::NoMatch,
            RecognitionStatus::InitialSilenceTimeout,
            RecognitionStatus::BabbleTimeout,
        ] {
            let outcome = recognized_text(transcript(status, "")).unwrap_err();
            assert_eq!(outcome.reason, RecognitionReason::NoMatch);
        }
    }

    #[test]
    fn test_failed_statuses_cancel() {
        for (status, details) in [
            (RecognitionStatus::Error, "recognition status Error"),
            (RecognitionStatus::Unknown, "recognition status Unknown"),
        ] {
            let outcome = recognized_text(transcript(status, "ignored")).unwrap_err();
            assert_eq!(outcome.reason, RecognitionReason::Canceled);
            assert!(outcome.text.is_empty());

            let cancellation = outcome.cancellation.unwrap();
            assert_eq!(cancellation.error_code, CancellationErrorCode::ServiceError);
            assert_eq!(cancellation.error_details, details);
        }
    }

    #[test]
    fn test_translation_attached_to_target() {
        let outcome = translation_outcome("Exit.".to_string(), "de", Ok("Beenden.".to_string()));
        assert_eq!(outcome.reason, RecognitionReason::TranslatedSpeech);
        assert_eq!(outcome.text, "Exit.");
        assert_eq!(
            outcome.translations,
            vec![("de".to_string(), "Beenden.".to_string())]
        );
        assert!(outcome.cancellation.is_none());
    }

    #[test]
    fn test_failed_translation_keeps_text() {
        let error = Error::Api {
            service: "Translator",
            status: reqwest::StatusCode::UNAUTHORIZED,
            body: String::new(),
        };
        let outcome = translation_outcome("Exit.".to_string(), "de", Err(error));

        assert_eq!(outcome.reason, RecognitionReason::RecognizedSpeech);
        assert_eq!(outcome.text, "Exit.");
        assert!(outcome.translations.is_empty());

        let cancellation = outcome.cancellation.unwrap();
        assert_eq!(cancellation.error_code, CancellationErrorCode::AuthenticationFailure);
        assert_eq!(cancellation.error_details, "Translator API error 401 Unauthorized: ");
    }

    #[test]
    fn test_missing_target_keeps_text() {
        let error = Error::Config("target language required for translation".to_string());
        let outcome = translation_outcome("Exit.".to_string(), "", Err(error));

        assert_eq!(outcome.reason, RecognitionReason::RecognizedSpeech);
        assert_eq!(outcome.text, "Exit.");
    }
}
