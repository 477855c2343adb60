//! Console output for recognition and synthesis results

use std::io::{self, Write};

use crate::speech::{
    CancellationReason, RecognitionOutcome, RecognitionReason, SynthesisOutcome, SynthesisReason,
};

/// Printed before every listening phase
pub const PROMPT: &str = "Speak into your microphone (say exit to exit the application).";

/// Printed after error details of a canceled synthesis
pub const CREDENTIAL_HINT: &str = "Did you set the speech resource key and region values?";

/// Print the listening prompt surrounded by blank lines
///
/// # Errors
///
/// Returns error if writing to `out` fails
pub fn write_prompt(out: &mut impl Write) -> io::Result<()> {
    writeln!(out)?;
    writeln!(out, "{PROMPT}")?;
    writeln!(out)
}

/// Print a recognition result and return the text to speak
///
/// Only translated speech is printed. Every other outcome yields `""`.
///
/// # Errors
///
/// Returns error if writing to `out` fails
pub fn report_recognition(
    out: &mut impl Write,
    outcome: &RecognitionOutcome,
) -> io::Result<String> {
    match outcome.reason {
        RecognitionReason::TranslatedSpeech => {
            writeln!(out, "RECOGNIZED: {}", outcome.text)?;
            let Some(translated) = outcome.first_translation() else {
                return Ok(String::new());
            };
            if outcome.translations.len() > 1 {
                tracing::debug!(
                    ignored = outcome.translations.len() - 1,
                    "only the first translation is used"
                );
            }
            writeln!(out, "TRANSLATED: {translated}")?;
            Ok(translated.to_string())
        }
        RecognitionReason::NoMatch => {
            tracing::debug!("no speech recognized");
            Ok(String::new())
        }
        RecognitionReason::RecognizedSpeech => {
            match &outcome.cancellation {
                Some(details) => tracing::warn!(
                    text = %outcome.text,
                    code = %details.error_code,
                    details = %details.error_details,
                    "speech recognized but not translated"
                ),
                None => tracing::debug!(text = %outcome.text, "speech recognized only"),
            }
            Ok(String::new())
        }
        RecognitionReason::Canceled => {
            if let Some(details) = &outcome.cancellation {
                tracing::warn!(
                    reason = %details.reason,
                    code = %details.error_code,
                    details = %details.error_details,
                    "recognition canceled"
                );
            }
            Ok(String::new())
        }
    }
}

/// Print a synthesis result for `text`
///
/// # Errors
///
/// Returns error if writing to `out` fails
pub fn report_synthesis(
    out: &mut impl Write,
    outcome: &SynthesisOutcome,
    text: &str,
) -> io::Result<()> {
    match (outcome.reason(), outcome.cancellation()) {
        (SynthesisReason::SynthesizingAudioCompleted, _) => {
            writeln!(out, "Speech synthesized for text: {text}")
        }
        // Canceled outcomes are only built with details
        (SynthesisReason::Canceled, None) => Ok(()),
        (SynthesisReason::Canceled, Some(details)) => {
            writeln!(out, "CANCELED: Reason={}", details.reason)?;

            if details.reason == CancellationReason::Error {
                writeln!(out, "CANCELED: ErrorCode={}", details.error_code)?;
                writeln!(out, "CANCELED: ErrorDetails=[{}]", details.error_details)?;
                writeln!(out, "CANCELED: {CREDENTIAL_HINT}")?;
            }
            Ok(())
        }
    }
}
