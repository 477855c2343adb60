//! Speech-to-text (STT) over the Azure short-audio REST API

use serde::Deserialize;

use crate::{Error, Result};

/// Recognition status reported by the service
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub enum RecognitionStatus {
    Success,
    NoMatch,
    InitialSilenceTimeout,
    BabbleTimeout,
    Error,
    #[serde(other)]
    Unknown,
}

impl RecognitionStatus {
    /// Whether the status means "nothing was said" rather than a failure
    #[must_use]
    pub const fn is_no_match(self) -> bool {
        matches!(
            self,
            Self::NoMatch | Self::InitialSilenceTimeout | Self::BabbleTimeout
        )
    }
}

/// Simple-format response from the recognition endpoint
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Transcript {
    pub recognition_status: RecognitionStatus,
    #[serde(default)]
    pub display_text: String,
}

/// Transcribes one utterance of speech to text
pub struct SpeechToText {
    client: reqwest::Client,
    api_key: String,
    region: String,
    language: String,
}

impl SpeechToText {
    /// Create a new STT client for a speech resource
    ///
    /// Credentials are checked when [`Self::recognize`] is called.
    #[must_use]
    pub fn new(api_key: String, region: String, language: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_key,
            region,
            language,
        }
    }

    fn check_credentials(&self) -> Result<()> {
        if self.api_key.is_empty() {
            return Err(Error::Config("speech key required for recognition".to_string()));
        }
        if self.region.is_empty() {
            return Err(Error::Config("speech region required for recognition".to_string()));
        }
        Ok(())
    }

    fn endpoint(&self) -> String {
        format!(
            "https://{}.stt.speech.microsoft.com/speech/recognition/conversation/cognitiveservices/v1",
            self.region
        )
    }

    /// Recognize speech in a 16 kHz mono WAV clip
    ///
    /// # Errors
    ///
    /// Returns error if credentials are missing, the request fails or the
    /// response cannot be parsed
    pub async fn recognize(&self, wav: Vec<u8>, sample_rate: u32) -> Result<Transcript> {
        self.check_credentials()?;
        tracing::debug!(
            audio_bytes = wav.len(),
            language = %self.language,
            "starting recognition"
        );

        let response = self
            .client
            .post(self.endpoint())
            .query(&[("language", self.language.as_str()), ("format", "simple")])
            .header("Ocp-Apim-Subscription-Key", &self.api_key)
            .header(
                "Content-Type",
                format!("audio/wav; codecs=audio/pcm; samplerate={sample_rate}"),
            )
            .header("Accept", "application/json")
            .body(wav)
            .send()
            .await
            .map_err(|e| {
                tracing::error!(error = %e, "recognition request failed");
                e
            })?;

        let status = response.status();
        tracing::debug!(status = %status, "received response");

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::error!(status = %status, body = %body, "STT API error");
            return Err(Error::Api {
                service: "STT",
                status,
                body,
            });
        }

        let transcript: Transcript = response.json().await.map_err(|e| {
            tracing::error!(error = %e, "failed to parse recognition response");
            e
        })?;

        tracing::info!(
            status = ?transcript.recognition_status,
            transcript = %transcript.display_text,
            "recognition complete"
        );
        Ok(transcript)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_success() {
        let body = r#"{"RecognitionStatus":"Success","DisplayText":"Exit.","Offset":1800000,"Duration":6300000}"#;
        let transcript: Transcript = serde_json::from_str(body).unwrap();
        assert_eq!(transcript.recognition_status, RecognitionStatus::Success);
        assert_eq!(transcript.display_text, "Exit.");
    }

    #[test]
    fn test_parse_no_match_without_text() {
        let body = r#"{"RecognitionStatus":"InitialSilenceTimeout","Offset":0,"Duration":50000000}"#;
        let transcript: Transcript = serde_json::from_str(body).unwrap();
        assert!(transcript.recognition_status.is_no_match());
        assert!(transcript.display_text.is_empty());
    }

    #[test]
    fn test_unknown_status() {
        let body = r#"{"RecognitionStatus":"SomethingNew"}"#;
        let transcript: Transcript = serde_json::from_str(body).unwrap();
        assert_eq!(transcript.recognition_status, RecognitionStatus::Unknown);
        assert!(!transcript.recognition_status.is_no_match());
    }

    #[tokio::test]
    async fn test_recognize_requires_credentials() {
        let no_key = SpeechToText::new(String::new(), "westeurope".into(), "en-US".into());
        let err = no_key.recognize(Vec::new(), 16000).await.unwrap_err();
        assert!(matches!(err, Error::Config(ref msg) if msg.contains("key")));

        let no_region = SpeechToText::new("key".into(), String::new(), "en-US".into());
        let err = no_region.recognize(Vec::new(), 16000).await.unwrap_err();
        assert!(matches!(err, Error::Config(ref msg) if msg.contains("region")));
    }
}
