//! Text-to-speech (TTS) over the Azure neural voice REST API

use crate::{Error, Result};

/// Voice used when none is configured
pub const DEFAULT_VOICE: &str = "en-US-AvaMultilingualNeural";

/// Audio container requested from the service
const OUTPUT_FORMAT: &str = "audio-24khz-48kbitrate-mono-mp3";

/// Locale prefix of a voice name (`de-DE-KatjaNeural` → `de-DE`)
#[must_use]
pub fn voice_locale(voice: &str) -> &str {
    let mut dashes = voice.match_indices('-').map(|(i, _)| i);
    match (dashes.next(), dashes.next()) {
        (Some(_), Some(second)) => &voice[..second],
        _ => "en-US",
    }
}

/// Wrap text in an SSML document for the given voice
#[must_use]
pub fn build_ssml(voice: &str, text: &str) -> String {
    format!(
        "<speak version='1.0' xmlns='http://www.w3.org/2001/10/synthesis' xml:lang='{}'>\
         <voice name='{}'>{}</voice></speak>",
        voice_locale(voice),
        escape_xml(voice),
        escape_xml(text)
    )
}

fn escape_xml(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&apos;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

/// Synthesizes speech from text
pub struct TextToSpeech {
    client: reqwest::Client,
    api_key: String,
    region: String,
    voice: String,
}

impl TextToSpeech {
    /// Create a new TTS client for a speech resource
    ///
    /// An empty `voice` falls back to [`DEFAULT_VOICE`]. Credentials are
    /// checked when [`Self::synthesize`] is called.
    #[must_use]
    pub fn new(api_key: String, region: String, voice: String) -> Self {
        let voice = if voice.is_empty() {
            DEFAULT_VOICE.to_string()
        } else {
            voice
        };

        Self {
            client: reqwest::Client::new(),
            api_key,
            region,
            voice,
        }
    }

    /// Voice this client speaks with
    #[must_use]
    pub fn voice(&self) -> &str {
        &self.voice
    }

    /// Synthesize text to speech
    ///
    /// # Returns
    ///
    /// Audio bytes (MP3 format, 24 kHz mono). Empty text yields no audio
    /// without calling the service.
    ///
    /// # Errors
    ///
    /// Returns error if the key or region is missing or synthesis fails
    pub async fn synthesize(&self, text: &str) -> Result<Vec<u8>> {
        if self.api_key.is_empty() {
            return Err(Error::Config("speech key required for TTS".to_string()));
        }
        if self.region.is_empty() {
            return Err(Error::Config("speech region required for TTS".to_string()));
        }
        if text.is_empty() {
            tracing::debug!("nothing to synthesize");
            return Ok(Vec::new());
        }

        let url = format!(
            "https://{}.tts.speech.microsoft.com/cognitiveservices/v1",
            self.region
        );

        let response = self
            .client
            .post(&url)
            .header("Ocp-Apim-Subscription-Key", &self.api_key)
            .header("Content-Type", "application/ssml+xml")
            .header("X-Microsoft-OutputFormat", OUTPUT_FORMAT)
            .header("User-Agent", env!("CARGO_PKG_NAME"))
            .body(build_ssml(&self.voice, text))
            .send()
            .await?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(Error::Api {
                service: "TTS",
                status,
                body,
            });
        }

        let audio = response.bytes().await?;
        if audio.is_empty() {
            return Err(Error::Tts("service returned no audio".to_string()));
        }

        tracing::debug!(audio_bytes = audio.len(), voice = %self.voice, "synthesis complete");
        Ok(audio.to_vec())
    }
}
