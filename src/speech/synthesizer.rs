//! Scoped text-to-speech sessions on the default output device

use std::sync::Arc;

use async_trait::async_trait;

use super::tts::TextToSpeech;
use super::{CancellationDetails, SynthesisOutcome, Synthesizer, SynthesizerFactory};
use crate::Result;
use crate::config::Settings;
use crate::voice::AudioPlayback;

/// Opens [`AzureSynthesizer`] sessions sharing one TTS client
pub struct AzureSynthesizerFactory {
    tts: Arc<TextToSpeech>,
}

impl AzureSynthesizerFactory {
    /// Build the TTS client from settings
    #[must_use]
    pub fn new(settings: &Settings) -> Self {
        let tts = TextToSpeech::new(
            settings.speech_key().to_string(),
            settings.speech_region().to_string(),
            settings.voice_name().to_string(),
        );
        tracing::debug!(voice = tts.voice(), "synthesizer configured");
        Self { tts: Arc::new(tts) }
    }

    /// Voice the sessions speak with
    #[must_use]
    pub fn voice(&self) -> &str {
        self.tts.voice()
    }
}

impl SynthesizerFactory for AzureSynthesizerFactory {
    type Session = AzureSynthesizer;

    fn open(&self) -> Result<Self::Session> {
        let playback = AudioPlayback::new()?;
        tracing::trace!("synthesis session opened");
        Ok(AzureSynthesizer {
            tts: Arc::clone(&self.tts),
            playback,
        })
    }
}

/// One synthesis session holding the output device
pub struct AzureSynthesizer {
    tts: Arc<TextToSpeech>,
    playback: AudioPlayback,
}

impl AzureSynthesizer {
    async fn try_speak(&self, text: &str) -> Result<()> {
        tracing::debug!(text, "speaking");
        let audio = self.tts.synthesize(text).await?;
        if audio.is_empty() {
            return Ok(());
        }
        self.playback.play_mp3(&audio).await
    }
}

#[async_trait(?Send)]
impl Synthesizer for AzureSynthesizer {
    async fn speak(&mut self, text: &str) -> SynthesisOutcome {
        match self.try_speak(text).await {
            Ok(()) => SynthesisOutcome::completed(),
            Err(e) => {
                tracing::warn!(error = %e, "synthesis canceled");
                SynthesisOutcome::canceled(CancellationDetails::from_error(&e))
            }
        }
    }
}

impl Drop for AzureSynthesizer {
    fn drop(&mut self) {
        tracing::trace!("synthesis session released");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SettingsFile;
    use crate::speech::DEFAULT_VOICE;

    #[test]
    fn test_factory_builds_without_credentials() {
        let settings = Settings::from_file(SettingsFile::default());
        let factory = AzureSynthesizerFactory::new(&settings);
        assert_eq!(factory.voice(), DEFAULT_VOICE);
    }
}
