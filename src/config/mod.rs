//! Configuration management for the voice translator

pub mod file;

use std::fmt;
use std::path::Path;

use secrecy::{ExposeSecret, SecretString};

pub use file::{ConfigLoadError, DEFAULT_SETTINGS_FILE, KEY_DELIMITER, SettingsFile};

/// Source locale for speech recognition (e.g. "en-US")
pub const RECOGNITION_LANGUAGE_KEY: &str = "SpeechRecognitionLanguage";
/// Target language for translation (e.g. "de")
pub const TARGET_LANGUAGE_KEY: &str = "TargetLanguage";
/// Neural voice used to speak the translation (e.g. "de-DE-KatjaNeural")
pub const VOICE_NAME_KEY: &str = "SpeechSynthesisVoiceName";
/// Speech resource subscription key
pub const SPEECH_KEY_KEY: &str = "speechKey";
/// Speech resource region (e.g. "westeurope")
pub const SPEECH_REGION_KEY: &str = "speechRegion";

/// Translator settings, loaded once at startup
///
/// Every key is optional. Absent keys read as empty strings.
pub struct Settings {
    file: SettingsFile,
    recognition_language: String,
    target_language: String,
    voice_name: String,
    speech_key: SecretString,
    speech_region: String,
}

impl Settings {
    /// Load settings from a JSON file
    ///
    /// # Errors
    ///
    /// Returns error if the file is missing or malformed
    pub fn load(path: &Path) -> Result<Self, ConfigLoadError> {
        let file = SettingsFile::read(path)?;
        let settings = Self::from_file(file);
        tracing::debug!(path = %path.display(), ?settings, "loaded settings");
        Ok(settings)
    }

    /// Build settings from an already flattened file
    #[must_use]
    pub fn from_file(file: SettingsFile) -> Self {
        let lookup = |key: &str| file.get(key).unwrap_or_default().to_string();

        Self {
            recognition_language: lookup(RECOGNITION_LANGUAGE_KEY),
            target_language: lookup(TARGET_LANGUAGE_KEY),
            voice_name: lookup(VOICE_NAME_KEY),
            speech_key: SecretString::from(lookup(SPEECH_KEY_KEY)),
            speech_region: lookup(SPEECH_REGION_KEY),
            file,
        }
    }

    /// Look up any key in the settings file
    ///
    /// Returns an empty string when the key is absent.
    #[must_use]
    pub fn get(&self, key: &str) -> &str {
        self.file.get(key).unwrap_or_default()
    }

    /// Locale the microphone input is recognized in
    #[must_use]
    pub fn recognition_language(&self) -> &str {
        &self.recognition_language
    }

    /// Language the recognized text is translated to
    #[must_use]
    pub fn target_language(&self) -> &str {
        &self.target_language
    }

    /// Voice the translation is spoken with
    #[must_use]
    pub fn voice_name(&self) -> &str {
        &self.voice_name
    }

    /// Speech resource subscription key
    #[must_use]
    pub fn speech_key(&self) -> &str {
        self.speech_key.expose_secret()
    }

    /// Speech resource region
    #[must_use]
    pub fn speech_region(&self) -> &str {
        &self.speech_region
    }
}

impl fmt::Debug for Settings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Settings")
            .field("recognition_language", &self.recognition_language)
            .field("target_language", &self.target_language)
            .field("voice_name", &self.voice_name)
            .field("speech_key", &"[REDACTED]")
            .field("speech_region", &self.speech_region)
            .finish_non_exhaustive()
    }
}
