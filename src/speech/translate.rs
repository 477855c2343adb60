//! Text translation over the Azure Translator REST API

use serde::{Deserialize, Serialize};

use crate::{Error, Result};

const TRANSLATOR_ENDPOINT: &str = "https://api.cognitive.microsofttranslator.com/translate";

#[derive(Serialize)]
struct TranslateRequest<'a> {
    #[serde(rename = "Text")]
    text: &'a str,
}

#[derive(Deserialize)]
struct TranslateResponse {
    translations: Vec<TranslationEntry>,
}

#[derive(Deserialize)]
struct TranslationEntry {
    text: String,
}

/// Reduce a recognition locale to a Translator language code
///
/// `en-US` becomes `en`. Chinese locales map to their script codes.
#[must_use]
pub fn translator_language(locale: &str) -> String {
    let lower = locale.to_lowercase();
    match lower.as_str() {
        "zh-cn" | "zh-sg" | "zh-hans" => "zh-Hans".to_string(),
        "zh-tw" | "zh-hk" | "zh-mo" | "zh-hant" => "zh-Hant".to_string(),
        _ => lower
            .split(['-', '_'])
            .next()
            .unwrap_or_default()
            .to_string(),
    }
}

/// Translates recognized text to the target language
pub struct Translator {
    client: reqwest::Client,
    api_key: String,
    region: String,
    from: String,
    to: String,
}

impl Translator {
    /// Create a translator between two languages
    #[must_use]
    pub fn new(api_key: String, region: String, source_locale: &str, to: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_key,
            region,
            from: translator_language(source_locale),
            to,
        }
    }

    /// Target language as configured
    #[must_use]
    pub fn target(&self) -> &str {
        &self.to
    }

    /// Translate one piece of text
    ///
    /// # Errors
    ///
    /// Returns error if the key or target language is missing, the request
    /// fails or the response has no translation
    pub async fn translate(&self, text: &str) -> Result<String> {
        if self.api_key.is_empty() {
            return Err(Error::Config("speech key required for translation".to_string()));
        }
        if self.to.is_empty() {
            return Err(Error::Config("target language required for translation".to_string()));
        }

        tracing::debug!(from = %self.from, to = %self.to, "starting translation");

        let mut query = vec![("api-version", "3.0"), ("to", self.to.as_str())];
        if !self.from.is_empty() {
            query.push(("from", self.from.as_str()));
        }

        let mut request = self
            .client
            .post(TRANSLATOR_ENDPOINT)
            .query(&query)
            .header("Ocp-Apim-Subscription-Key", &self.api_key)
            .json(&[TranslateRequest { text }]);
        if !self.region.is_empty() {
            request = request.header("Ocp-Apim-Subscription-Region", &self.region);
        }

        let response = request.send().await.map_err(|e| {
            tracing::error!(error = %e, "translation request failed");
            e
        })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::error!(status = %status, body = %body, "Translator API error");
            return Err(Error::Api {
                service: "Translator",
                status,
                body,
            });
        }

        let body: Vec<TranslateResponse> = response.json().await?;
        let translated = first_translation(body)?;

        tracing::info!(translation = %translated, "translation complete");
        Ok(translated)
    }
}

fn first_translation(body: Vec<TranslateResponse>) -> Result<String> {
    body.into_iter()
        .next()
        .and_then(|r| r.translations.into_iter().next())
        .map(|t| t.text)
        .ok_or_else(|| Error::Translation("response contained no translation".to_string()))
}
