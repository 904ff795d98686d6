//! HTTP adapters for the public translation services used by the chain.
//! Each one owns its endpoint, its language table and its response schema.

use std::borrow::Cow;

use async_trait::async_trait;
use lazy_static::lazy_static;
use regex::{Captures, Regex};
use reqwest::{Client, RequestBuilder, Response};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use super::{
    languages::{LanguageMap, GOOGLE_CODES, LINGOJAM_NAMES, MYMEMORY_CODES},
    provider::{ProviderError, Translation, TranslationProvider},
};

pub const MYMEMORY_URL: &str = "https://api.mymemory.translated.net";
pub const GOOGLE_GTX_URL: &str = "https://translate.googleapis.com";
pub const LINGOJAM_URL: &str = "https://lingojam.com";
pub const LIBRETRANSLATE_URL: &str = "https://libretranslate.com";
pub const GOOGLE_CLOUD_URL: &str = "https://translation.googleapis.com";
pub const GOOGLE_DICT_URL: &str = "https://clients5.google.com";

/// Source language assumed by every provider request.
const SOURCE: &str = "en";

async fn send_checked(req: RequestBuilder) -> Result<Response, ProviderError> {
    let res = req.send().await?;
    if !res.status().is_success() {
        return Err(ProviderError::Status(res.status()));
    }
    Ok(res)
}

/// Decode HTML entities some providers leave in their output. Entities are
/// resolved one at a time; unknown ones stay as written.
fn unescape(text: &str) -> String {
    lazy_static! {
        static ref ENTITY_RE: Regex = Regex::new(r"&#?[A-Za-z0-9]+;").unwrap();
    }
    ENTITY_RE
        .replace_all(text, |caps: &Captures| {
            let raw = &caps[0];
            quick_xml::escape::unescape_with(raw, quick_xml::escape::resolve_html5_entity)
                .map(Cow::into_owned)
                .unwrap_or_else(|_| raw.to_string())
        })
        .into_owned()
}

fn target_for(map: &LanguageMap, target: &str) -> Result<String, ProviderError> {
    map.normalize(target)
        .ok_or_else(|| ProviderError::UnsupportedLanguage(target.to_string()))
}

fn translation(text: String, source: &str, service: &str) -> Translation {
    Translation {
        text,
        source_language: source.to_string(),
        service: service.to_string(),
    }
}

// ---- MyMemory ----

#[derive(Debug, Deserialize)]
struct MyMemoryResponse {
    #[serde(rename = "responseData")]
    response_data: MyMemoryData,
    /// Sent as a number or a string depending on the error path.
    #[serde(rename = "responseStatus", default)]
    response_status: Value,
}

impl MyMemoryResponse {
    /// Quota and language errors arrive as HTTP 200 with the message in
    /// `translatedText`; only `responseStatus` tells them apart.
    fn into_text(self) -> Result<String, ProviderError> {
        let status = match &self.response_status {
            Value::Null => None,
            Value::Number(n) => n.as_u64(),
            Value::String(s) => s.trim().parse().ok(),
            _ => Some(0),
        };
        match status {
            None | Some(200) => Ok(self.response_data.translated_text),
            Some(_) => Err(ProviderError::Upstream(format!(
                "status {}: {}",
                self.response_status, self.response_data.translated_text
            ))),
        }
    }
}

#[derive(Debug, Deserialize)]
struct MyMemoryData {
    #[serde(rename = "translatedText")]
    translated_text: String,
}

pub struct MyMemory {
    client: Client,
    base_url: String,
    languages: LanguageMap,
}

impl MyMemory {
    pub fn new(client: Client) -> Self {
        Self {
            client,
            base_url: MYMEMORY_URL.into(),
            languages: LanguageMap::Table(MYMEMORY_CODES),
        }
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }
}

#[async_trait]
impl TranslationProvider for MyMemory {
    fn name(&self) -> &str {
        "MyMemory Translation API"
    }

    async fn attempt(&self, text: &str, target: &str) -> Result<Translation, ProviderError> {
        let lang = target_for(&self.languages, target)?;
        let langpair = format!("{}|{}", SOURCE, lang);
        let req = self
            .client
            .get(format!("{}/get", self.base_url))
            .query(&[("q", text), ("langpair", langpair.as_str())]);

        let body: MyMemoryResponse = send_checked(req).await?.json().await?;
        let text = body.into_text()?;
        Ok(translation(unescape(&text), SOURCE, self.name()))
    }
}

// ---- Google gtx (unofficial web endpoint) ----

/// `translate_a/single?client=gtx`. Used twice in the chain: once as a
/// specialized attempt and once as the general fallback.
pub struct GoogleGtx {
    client: Client,
    base_url: String,
    service: &'static str,
    source_label: &'static str,
    languages: LanguageMap,
}

impl GoogleGtx {
    pub fn general(client: Client) -> Self {
        Self {
            client,
            base_url: GOOGLE_GTX_URL.into(),
            service: "Google Translate",
            source_label: "auto",
            languages: LanguageMap::Table(GOOGLE_CODES),
        }
    }

    pub fn specialized(client: Client) -> Self {
        Self {
            client,
            base_url: GOOGLE_GTX_URL.into(),
            service: "Google Translate (Specialized)",
            source_label: SOURCE,
            languages: LanguageMap::BaseCode,
        }
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }
}

/// The gtx body is `[[["segment", "source", ...], ...], ...]`; the
/// translation is the concatenation of the segment strings.
fn join_gtx_segments(body: &Value) -> Result<String, ProviderError> {
    let segments = body
        .get(0)
        .and_then(Value::as_array)
        .ok_or_else(|| ProviderError::Malformed("expected nested segment array".into()))?;
    Ok(segments
        .iter()
        .filter_map(|seg| seg.get(0).and_then(Value::as_str))
        .collect())
}

#[async_trait]
impl TranslationProvider for GoogleGtx {
    fn name(&self) -> &str {
        self.service
    }

    async fn attempt(&self, text: &str, target: &str) -> Result<Translation, ProviderError> {
        let lang = target_for(&self.languages, target)?;
        let req = self
            .client
            .get(format!("{}/translate_a/single", self.base_url))
            .query(&[
                ("client", "gtx"),
                ("sl", SOURCE),
                ("tl", lang.as_str()),
                ("dt", "t"),
                ("q", text),
            ]);

        let body: Value = send_checked(req).await?.json().await?;
        let joined = join_gtx_segments(&body)?;
        Ok(translation(joined, self.source_label, self.service))
    }
}

// ---- LingoJAM ----

#[derive(Debug, Deserialize)]
struct TranslatedTextResponse {
    #[serde(rename = "translatedText")]
    translated_text: String,
}

pub struct LingoJam {
    client: Client,
    base_url: String,
    languages: LanguageMap,
}

impl LingoJam {
    pub fn new(client: Client) -> Self {
        Self {
            client,
            base_url: LINGOJAM_URL.into(),
            languages: LanguageMap::Strict(LINGOJAM_NAMES),
        }
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }
}

#[async_trait]
impl TranslationProvider for LingoJam {
    fn name(&self) -> &str {
        "LingoJAM Translation"
    }

    async fn attempt(&self, text: &str, target: &str) -> Result<Translation, ProviderError> {
        let lang = target_for(&self.languages, target)?;
        let req = self
            .client
            .get(format!("{}/api/api.php", self.base_url))
            .query(&[
                ("action", "translate"),
                ("from", "english"),
                ("to", lang.as_str()),
                ("text", text),
            ]);

        let body: TranslatedTextResponse = send_checked(req).await?.json().await?;
        Ok(translation(body.translated_text, SOURCE, self.name()))
    }
}

// ---- LibreTranslate ----

#[derive(Debug, Serialize)]
struct LibreTranslateRequest<'a> {
    q: &'a str,
    source: &'a str,
    target: &'a str,
    format: &'a str,
    api_key: &'a str,
}

#[derive(Debug, Deserialize)]
struct LibreTranslateResponse {
    #[serde(rename = "translatedText")]
    translated_text: Option<String>,
    error: Option<String>,
}

pub struct LibreTranslate {
    client: Client,
    base_url: String,
    api_key: String,
    languages: LanguageMap,
}

impl LibreTranslate {
    pub fn new(client: Client) -> Self {
        Self {
            client,
            base_url: LIBRETRANSLATE_URL.into(),
            api_key: String::new(),
            languages: LanguageMap::Identity,
        }
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }
}

#[async_trait]
impl TranslationProvider for LibreTranslate {
    fn name(&self) -> &str {
        "LibreTranslate"
    }

    async fn attempt(&self, text: &str, target: &str) -> Result<Translation, ProviderError> {
        let lang = target_for(&self.languages, target)?;
        let req = self
            .client
            .post(format!("{}/translate", self.base_url))
            .json(&LibreTranslateRequest {
                q: text,
                source: SOURCE,
                target: &lang,
                format: "text",
                api_key: &self.api_key,
            });

        let body: LibreTranslateResponse = send_checked(req).await?.json().await?;
        match (body.translated_text, body.error) {
            (_, Some(err)) => Err(ProviderError::Upstream(err)),
            (Some(text), None) => Ok(translation(text, SOURCE, self.name())),
            (None, None) => Err(ProviderError::Malformed("no translatedText in body".into())),
        }
    }
}

// ---- Google Cloud v2 (keyless) ----

/// Pulls `translatedText` out of the body with a regex, since the endpoint
/// does not always answer with well-formed JSON.
fn extract_translated_text(body: &str) -> Option<String> {
    lazy_static! {
        static ref TRANSLATED_RE: Regex =
            Regex::new(r#""translatedText":\s*"([^"]+)""#).unwrap();
    }
    if !body.contains("data") {
        return None;
    }
    TRANSLATED_RE
        .captures(body)
        .and_then(|c| c.get(1))
        .map(|m| unescape(m.as_str()))
}

pub struct GoogleCloudV2 {
    client: Client,
    base_url: String,
    languages: LanguageMap,
}

impl GoogleCloudV2 {
    pub fn new(client: Client) -> Self {
        Self {
            client,
            base_url: GOOGLE_CLOUD_URL.into(),
            languages: LanguageMap::BaseCode,
        }
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }
}

#[async_trait]
impl TranslationProvider for GoogleCloudV2 {
    fn name(&self) -> &str {
        "Google Cloud Translation API (Special)"
    }

    async fn attempt(&self, text: &str, target: &str) -> Result<Translation, ProviderError> {
        let lang = target_for(&self.languages, target)?;
        let req = self
            .client
            .get(format!("{}/language/translate/v2", self.base_url))
            .header(reqwest::header::REFERER, "https://translate.google.com/")
            .header(reqwest::header::ACCEPT, "application/json")
            .query(&[
                ("key", ""),
                ("q", text),
                ("source", SOURCE),
                ("target", lang.as_str()),
            ]);

        let body = send_checked(req).await?.text().await?;
        let text = extract_translated_text(&body)
            .ok_or_else(|| ProviderError::Malformed("no translatedText in body".into()))?;
        Ok(translation(text, SOURCE, self.name()))
    }
}

// ---- Google dict-chrome-ex ----

/// The first element is either the translated string or
/// `["translated", "detected-source"]`.
fn first_dict_entry(body: &Value) -> Result<String, ProviderError> {
    let first = body
        .get(0)
        .ok_or_else(|| ProviderError::Malformed("empty response array".into()))?;
    first
        .as_str()
        .or_else(|| first.get(0).and_then(Value::as_str))
        .map(str::to_string)
        .ok_or_else(|| ProviderError::Malformed("first element is not text".into()))
}

pub struct GoogleDict {
    client: Client,
    base_url: String,
    languages: LanguageMap,
}

impl GoogleDict {
    pub fn new(client: Client) -> Self {
        Self {
            client,
            base_url: GOOGLE_DICT_URL.into(),
            languages: LanguageMap::Identity,
        }
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }
}

#[async_trait]
impl TranslationProvider for GoogleDict {
    fn name(&self) -> &str {
        "Google Translate (Alternative)"
    }

    async fn attempt(&self, text: &str, target: &str) -> Result<Translation, ProviderError> {
        let lang = target_for(&self.languages, target)?;
        let req = self
            .client
            .get(format!("{}/translate_a/t", self.base_url))
            .query(&[
                ("client", "dict-chrome-ex"),
                ("sl", SOURCE),
                ("tl", lang.as_str()),
                ("q", text),
            ]);

        let body: Value = send_checked(req).await?.json().await?;
        let text = first_dict_entry(&body)?;
        debug!(service = self.name(), "dict response parsed");
        Ok(translation(text, SOURCE, self.name()))
    }
}
