use std::{sync::Arc, time::Duration};

use tokio::time::{timeout_at, Instant};
use tracing::{debug, info, warn};

use super::{
    languages::SPECIALIZED_LANGUAGES,
    provider::{is_plausible, TranslationProvider},
    providers::{GoogleCloudV2, GoogleDict, GoogleGtx, LibreTranslate, LingoJam, MyMemory},
};
use crate::config::TranslateConfig;

/// Service label used when every provider failed.
pub const NO_TRANSLATION: &str = "No translation available";

const USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
                          (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36";

/// One position in the chain. A step with `only_for` is skipped for any
/// target language outside that set.
pub struct ChainStep {
    pub provider: Arc<dyn TranslationProvider>,
    pub only_for: Option<&'static [&'static str]>,
}

impl ChainStep {
    pub fn always(provider: impl TranslationProvider + 'static) -> Self {
        Self {
            provider: Arc::new(provider),
            only_for: None,
        }
    }

    pub fn only_for(
        provider: impl TranslationProvider + 'static,
        languages: &'static [&'static str],
    ) -> Self {
        Self {
            provider: Arc::new(provider),
            only_for: Some(languages),
        }
    }

    fn applies_to(&self, target: &str) -> bool {
        self.only_for.map_or(true, |langs| langs.contains(&target))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranslationOutcome {
    pub translated_text: String,
    pub source_language: String,
    pub service: String,
}

impl TranslationOutcome {
    fn untranslated(text: &str) -> Self {
        Self {
            translated_text: text.to_string(),
            source_language: "en".into(),
            service: NO_TRANSLATION.into(),
        }
    }

    pub fn is_translated(&self) -> bool {
        self.service != NO_TRANSLATION
    }
}

/// Ordered fallback over translation providers. Steps run one at a time;
/// the first plausible candidate wins. Exhausting the chain or running past
/// the deadline yields the input text tagged with [`NO_TRANSLATION`].
pub struct TranslationChain {
    steps: Vec<ChainStep>,
    deadline: Duration,
}

impl TranslationChain {
    pub fn new(steps: Vec<ChainStep>, deadline: Duration) -> Self {
        Self { steps, deadline }
    }

    /// The production chain over the public providers.
    pub fn standard(cfg: &TranslateConfig) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(cfg.provider_timeout_secs))
            .user_agent(USER_AGENT)
            .build()?;

        let steps = vec![
            ChainStep::always(MyMemory::new(client.clone())),
            ChainStep::only_for(GoogleGtx::specialized(client.clone()), SPECIALIZED_LANGUAGES),
            ChainStep::always(GoogleGtx::general(client.clone())),
            ChainStep::always(LingoJam::new(client.clone())),
            ChainStep::always(LibreTranslate::new(client.clone())),
            ChainStep::only_for(GoogleCloudV2::new(client.clone()), SPECIALIZED_LANGUAGES),
            ChainStep::always(GoogleDict::new(client)),
        ];
        Ok(Self::new(steps, Duration::from_secs(cfg.deadline_secs)))
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    pub async fn translate(&self, text: &str, target: &str) -> TranslationOutcome {
        let deadline = Instant::now() + self.deadline;

        for step in self.steps.iter().filter(|s| s.applies_to(target)) {
            let name = step.provider.name();
            debug!(service = name, target_language = target, "trying translation provider");

            let attempt = match timeout_at(deadline, step.provider.attempt(text, target)).await {
                Ok(attempt) => attempt,
                Err(_) => {
                    warn!(service = name, "translation deadline exceeded");
                    return TranslationOutcome::untranslated(text);
                }
            };

            match attempt {
                Ok(candidate) if is_plausible(text, &candidate.text) => {
                    info!(service = %candidate.service, target_language = target, "translation accepted");
                    return TranslationOutcome {
                        translated_text: candidate.text,
                        source_language: candidate.source_language,
                        service: candidate.service,
                    };
                }
                Ok(_) => debug!(service = name, "provider echoed input or returned nothing"),
                Err(e) => debug!(service = name, error = %e, "provider failed"),
            }
        }

        warn!(target_language = target, "all translation providers failed");
        TranslationOutcome::untranslated(text)
    }
}
