use async_trait::async_trait;
use thiserror::Error;

/// A candidate produced by one provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Translation {
    pub text: String,
    pub source_language: String,
    pub service: String,
}

/// Why a provider attempt produced nothing. Never leaves the chain.
#[derive(Error, Debug)]
pub enum ProviderError {
    #[error("unsupported target language {0}")]
    UnsupportedLanguage(String),

    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("unexpected status {0}")]
    Status(reqwest::StatusCode),

    #[error("malformed response: {0}")]
    Malformed(String),

    /// The service answered, but with its own error payload.
    #[error("provider error: {0}")]
    Upstream(String),
}

#[async_trait]
pub trait TranslationProvider: Send + Sync {
    /// Label reported to callers as `service` when this provider wins.
    fn name(&self) -> &str;

    async fn attempt(&self, text: &str, target: &str) -> Result<Translation, ProviderError>;
}

/// A candidate is plausible when it is non-blank and not just the input
/// echoed back (ignoring case).
pub fn is_plausible(original: &str, candidate: &str) -> bool {
    !candidate.trim().is_empty() && candidate.to_lowercase() != original.to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_echo_and_blank() {
        assert!(!is_plausible("Hello", "hello"));
        assert!(!is_plausible("Hello", "HELLO"));
        assert!(!is_plausible("Hello", ""));
        assert!(!is_plausible("Hello", "   "));
        assert!(is_plausible("Hello", "Hola"));
    }
}
