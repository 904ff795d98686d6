use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct JwtConfig {
    pub secret: String,
    pub issuer: String,
    pub audience: String,
    pub ttl_minutes: i64,
}

/// Limits for the translation provider chain.
#[derive(Debug, Clone, Deserialize)]
pub struct TranslateConfig {
    pub provider_timeout_secs: u64,
    pub deadline_secs: u64,
}

impl Default for TranslateConfig {
    fn default() -> Self {
        Self {
            provider_timeout_secs: 5,
            deadline_secs: 20,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    pub database_url: String,
    pub jwt: JwtConfig,
    pub translate: TranslateConfig,
}

impl AppConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        let database_url = std::env::var("DATABASE_URL")
            .unwrap_or_else(|_| "sqlite://todo.db?mode=rwc".into());
        let jwt = JwtConfig {
            secret: std::env::var("JWT_SECRET")
                .map_err(|_| anyhow::anyhow!("JWT_SECRET must be set"))?,
            issuer: std::env::var("JWT_ISSUER").unwrap_or_else(|_| "todo-api".into()),
            audience: std::env::var("JWT_AUDIENCE").unwrap_or_else(|_| "todo-users".into()),
            ttl_minutes: env_parse("JWT_TTL_MINUTES").unwrap_or(60 * 24),
        };
        let defaults = TranslateConfig::default();
        let translate = TranslateConfig {
            provider_timeout_secs: env_parse("TRANSLATE_PROVIDER_TIMEOUT_SECS")
                .unwrap_or(defaults.provider_timeout_secs),
            deadline_secs: env_parse("TRANSLATE_DEADLINE_SECS").unwrap_or(defaults.deadline_secs),
        };
        Ok(Self {
            database_url,
            jwt,
            translate,
        })
    }
}

fn env_parse<T: std::str::FromStr>(key: &str) -> Option<T> {
    std::env::var(key).ok().and_then(|v| v.parse::<T>().ok())
}
