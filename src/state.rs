use crate::config::AppConfig;
use crate::db;
use crate::translate::chain::TranslationChain;
use sqlx::SqlitePool;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub db: SqlitePool,
    pub config: Arc<AppConfig>,
    pub translator: Arc<TranslationChain>,
}

impl AppState {
    pub async fn init() -> anyhow::Result<Self> {
        let config = Arc::new(AppConfig::from_env()?);

        let db = db::connect(&config.database_url).await?;
        db::migrate(&db).await?;

        let translator = Arc::new(TranslationChain::standard(&config.translate)?);

        Ok(Self {
            db,
            config,
            translator,
        })
    }

    pub fn from_parts(
        db: SqlitePool,
        config: Arc<AppConfig>,
        translator: Arc<TranslationChain>,
    ) -> Self {
        Self {
            db,
            config,
            translator,
        }
    }
}
