pub mod chain;
pub mod dto;
pub mod handlers;
pub mod languages;
pub mod provider;
pub mod providers;

use crate::state::AppState;
use axum::Router;

pub use chain::{ChainStep, TranslationChain, TranslationOutcome, NO_TRANSLATION};
pub use provider::{ProviderError, Translation, TranslationProvider};

pub fn router() -> Router<AppState> {
    Router::new().merge(handlers::translate_routes())
}
