use axum::{
    extract::{rejection::JsonRejection, State},
    routing::post,
    Json, Router,
};
use tracing::{info, instrument};

use super::dto::{TranslateRequest, TranslateResponse};
use crate::{auth::AuthUser, error::AppError, state::AppState};

pub fn translate_routes() -> Router<AppState> {
    Router::new().route("/translate", post(translate_text))
}

/// Always answers 200 once the input is valid; provider failures degrade to
/// echoing the input.
#[instrument(skip_all, fields(user_id = %user.id))]
pub async fn translate_text(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    payload: Result<Json<TranslateRequest>, JsonRejection>,
) -> Result<Json<TranslateResponse>, AppError> {
    let Json(body) = payload?;

    let (Some(text), Some(target)) = (
        body.text.filter(|t| !t.trim().is_empty()),
        body.target_language
            .map(|l| l.trim().to_string())
            .filter(|l| !l.is_empty()),
    ) else {
        return Err(AppError::validation("Text and target language are required"));
    };

    let outcome = state.translator.translate(&text, &target).await;
    info!(
        target_language = %target,
        translated = outcome.is_translated(),
        service = %outcome.service,
        "translation served"
    );

    Ok(Json(TranslateResponse {
        original_text: text,
        translated_text: outcome.translated_text,
        source_language: outcome.source_language,
        target_language: target,
        service: outcome.service,
    }))
}
