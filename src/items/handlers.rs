use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    routing::{get, put},
    Json, Router,
};
use tracing::{info, instrument};
use uuid::Uuid;

use super::{
    dto::{CreateItemRequest, CreatedItemResponse, MessageResponse, UpdateItemRequest},
    repo,
    repo_types::{Entry, EntryPatch, NewEntry},
};
use crate::{auth::AuthUser, error::AppError, state::AppState};

pub fn item_routes() -> Router<AppState> {
    Router::new()
        .route("/items", get(list_items).post(create_item))
        .route("/items/:id", put(update_item).delete(delete_item))
}

/// Ids that are not UUIDs cannot name an owned entry, so they are reported
/// exactly like a missing one.
fn parse_item_id(raw: &str) -> Result<Uuid, AppError> {
    Uuid::parse_str(raw).map_err(|_| AppError::not_found("Item not found"))
}

/// Descriptions are stored as sent; whitespace only matters for the
/// emptiness check.
fn description(text: Option<String>) -> Option<String> {
    text.filter(|t| !t.trim().is_empty())
}

#[instrument(skip_all, fields(user_id = %user.id))]
pub async fn list_items(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
) -> Result<Json<Vec<Entry>>, AppError> {
    let entries = repo::list_by_user(&state.db, user.id).await?;
    Ok(Json(entries))
}

#[instrument(skip_all, fields(user_id = %user.id))]
pub async fn create_item(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    payload: Result<Json<CreateItemRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<CreatedItemResponse>), AppError> {
    let Json(body) = payload?;
    let what_to_do = description(body.what_to_do)
        .ok_or_else(|| AppError::validation("Task description is required"))?;

    let entry = repo::create(
        &state.db,
        user.id,
        NewEntry {
            what_to_do,
            due_date: body.due_date,
            reminder_date: body.reminder_date,
        },
    )
    .await?;

    info!(entry_id = %entry.id, "entry created");
    Ok((
        StatusCode::CREATED,
        Json(CreatedItemResponse {
            message: "Task added successfully",
            id: entry.id,
        }),
    ))
}

#[instrument(skip_all, fields(user_id = %user.id, item_id = %id))]
pub async fn update_item(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(id): Path<String>,
    payload: Result<Json<UpdateItemRequest>, JsonRejection>,
) -> Result<Json<MessageResponse>, AppError> {
    let item_id = parse_item_id(&id)?;
    let Json(body) = payload?;

    let what_to_do = match body.what_to_do {
        Some(text) => Some(
            description(Some(text))
                .ok_or_else(|| AppError::validation("Task description cannot be empty"))?,
        ),
        None => None,
    };

    let patch = EntryPatch {
        what_to_do,
        due_date: body.due_date,
        reminder_date: body.reminder_date,
        status: body.status,
    };

    if !repo::update(&state.db, user.id, item_id, patch).await? {
        return Err(AppError::not_found("Item not found"));
    }

    info!("entry updated");
    Ok(Json(MessageResponse {
        message: "Item updated successfully",
    }))
}

#[instrument(skip_all, fields(user_id = %user.id, item_id = %id))]
pub async fn delete_item(
    State(state): State<AppState>,
    AuthUser(user): AuthUser,
    Path(id): Path<String>,
) -> Result<Json<MessageResponse>, AppError> {
    let item_id = parse_item_id(&id)?;

    if !repo::delete(&state.db, user.id, item_id).await? {
        return Err(AppError::not_found("Item not found"));
    }

    info!("entry deleted");
    Ok(Json(MessageResponse {
        message: "Item deleted successfully",
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn non_uuid_id_is_not_found() {
        let err = parse_item_id("42").unwrap_err();
        assert_eq!(err.status(), StatusCode::NOT_FOUND);
        assert!(parse_item_id(&Uuid::new_v4().to_string()).is_ok());
    }

    #[test]
    fn description_keeps_padding_but_rejects_blank() {
        assert_eq!(description(Some("  buy milk  ".into())).as_deref(), Some("  buy milk  "));
        assert_eq!(description(Some(" \t ".into())), None);
        assert_eq!(description(None), None);
    }
}
