use serde::Serialize;
use sqlx::FromRow;
use time::OffsetDateTime;
use uuid::Uuid;

/// Status given to every new entry.
pub const DEFAULT_STATUS: &str = "pending";

/// Todo entry owned by a single user.
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Entry {
    pub id: Uuid,
    pub what_to_do: String,
    pub due_date: Option<String>,
    pub reminder_date: Option<String>,
    pub status: String,
    #[serde(skip_serializing)]
    pub user_id: Uuid,
    #[serde(skip_serializing)]
    pub created_at: OffsetDateTime,
}

/// Fields for a new entry. Status is not caller-controlled.
#[derive(Debug)]
pub struct NewEntry {
    pub what_to_do: String,
    pub due_date: Option<String>,
    pub reminder_date: Option<String>,
}

/// Partial update. `None` leaves a column untouched; for the nullable date
/// columns `Some(None)` clears the value.
#[derive(Debug, Default)]
pub struct EntryPatch {
    pub what_to_do: Option<String>,
    pub due_date: Option<Option<String>>,
    pub reminder_date: Option<Option<String>>,
    pub status: Option<String>,
}
