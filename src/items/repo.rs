use sqlx::SqlitePool;
use time::OffsetDateTime;
use uuid::Uuid;

use super::repo_types::{Entry, EntryPatch, NewEntry, DEFAULT_STATUS};

/// All entries owned by `user_id`, in insertion order.
pub async fn list_by_user(db: &SqlitePool, user_id: Uuid) -> Result<Vec<Entry>, sqlx::Error> {
    sqlx::query_as::<_, Entry>(
        r#"
        SELECT id, what_to_do, due_date, reminder_date, status, user_id, created_at
        FROM entries
        WHERE user_id = ?
        ORDER BY rowid ASC
        "#,
    )
    .bind(user_id)
    .fetch_all(db)
    .await
}

pub async fn create(db: &SqlitePool, user_id: Uuid, new: NewEntry) -> Result<Entry, sqlx::Error> {
    sqlx::query_as::<_, Entry>(
        r#"
        INSERT INTO entries (id, what_to_do, due_date, reminder_date, status, user_id, created_at)
        VALUES (?, ?, ?, ?, ?, ?, ?)
        RETURNING id, what_to_do, due_date, reminder_date, status, user_id, created_at
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(new.what_to_do)
    .bind(new.due_date)
    .bind(new.reminder_date)
    .bind(DEFAULT_STATUS)
    .bind(user_id)
    .bind(OffsetDateTime::now_utc())
    .fetch_one(db)
    .await
}

/// Applies `patch` to the entry `(id, user_id)` in a single statement.
/// Returns `false` when no entry with that id is owned by `user_id`.
pub async fn update(
    db: &SqlitePool,
    user_id: Uuid,
    id: Uuid,
    patch: EntryPatch,
) -> Result<bool, sqlx::Error> {
    let set_due = patch.due_date.is_some();
    let set_reminder = patch.reminder_date.is_some();

    let res = sqlx::query(
        r#"
        UPDATE entries
        SET what_to_do    = COALESCE(?, what_to_do),
            status        = COALESCE(?, status),
            due_date      = CASE WHEN ? THEN ? ELSE due_date END,
            reminder_date = CASE WHEN ? THEN ? ELSE reminder_date END
        WHERE id = ? AND user_id = ?
        "#,
    )
    .bind(patch.what_to_do)
    .bind(patch.status)
    .bind(set_due)
    .bind(patch.due_date.flatten())
    .bind(set_reminder)
    .bind(patch.reminder_date.flatten())
    .bind(id)
    .bind(user_id)
    .execute(db)
    .await?;

    Ok(res.rows_affected() > 0)
}

/// Hard delete. Returns `false` when nothing owned by `user_id` matched.
pub async fn delete(db: &SqlitePool, user_id: Uuid, id: Uuid) -> Result<bool, sqlx::Error> {
    let res = sqlx::query("DELETE FROM entries WHERE id = ? AND user_id = ?")
        .bind(id)
        .bind(user_id)
        .execute(db)
        .await?;
    Ok(res.rows_affected() > 0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{auth::User, db};

    async fn setup() -> (SqlitePool, Uuid, Uuid) {
        let pool = db::connect_in_memory().await.expect("open db");
        db::migrate(&pool).await.expect("migrate");
        let a = User::create(&pool, "A", "a@x.com", "h").await.unwrap();
        let b = User::create(&pool, "B", "b@x.com", "h").await.unwrap();
        (pool, a.id, b.id)
    }

    fn new_entry(what: &str) -> NewEntry {
        NewEntry {
            what_to_do: what.into(),
            due_date: Some("2025-01-01 10:00:00".into()),
            reminder_date: None,
        }
    }

    #[tokio::test]
    async fn create_sets_pending_and_lists_in_order() {
        let (pool, a, _) = setup().await;
        let first = create(&pool, a, new_entry("first")).await.unwrap();
        create(&pool, a, new_entry("second")).await.unwrap();

        assert_eq!(first.status, DEFAULT_STATUS);
        let rows = list_by_user(&pool, a).await.unwrap();
        let names: Vec<_> = rows.iter().map(|e| e.what_to_do.as_str()).collect();
        assert_eq!(names, ["first", "second"]);
        assert_eq!(rows[0].due_date.as_deref(), Some("2025-01-01 10:00:00"));
    }

    #[tokio::test]
    async fn entries_are_scoped_to_owner() {
        let (pool, a, b) = setup().await;
        let entry = create(&pool, a, new_entry("mine")).await.unwrap();

        assert!(list_by_user(&pool, b).await.unwrap().is_empty());
        let patch = EntryPatch {
            status: Some("done".into()),
            ..Default::default()
        };
        assert!(!update(&pool, b, entry.id, patch).await.unwrap());
        assert!(!delete(&pool, b, entry.id).await.unwrap());
        assert_eq!(list_by_user(&pool, a).await.unwrap()[0].status, "pending");
    }

    #[tokio::test]
    async fn patch_touches_only_present_fields() {
        let (pool, a, _) = setup().await;
        let entry = create(&pool, a, new_entry("task")).await.unwrap();

        let patch = EntryPatch {
            status: Some("done".into()),
            ..Default::default()
        };
        assert!(update(&pool, a, entry.id, patch).await.unwrap());

        let row = &list_by_user(&pool, a).await.unwrap()[0];
        assert_eq!(row.status, "done");
        assert_eq!(row.what_to_do, "task");
        assert_eq!(row.due_date.as_deref(), Some("2025-01-01 10:00:00"));
        assert_eq!(row.reminder_date, None);
    }

    #[tokio::test]
    async fn explicit_null_clears_date() {
        let (pool, a, _) = setup().await;
        let entry = create(&pool, a, new_entry("task")).await.unwrap();

        let patch = EntryPatch {
            due_date: Some(None),
            reminder_date: Some(Some("2025-01-02 09:00:00".into())),
            ..Default::default()
        };
        assert!(update(&pool, a, entry.id, patch).await.unwrap());

        let row = &list_by_user(&pool, a).await.unwrap()[0];
        assert_eq!(row.due_date, None);
        assert_eq!(row.reminder_date.as_deref(), Some("2025-01-02 09:00:00"));
    }

    #[tokio::test]
    async fn delete_removes_row() {
        let (pool, a, _) = setup().await;
        let entry = create(&pool, a, new_entry("gone")).await.unwrap();
        assert!(delete(&pool, a, entry.id).await.unwrap());
        assert!(!delete(&pool, a, entry.id).await.unwrap());
        assert!(list_by_user(&pool, a).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn deleting_user_cascades_to_entries() {
        let (pool, a, _) = setup().await;
        create(&pool, a, new_entry("orphan?")).await.unwrap();
        sqlx::query("DELETE FROM users WHERE id = ?")
            .bind(a)
            .execute(&pool)
            .await
            .unwrap();
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM entries")
            .fetch_one(&pool)
            .await
            .unwrap();
        assert_eq!(count, 0);
    }
}
