use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;

#[derive(Debug, Deserialize)]
pub struct CreateItemRequest {
    pub what_to_do: Option<String>,
    pub due_date: Option<String>,
    pub reminder_date: Option<String>,
}

/// Body of `PUT /items/{id}`. Absent keys stay `None`; a JSON `null` on a
/// date becomes `Some(None)`.
#[derive(Debug, Default, Deserialize)]
pub struct UpdateItemRequest {
    pub what_to_do: Option<String>,
    #[serde(default, deserialize_with = "present")]
    pub due_date: Option<Option<String>>,
    #[serde(default, deserialize_with = "present")]
    pub reminder_date: Option<Option<String>>,
    pub status: Option<String>,
}

fn present<'de, D>(deserializer: D) -> Result<Option<Option<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<String>::deserialize(deserializer).map(Some)
}

#[derive(Debug, Serialize)]
pub struct CreatedItemResponse {
    pub message: &'static str,
    pub id: Uuid,
}

#[derive(Debug, Serialize)]
pub struct MessageResponse {
    pub message: &'static str,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn absent_and_null_dates_differ() {
        let absent: UpdateItemRequest = serde_json::from_str(r#"{"status":"done"}"#).unwrap();
        assert_eq!(absent.due_date, None);
        assert_eq!(absent.status.as_deref(), Some("done"));

        let cleared: UpdateItemRequest = serde_json::from_str(r#"{"due_date":null}"#).unwrap();
        assert_eq!(cleared.due_date, Some(None));

        let set: UpdateItemRequest =
            serde_json::from_str(r#"{"reminder_date":"2025-01-01 08:00:00"}"#).unwrap();
        assert_eq!(set.reminder_date, Some(Some("2025-01-01 08:00:00".into())));
    }
}
