//! Worker entity model.

use serde::Serialize;
use sqlx::FromRow;

use rollcall_core::types::{DbId, Timestamp};

/// A row from the `workers` table.
///
/// Created on the first `follow` event for an unseen platform identity.
/// `name` stays NULL until the worker sends their first text message;
/// `language` selects which message texts they receive (`ja` or `en`).
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Worker {
    pub id: DbId,
    pub line_user_id: String,
    pub name: Option<String>,
    pub language: String,
    pub is_active: bool,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Worker {
    /// Display name for reports: the registered name, or a truncated
    /// platform id for workers who never sent one.
    pub fn display_name(&self) -> String {
        match &self.name {
            Some(name) => name.clone(),
            None => {
                let id = &self.line_user_id;
                let prefix: String = id.chars().take(8).collect();
                format!("({prefix}…)")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn worker(name: Option<&str>) -> Worker {
        Worker {
            id: 1,
            line_user_id: "U1234567890abcdef".to_string(),
            name: name.map(String::from),
            language: "ja".to_string(),
            is_active: true,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn display_name_prefers_registered_name() {
        assert_eq!(worker(Some("Tanaka")).display_name(), "Tanaka");
    }

    #[test]
    fn display_name_falls_back_to_id_prefix() {
        assert_eq!(worker(None).display_name(), "(U1234567…)");
    }
}
