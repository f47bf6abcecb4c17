//! Task record
//!
//! The shape shared by the `tasks` table, the cached snapshot and the
//! `/api/tasks` response body.

use serde::{Deserialize, Serialize};

/// A single row of the `tasks` table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Task {
    pub id: i32,
    pub title: String,
    pub description: String,
    pub status: String,
}

impl Task {
    /// Creates a new Task
    pub fn new(
        id: i32,
        title: impl Into<String>,
        description: impl Into<String>,
        status: impl Into<String>,
    ) -> Self {
        Self {
            id,
            title: title.into(),
            description: description.into(),
            status: status.into(),
        }
    }
}

impl From<(i32, String, String, String)> for Task {
    fn from((id, title, description, status): (i32, String, String, String)) -> Self {
        Self {
            id,
            title,
            description,
            status,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_task_serializes_four_fields() {
        let task = Task::new(1, "Write docs", "README and examples", "pending");
        let json = serde_json::to_value(&task).unwrap();

        let object = json.as_object().unwrap();
        assert_eq!(object.len(), 4);
        assert_eq!(json["id"], 1);
        assert_eq!(json["title"], "Write docs");
        assert_eq!(json["description"], "README and examples");
        assert_eq!(json["status"], "pending");
    }

    #[test]
    fn test_task_from_row() {
        let row = (7, "a".to_string(), "b".to_string(), "done".to_string());
        assert_eq!(Task::from(row), Task::new(7, "a", "b", "done"));
    }

    #[test]
    fn test_task_rejects_unknown_fields() {
        let json = r#"{"id":1,"title":"t","description":"d","status":"s","owner":"x"}"#;
        assert!(serde_json::from_str::<Task>(json).is_err());
    }

    #[test]
    fn test_task_rejects_missing_fields() {
        let json = r#"{"id":1,"title":"t"}"#;
        assert!(serde_json::from_str::<Task>(json).is_err());
    }
}
