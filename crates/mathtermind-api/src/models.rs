//! Data-transfer records for the course catalogue and learner progress
//!
//! These mirror the relational tables one-to-one. They carry no behavior;
//! relationships are expressed through foreign-key ids.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::ToSchema;
use uuid::Uuid;

/// A learning course
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Course {
    pub id: Uuid,
    /// Subject area, e.g. `algebra`
    pub topic: String,
    pub name: String,
    pub description: String,
    /// Expected total duration in minutes
    pub duration_min: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A category or label attached to courses
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Tag {
    pub id: Uuid,
    pub name: String,
    pub category: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A lesson within a course
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Lesson {
    pub id: Uuid,
    pub course_id: Uuid,
    pub title: String,
    /// Position of the lesson inside its course, starting at 1
    pub lesson_order: i32,
    pub estimated_time_min: i32,
    pub points_reward: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Kind of a content item
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum ContentType {
    Theory,
    Exercise,
    Assessment,
    Interactive,
    Resource,
}

/// A piece of learning content inside a lesson
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Content {
    pub id: Uuid,
    pub lesson_id: Uuid,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub order: i32,
    pub content_type: ContentType,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A learner's progress through a course
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Progress {
    pub id: Uuid,
    pub user_id: Uuid,
    pub course_id: Uuid,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_lesson_id: Option<Uuid>,
    pub total_points_earned: i32,
    pub time_spent_min: i32,
    pub progress_percentage: f64,
    /// Free-form resume state
    #[schema(value_type = Object)]
    pub progress_data: Value,
    pub last_accessed: DateTime<Utc>,
    pub is_completed: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A learner's progress on a single content item
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct UserContentProgress {
    pub id: Uuid,
    pub user_id: Uuid,
    pub content_id: Uuid,
    pub is_completed: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub score: Option<f64>,
    pub attempts: i32,
    pub time_spent_min: i32,
    pub last_interaction: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_content_type_uses_lowercase_names() {
        assert_eq!(
            serde_json::to_value(ContentType::Interactive).unwrap(),
            json!("interactive")
        );
        let parsed: ContentType = serde_json::from_value(json!("assessment")).unwrap();
        assert_eq!(parsed, ContentType::Assessment);
    }

    #[test]
    fn test_content_omits_missing_description() {
        let now = Utc::now();
        let content = Content {
            id: Uuid::nil(),
            lesson_id: Uuid::nil(),
            title: "Fractions".to_string(),
            description: None,
            order: 1,
            content_type: ContentType::Theory,
            created_at: now,
            updated_at: now,
        };

        let value = serde_json::to_value(&content).unwrap();
        assert!(value.get("description").is_none());
        assert_eq!(value["content_type"], json!("theory"));
    }
}
