//! Row types decoded by SQLx and their mapping to API records

use chrono::{DateTime, Utc};
use mathtermind_api::models::{Course, Lesson};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, FromRow)]
pub(crate) struct CourseRow {
    pub id: Uuid,
    pub topic: String,
    pub name: String,
    pub description: String,
    pub duration_min: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<CourseRow> for Course {
    fn from(row: CourseRow) -> Self {
        Self {
            id: row.id,
            topic: row.topic,
            name: row.name,
            description: row.description,
            duration_min: row.duration_min,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[derive(Debug, FromRow)]
pub(crate) struct LessonRow {
    pub id: Uuid,
    pub course_id: Uuid,
    pub title: String,
    pub lesson_order: i32,
    pub estimated_time_min: i32,
    pub points_reward: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<LessonRow> for Lesson {
    fn from(row: LessonRow) -> Self {
        Self {
            id: row.id,
            course_id: row.course_id,
            title: row.title,
            lesson_order: row.lesson_order,
            estimated_time_min: row.estimated_time_min,
            points_reward: row.points_reward,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}
