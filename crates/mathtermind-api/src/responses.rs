//! Response types for the API

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::models::{Course, Lesson};

/// One page of courses
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CourseListResponse {
    pub items: Vec<Course>,
    /// Page size that was applied
    pub limit: u32,
    /// Number of courses skipped
    pub offset: i64,
}

/// Lessons of one course, ordered by `lesson_order`
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct LessonListResponse {
    pub items: Vec<Lesson>,
    pub course_id: Uuid,
}
