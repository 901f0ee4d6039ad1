//! Course catalogue queries

use async_trait::async_trait;
use mathtermind_api::models::{Course, Lesson};
use sqlx::PgPool;
use tracing::debug;
use uuid::Uuid;

use crate::error::Result;
use crate::rows::{CourseRow, LessonRow};

/// A window into an ordered result set
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    /// Maximum number of rows to return
    pub limit: u32,
    /// Number of rows to skip, never negative
    pub offset: i64,
}

/// Read access to courses and their lessons
#[async_trait]
pub trait CourseRepository: Send + Sync {
    /// Courses ordered by creation time, newest first
    async fn list_courses(&self, page: Page) -> Result<Vec<Course>>;

    /// A single course by id
    async fn find_course(&self, id: Uuid) -> Result<Option<Course>>;

    /// Lessons of a course ordered by `lesson_order`
    async fn list_lessons(&self, course_id: Uuid) -> Result<Vec<Lesson>>;
}

/// [`CourseRepository`] backed by a PostgreSQL pool
#[derive(Debug, Clone)]
pub struct PgCourseRepository {
    pool: PgPool,
}

impl PgCourseRepository {
    /// Create a repository over an existing pool
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CourseRepository for PgCourseRepository {
    async fn list_courses(&self, page: Page) -> Result<Vec<Course>> {
        debug!(limit = page.limit, offset = page.offset, "listing courses");

        let rows = sqlx::query_as::<_, CourseRow>(
            r#"
            SELECT id, topic, name, description, duration_min, created_at, updated_at
            FROM courses
            ORDER BY created_at DESC
            LIMIT $1 OFFSET $2
            "#,
        )
        .bind(i64::from(page.limit))
        .bind(page.offset)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(Course::from).collect())
    }

    async fn find_course(&self, id: Uuid) -> Result<Option<Course>> {
        let row = sqlx::query_as::<_, CourseRow>(
            r#"
            SELECT id, topic, name, description, duration_min, created_at, updated_at
            FROM courses
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(Course::from))
    }

    async fn list_lessons(&self, course_id: Uuid) -> Result<Vec<Lesson>> {
        let rows = sqlx::query_as::<_, LessonRow>(
            r#"
            SELECT id, course_id, title, lesson_order, estimated_time_min, points_reward,
                   created_at, updated_at
            FROM lessons
            WHERE course_id = $1
            ORDER BY lesson_order ASC
            "#,
        )
        .bind(course_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(Lesson::from).collect())
    }
}
