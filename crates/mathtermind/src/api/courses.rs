//! Course catalogue endpoints

use std::sync::Arc;

use axum::{
    Json,
    extract::{
        Path, Query, State,
        rejection::{PathRejection, QueryRejection},
    },
};
use mathtermind_api::ErrorResponse;
use mathtermind_api::responses::{CourseListResponse, LessonListResponse};
use mathtermind_core::{AppError, ErrorCode, FieldRules, Rule, Validate, validate};
use mathtermind_db::Page;
use serde::Deserialize;
use tracing::debug;
use utoipa::IntoParams;
use uuid::Uuid;

use crate::api::error::ApiResult;
use crate::middleware::RequestContext;
use crate::state::AppState;

const DEFAULT_LIMIT: u32 = 20;
const MAX_LIMIT: u32 = 100;

/// Query parameters for listing courses
///
/// Kept as raw strings so a bad value can be echoed back in the error details.
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ListCoursesQuery {
    /// Page size, 1 to 100 (default 20)
    #[param(value_type = Option<u32>)]
    pub limit: Option<String>,
    /// Rows to skip (default 0)
    #[param(value_type = Option<i64>, minimum = 0)]
    pub offset: Option<String>,
}

impl ListCoursesQuery {
    fn page(&self) -> Result<Page, AppError> {
        let limit = match non_empty(self.limit.as_deref()) {
            None => DEFAULT_LIMIT,
            Some(raw) => raw
                .parse::<u32>()
                .ok()
                .filter(|limit| (1..=MAX_LIMIT).contains(limit))
                .ok_or_else(|| {
                    AppError::new(ErrorCode::Validation, "invalid limit parameter")
                        .with_detail("limit", raw)
                })?,
        };

        let offset = match non_empty(self.offset.as_deref()) {
            None => 0,
            Some(raw) => raw
                .parse::<i64>()
                .ok()
                .filter(|offset| *offset >= 0)
                .ok_or_else(|| {
                    AppError::new(ErrorCode::Validation, "invalid offset parameter")
                        .with_detail("offset", raw)
                })?,
        };

        Ok(Page { limit, offset })
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}

/// Path segment naming a course
struct CourseIdParam<'a> {
    id: &'a str,
}

impl Validate for CourseIdParam<'_> {
    fn fields(&self) -> Vec<FieldRules<'_>> {
        vec![
            FieldRules::text("id", self.id)
                .rule(Rule::Required)
                .rule(Rule::Uuid),
        ]
    }
}

fn extract_course_id(path: Result<Path<String>, PathRejection>) -> Result<Uuid, AppError> {
    let Path(raw) = path.map_err(|rejection| AppError::bad_request(rejection.body_text()))?;
    parse_course_id(&raw)
}

fn parse_course_id(raw: &str) -> Result<Uuid, AppError> {
    let id = raw.trim();
    validate(&CourseIdParam { id })?;
    Uuid::parse_str(id)
        .map_err(|err| AppError::wrap(err, ErrorCode::Validation, "Validation failed"))
}

/// List courses, newest first
///
/// # Errors
/// `VALIDATION_ERROR` for a bad `limit` or `offset`, `DB_QUERY_ERROR` when
/// the query fails
#[utoipa::path(
    get,
    path = "/api/v1/courses",
    params(ListCoursesQuery),
    responses(
        (status = 200, description = "A page of courses", body = CourseListResponse),
        (status = 400, description = "Invalid paging parameters", body = ErrorResponse),
        (status = 500, description = "Database failure", body = ErrorResponse)
    ),
    tag = "courses"
)]
pub async fn list_courses(
    State(state): State<Arc<AppState>>,
    context: RequestContext,
    query: Result<Query<ListCoursesQuery>, QueryRejection>,
) -> ApiResult<Json<CourseListResponse>> {
    let Query(query) = query.map_err(|rejection| AppError::bad_request(rejection.body_text()))?;
    let page = query.page()?;

    debug!(
        request_id = %context.request_id(),
        limit = page.limit,
        offset = page.offset,
        "list courses"
    );

    let items = state
        .courses
        .list_courses(page)
        .await
        .map_err(|err| AppError::wrap(err, ErrorCode::DbQuery, "failed to list courses"))?;

    Ok(Json(CourseListResponse {
        items,
        limit: page.limit,
        offset: page.offset,
    }))
}

/// Fetch a single course
///
/// # Errors
/// `VALIDATION_ERROR` for a malformed id, `NOT_FOUND` when no course has it,
/// `DB_QUERY_ERROR` when the query fails
#[utoipa::path(
    get,
    path = "/api/v1/courses/{id}",
    params(("id" = String, Path, description = "Course UUID")),
    responses(
        (status = 200, description = "The course", body = mathtermind_api::models::Course),
        (status = 400, description = "Malformed id", body = ErrorResponse),
        (status = 404, description = "No such course", body = ErrorResponse),
        (status = 500, description = "Database failure", body = ErrorResponse)
    ),
    tag = "courses"
)]
pub async fn get_course(
    State(state): State<Arc<AppState>>,
    path: Result<Path<String>, PathRejection>,
) -> ApiResult<Json<mathtermind_api::models::Course>> {
    let id = extract_course_id(path)?;

    let course = state
        .courses
        .find_course(id)
        .await
        .map_err(|err| AppError::wrap(err, ErrorCode::DbQuery, "failed to get course"))?
        .ok_or_else(|| AppError::not_found("course", id.to_string()))?;

    Ok(Json(course))
}

/// List the lessons of a course in order
///
/// # Errors
/// Same as [`get_course`] for the id; `DB_QUERY_ERROR` when either query fails
#[utoipa::path(
    get,
    path = "/api/v1/courses/{id}/lessons",
    params(("id" = String, Path, description = "Course UUID")),
    responses(
        (status = 200, description = "Lessons of the course", body = LessonListResponse),
        (status = 400, description = "Malformed id", body = ErrorResponse),
        (status = 404, description = "No such course", body = ErrorResponse),
        (status = 500, description = "Database failure", body = ErrorResponse)
    ),
    tag = "courses"
)]
pub async fn list_lessons(
    State(state): State<Arc<AppState>>,
    path: Result<Path<String>, PathRejection>,
) -> ApiResult<Json<LessonListResponse>> {
    let course_id = extract_course_id(path)?;

    let exists = state
        .courses
        .find_course(course_id)
        .await
        .map_err(|err| AppError::wrap(err, ErrorCode::DbQuery, "failed to get course"))?
        .is_some();
    if !exists {
        return Err(AppError::not_found("course", course_id.to_string()).into());
    }

    let items = state
        .courses
        .list_lessons(course_id)
        .await
        .map_err(|err| AppError::wrap(err, ErrorCode::DbQuery, "failed to list lessons"))?;

    Ok(Json(LessonListResponse { items, course_id }))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn query(limit: Option<&str>, offset: Option<&str>) -> ListCoursesQuery {
        ListCoursesQuery {
            limit: limit.map(str::to_string),
            offset: offset.map(str::to_string),
        }
    }

    #[test]
    fn test_page_defaults() {
        assert_eq!(
            query(None, None).page().unwrap(),
            Page {
                limit: 20,
                offset: 0
            }
        );
        assert_eq!(query(Some(""), Some("")).page().unwrap().limit, 20);
    }

    #[test]
    fn test_page_bounds() {
        assert_eq!(query(Some("1"), None).page().unwrap().limit, 1);
        assert_eq!(query(Some("100"), None).page().unwrap().limit, 100);
        assert_eq!(query(None, Some("40")).page().unwrap().offset, 40);
        assert_eq!(
            query(None, Some("4294967296")).page().unwrap().offset,
            4_294_967_296
        );

        for bad in ["0", "101", "-5", "ten"] {
            let err = query(Some(bad), None).page().unwrap_err();
            assert_eq!(err.code(), ErrorCode::Validation);
            assert_eq!(err.message(), "invalid limit parameter");
            assert_eq!(err.details()["limit"], bad);
        }

        for bad in ["-1", "1.5", "9223372036854775808"] {
            let err = query(None, Some(bad)).page().unwrap_err();
            assert_eq!(err.message(), "invalid offset parameter");
            assert_eq!(err.details()["offset"], bad);
        }
    }

    #[test]
    fn test_course_id_must_be_a_uuid() {
        let id = Uuid::new_v4();
        assert_eq!(parse_course_id(&id.to_string()).unwrap(), id);

        let err = parse_course_id("not-a-uuid").unwrap_err();
        assert_eq!(err.code(), ErrorCode::Validation);
        assert_eq!(
            err.details()["errors"]["id"],
            "Field validation for 'id' failed on the 'uuid' rule"
        );

        let err = parse_course_id("  ").unwrap_err();
        assert_eq!(err.details()["errors"]["id"], "This field is required");
    }
}
