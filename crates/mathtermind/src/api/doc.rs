//! OpenAPI document served at `/docs`

use mathtermind_api::models::{Course, Lesson};
use mathtermind_api::responses::{CourseListResponse, LessonListResponse};
use mathtermind_api::{ErrorBody, ErrorCode, ErrorResponse};
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Mathtermind API",
        version = "0.1",
        description = "Read access to the Mathtermind course catalogue."
    ),
    paths(
        crate::api::system::health,
        crate::api::courses::list_courses,
        crate::api::courses::get_course,
        crate::api::courses::list_lessons,
    ),
    components(schemas(
        Course,
        Lesson,
        CourseListResponse,
        LessonListResponse,
        ErrorCode,
        ErrorBody,
        ErrorResponse,
    )),
    tags(
        (name = "courses", description = "Course catalogue"),
        (name = "system", description = "Operational endpoints")
    )
)]
pub struct ApiDoc;
