//! HTTP router configuration

use std::sync::Arc;
use std::time::Duration;

use axum::{
    Router,
    http::{Method, StatusCode, header},
    middleware::from_fn,
    routing::get,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::timeout::TimeoutLayer;
use utoipa::OpenApi;
use utoipa_scalar::{Scalar, Servable};

use crate::api::doc::ApiDoc;
use crate::api::{courses, system};
use crate::middleware::{REQUEST_ID_HEADER, error_boundary};
use crate::state::AppState;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Create the application router
pub fn create_router(state: Arc<AppState>) -> Router {
    let api = Router::new()
        .route("/courses", get(courses::list_courses))
        .route("/courses/{id}", get(courses::get_course))
        .route("/courses/{id}/lessons", get(courses::list_lessons));

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE, Method::OPTIONS])
        .allow_headers([
            header::ACCEPT,
            header::AUTHORIZATION,
            header::CONTENT_TYPE,
            REQUEST_ID_HEADER,
        ])
        .expose_headers([REQUEST_ID_HEADER])
        .max_age(Duration::from_secs(300));

    Router::new()
        // System endpoints
        .route("/health", get(system::health))
        // Versioned API
        .nest("/api/v1", api)
        // Interactive reference
        .merge(Scalar::with_url("/docs", ApiDoc::openapi()))
        .method_not_allowed_fallback(system::method_not_allowed)
        .fallback(system::fallback)
        .with_state(state)
        // Outermost last: the error boundary sees everything below it
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            REQUEST_TIMEOUT,
        ))
        .layer(cors)
        .layer(from_fn(error_boundary))
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use async_trait::async_trait;
    use axum::{
        body::{Body, to_bytes},
        http::Request,
        response::Response,
    };
    use chrono::{TimeZone, Utc};
    use mathtermind_api::models::{Course, Lesson};
    use mathtermind_db::{CourseRepository, DatabaseError, Page};
    use serde_json::{Value, json};
    use tower::ServiceExt;
    use uuid::Uuid;

    use super::*;

    #[derive(Default)]
    struct MockCourses {
        courses: Vec<Course>,
        lessons: Vec<Lesson>,
        fail: bool,
        pages: Mutex<Vec<Page>>,
    }

    impl MockCourses {
        fn failing() -> Self {
            Self {
                fail: true,
                ..Self::default()
            }
        }

        fn check(&self) -> mathtermind_db::Result<()> {
            if self.fail {
                Err(DatabaseError::Sqlx(sqlx::Error::PoolTimedOut))
            } else {
                Ok(())
            }
        }
    }

    #[async_trait]
    impl CourseRepository for MockCourses {
        async fn list_courses(&self, page: Page) -> mathtermind_db::Result<Vec<Course>> {
            self.check()?;
            self.pages.lock().unwrap().push(page);
            Ok(self
                .courses
                .iter()
                .skip(usize::try_from(page.offset).unwrap_or(usize::MAX))
                .take(page.limit as usize)
                .cloned()
                .collect())
        }

        async fn find_course(&self, id: Uuid) -> mathtermind_db::Result<Option<Course>> {
            self.check()?;
            Ok(self.courses.iter().find(|c| c.id == id).cloned())
        }

        async fn list_lessons(&self, course_id: Uuid) -> mathtermind_db::Result<Vec<Lesson>> {
            self.check()?;
            Ok(self
                .lessons
                .iter()
                .filter(|l| l.course_id == course_id)
                .cloned()
                .collect())
        }
    }

    fn course(name: &str) -> Course {
        let at = Utc.with_ymd_and_hms(2024, 9, 1, 8, 0, 0).unwrap();
        Course {
            id: Uuid::new_v4(),
            topic: "algebra".to_string(),
            name: name.to_string(),
            description: String::new(),
            duration_min: 90,
            created_at: at,
            updated_at: at,
        }
    }

    fn lesson(course_id: Uuid, order: i32) -> Lesson {
        let at = Utc.with_ymd_and_hms(2024, 9, 1, 8, 0, 0).unwrap();
        Lesson {
            id: Uuid::new_v4(),
            course_id,
            title: format!("Lesson {order}"),
            lesson_order: order,
            estimated_time_min: 15,
            points_reward: 10,
            created_at: at,
            updated_at: at,
        }
    }

    fn app(repo: MockCourses) -> Router {
        create_router(Arc::new(AppState::new(Arc::new(repo))))
    }

    async fn send(router: Router, uri: &str) -> Response {
        router
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap()
    }

    async fn json_body(response: Response) -> Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_health_is_plain_ok_with_request_id() {
        let response = send(app(MockCourses::default()), "/health").await;
        assert_eq!(response.status(), StatusCode::OK);
        assert!(response.headers().contains_key(REQUEST_ID_HEADER));

        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        assert_eq!(&bytes[..], b"OK");
    }

    #[tokio::test]
    async fn test_list_courses_uses_default_page() {
        let repo = MockCourses {
            courses: vec![course("Fractions"), course("Equations")],
            ..MockCourses::default()
        };
        let response = send(app(repo), "/api/v1/courses").await;
        assert_eq!(response.status(), StatusCode::OK);

        let body = json_body(response).await;
        assert_eq!(body["limit"], 20);
        assert_eq!(body["offset"], 0);
        assert_eq!(body["items"].as_array().unwrap().len(), 2);
        assert_eq!(body["items"][0]["name"], "Fractions");
    }

    #[tokio::test]
    async fn test_list_courses_passes_page_to_repository() {
        let repo = Arc::new(MockCourses {
            courses: vec![course("A"), course("B"), course("C")],
            ..MockCourses::default()
        });
        let router = create_router(Arc::new(AppState::new(repo.clone())));

        let body = json_body(send(router, "/api/v1/courses?limit=1&offset=2").await).await;
        assert_eq!(body["items"][0]["name"], "C");
        assert_eq!(
            *repo.pages.lock().unwrap(),
            vec![Page {
                limit: 1,
                offset: 2
            }]
        );
    }

    #[tokio::test]
    async fn test_list_courses_rejects_zero_limit() {
        let response = send(app(MockCourses::default()), "/api/v1/courses?limit=0").await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            json_body(response).await,
            json!({"error": {
                "code": "VALIDATION_ERROR",
                "message": "invalid limit parameter",
                "details": {"limit": "0"}
            }})
        );
    }

    #[tokio::test]
    async fn test_list_courses_rejects_bad_offset() {
        let response = send(app(MockCourses::default()), "/api/v1/courses?offset=abc").await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body = json_body(response).await;
        assert_eq!(body["error"]["message"], "invalid offset parameter");
        assert_eq!(body["error"]["details"]["offset"], "abc");
    }

    #[tokio::test]
    async fn test_list_courses_accepts_offset_beyond_32_bits() {
        let repo = Arc::new(MockCourses::default());
        let router = create_router(Arc::new(AppState::new(repo.clone())));

        let response = send(router, "/api/v1/courses?offset=4294967296").await;
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(json_body(response).await["offset"], 4_294_967_296_i64);
        assert_eq!(
            *repo.pages.lock().unwrap(),
            vec![Page {
                limit: 20,
                offset: 4_294_967_296
            }]
        );
    }

    #[tokio::test]
    async fn test_list_courses_database_failure_hides_cause() {
        let response = send(app(MockCourses::failing()), "/api/v1/courses").await;
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            json_body(response).await,
            json!({"error": {"code": "DB_QUERY_ERROR", "message": "failed to list courses"}})
        );
    }

    #[tokio::test]
    async fn test_get_course_invalid_id_is_400() {
        let response = send(app(MockCourses::default()), "/api/v1/courses/42").await;
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);

        let body = json_body(response).await;
        assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
        assert_eq!(body["error"]["message"], "Validation failed");
        assert_eq!(
            body["error"]["details"]["errors"]["id"],
            "Field validation for 'id' failed on the 'uuid' rule"
        );
    }

    #[tokio::test]
    async fn test_undecodable_course_id_uses_error_envelope() {
        for uri in ["/api/v1/courses/%FF", "/api/v1/courses/%FF/lessons"] {
            let response = send(app(MockCourses::default()), uri).await;
            assert_eq!(response.status(), StatusCode::BAD_REQUEST, "{uri}");
            assert_eq!(response.headers()[header::CONTENT_TYPE], "application/json");

            let body = json_body(response).await;
            assert_eq!(body["error"]["code"], "VALIDATION_ERROR");
            assert!(
                body["error"]["message"]
                    .as_str()
                    .unwrap()
                    .contains("Invalid UTF-8"),
                "{body}"
            );
        }
    }

    #[tokio::test]
    async fn test_get_course_missing_is_404() {
        let id = Uuid::new_v4();
        let response = send(app(MockCourses::default()), &format!("/api/v1/courses/{id}")).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(
            json_body(response).await,
            json!({"error": {
                "code": "NOT_FOUND",
                "message": "Resource not found",
                "details": {"resource": "course", "id": id.to_string()}
            }})
        );
    }

    #[tokio::test]
    async fn test_get_course_found_is_200() {
        let wanted = course("Geometry");
        let id = wanted.id;
        let repo = MockCourses {
            courses: vec![course("Other"), wanted],
            ..MockCourses::default()
        };

        let response = send(app(repo), &format!("/api/v1/courses/{id}")).await;
        assert_eq!(response.status(), StatusCode::OK);

        let body = json_body(response).await;
        assert_eq!(body["id"], id.to_string());
        assert_eq!(body["name"], "Geometry");
    }

    #[tokio::test]
    async fn test_list_lessons_of_course() {
        let owner = course("Fractions");
        let id = owner.id;
        let repo = MockCourses {
            lessons: vec![lesson(id, 1), lesson(Uuid::new_v4(), 1), lesson(id, 2)],
            courses: vec![owner],
            ..MockCourses::default()
        };

        let response = send(app(repo), &format!("/api/v1/courses/{id}/lessons")).await;
        assert_eq!(response.status(), StatusCode::OK);

        let body = json_body(response).await;
        assert_eq!(body["course_id"], id.to_string());
        let orders: Vec<i64> = body["items"]
            .as_array()
            .unwrap()
            .iter()
            .map(|l| l["lesson_order"].as_i64().unwrap())
            .collect();
        assert_eq!(orders, vec![1, 2]);
    }

    #[tokio::test]
    async fn test_list_lessons_of_missing_course_is_404() {
        let uri = format!("/api/v1/courses/{}/lessons", Uuid::new_v4());
        let response = send(app(MockCourses::default()), &uri).await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(json_body(response).await["error"]["details"]["resource"], "course");
    }

    #[tokio::test]
    async fn test_unknown_route_is_json_404() {
        let response = send(app(MockCourses::default()), "/api/v2/nothing").await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert!(response.headers().contains_key(REQUEST_ID_HEADER));
        assert_eq!(
            json_body(response).await,
            json!({"error": {
                "code": "NOT_FOUND",
                "message": "Resource not found",
                "details": {"resource": "route", "id": "/api/v2/nothing"}
            }})
        );
    }

    #[tokio::test]
    async fn test_wrong_method_uses_error_envelope() {
        let response = app(MockCourses::default())
            .oneshot(
                Request::builder()
                    .method(Method::DELETE)
                    .uri("/api/v1/courses")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
        assert!(response.headers().contains_key(REQUEST_ID_HEADER));
        assert_eq!(
            json_body(response).await,
            json!({"error": {
                "code": "VALIDATION_ERROR",
                "message": "Method not allowed",
                "details": {"method": "DELETE", "path": "/api/v1/courses"}
            }})
        );
    }

    #[tokio::test]
    async fn test_docs_are_served() {
        let response = send(app(MockCourses::default()), "/docs").await;
        assert_eq!(response.status(), StatusCode::OK);
    }
}
