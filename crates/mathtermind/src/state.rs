//! Application state shared across HTTP handlers

use std::sync::Arc;

use mathtermind_db::CourseRepository;

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    /// Course catalogue access
    pub courses: Arc<dyn CourseRepository>,
}

impl AppState {
    /// Create new application state
    pub fn new(courses: Arc<dyn CourseRepository>) -> Self {
        Self { courses }
    }
}
