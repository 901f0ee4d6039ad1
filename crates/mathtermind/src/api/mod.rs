//! API route handlers

pub mod courses;
pub mod doc;
pub mod error;
pub mod system;
