//! mathtermind-api: Shared API types and schemas
//!
//! Contains the error envelope, the relational data-transfer records and the
//! list responses served by the daemon.

pub mod errors;
pub mod models;
pub mod responses;

pub use errors::{ErrorBody, ErrorCode, ErrorResponse};
