//! HTTP form interface
//!
//! A single page with query, debug and visualize panels, backed by a small
//! JSON API. Handlers only translate JSON to [`crate::Dispatcher`] calls.

pub mod error;
pub mod handlers;
pub mod middleware;
pub mod models;
pub mod response;
pub mod routes;

pub use error::{ApiError, ApiErrorResponse, ApiResult};
pub use response::SuccessResponse;
pub use routes::{create_router, AppState};
