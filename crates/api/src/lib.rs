//! HTTP API layer for fedigram.
//!
//! - **Endpoints**: registration, deck views, media, statuses, profiles,
//!   filters, settings and the admin mod log
//! - **Extractors**: bearer-token authentication
//! - **Views**: server-rendered HTML pages
//!
//! Built on Axum 0.8 with Tower middleware stack.

pub mod endpoints;
pub mod extractors;
pub mod middleware;
pub mod response;
pub mod views;

pub use endpoints::{api_router, web_router};
pub use middleware::{AppState, auth_middleware};
