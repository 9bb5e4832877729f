//! Web API module for filevault.
//!
//! This module provides the HTTP surface: session exchange, the file
//! hierarchy endpoints, health checks and the OpenAPI document.

pub mod dto;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod router;
pub mod server;

pub use error::ApiError;
pub use handlers::AppState;
pub use router::{create_router, create_swagger_router, ApiDoc};
pub use server::WebServer;
