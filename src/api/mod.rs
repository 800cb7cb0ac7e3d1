//! REST API for feedback submission and review

pub mod feedback_routes;

pub use feedback_routes::{cors_layer, create_router, AppState};
