//! HTTP API for image recognition and cat-image judging
//!
//! ## Endpoints
//!
//! - `GET /api/v1/health` - Health check
//! - `POST /api/v1/images/recognition` - Stage a base64 image and return its labels
//! - `POST /api/v1/images/faces` - Detect faces in a base64 image
//! - `POST /api/v1/images/judge` - Classify a stored image without moving it

use axum::Router;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

pub mod error;
mod routes;
pub mod state;

pub use axum;
pub use state::{ApiState, AppState};

pub fn construct_router(state: AppState) -> Router {
    let router = Router::new()
        .nest("/health", routes::health::routes())
        .nest("/images", routes::images::routes())
        .with_state(state)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http());

    Router::new().nest("/api/v1", router)
}
