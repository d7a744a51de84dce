//! carcass-server library - read-only HTTP API over the carcass store
//!
//! Serves records from `carcass_analysis`, per-record image availability,
//! and the image files themselves.

use std::path::PathBuf;

use axum::Router;
use carcass_common::ImageRoots;
use sqlx::SqlitePool;
use tower_http::cors::CorsLayer;
use tower_http::services::{ServeDir, ServeFile};
use tower_http::trace::TraceLayer;

pub mod api;
pub mod db;

/// Application state shared across HTTP handlers
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool (read-only)
    pub db: SqlitePool,
    /// Root containing one directory per image category
    pub images_dir: PathBuf,
    /// Category directories derived from `images_dir`
    pub image_roots: ImageRoots,
    /// Built front-end, served at `/` when present
    pub static_dir: Option<PathBuf>,
}

impl AppState {
    /// Create new application state
    pub fn new(db: SqlitePool, images_dir: PathBuf) -> Self {
        let image_roots = ImageRoots::under(&images_dir);
        Self {
            db,
            images_dir,
            image_roots,
            static_dir: None,
        }
    }

    /// Serve a built front-end from `dir`
    pub fn with_static_dir(mut self, dir: PathBuf) -> Self {
        self.static_dir = Some(dir);
        self
    }
}

/// Build application router
pub fn build_router(state: AppState) -> Router {
    use axum::routing::get;

    let images = ServeDir::new(&state.images_dir);
    let static_dir = state.static_dir.clone();

    let router = Router::new()
        .route("/api/carcass", get(api::list_carcasses))
        .route("/api/carcass/:id", get(api::get_carcass))
        .route("/api/check-images/:id", get(api::check_images))
        .route("/api/buildinfo", get(api::get_build_info))
        .merge(api::health_routes())
        .nest_service("/images", images)
        .with_state(state);

    // Client-side routes fall back to index.html
    let router = match static_dir {
        Some(dir) => {
            let index = ServeFile::new(dir.join("index.html"));
            router.fallback_service(ServeDir::new(dir).not_found_service(index))
        }
        None => router,
    };

    router
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}
