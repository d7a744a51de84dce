//! Test fixtures: a temporary record store served by a live carcass-server

#![allow(dead_code)]

use carcass_server::{build_router, db, AppState};
use sqlx::SqlitePool;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use tokio::net::TcpListener;

/// Temporary database + images root; removed on drop
pub struct Fixture {
    pub dir: TempDir,
    pub db_path: PathBuf,
    pub images_dir: PathBuf,
}

const CREATE_TABLE: &str = r#"
CREATE TABLE carcass_analysis (
    carcass_id INTEGER PRIMARY KEY,
    weight_legacy REAL,
    rea_legacy REAL,
    rea_predict REAL,
    reheight_mm_legacy REAL,
    rebroad_mm_legacy REAL,
    main_axis_length_predict REAL,
    perpendicular_axis_length_predict REAL,
    yieldgrade_legacy REAL,
    yieldgrade_legacy_grade TEXT,
    yieldgrade_predict REAL,
    yieldgrade_predict_grade TEXT,
    adjpyg_legacy REAL,
    adjpyg_predict REAL,
    actualpyg_legacy REAL,
    actualpyg_predict REAL,
    marbling_legacy REAL,
    marbling_legacy_grade TEXT,
    marbling_legacy_quality TEXT,
    marbling_predict REAL,
    marbling_predict_grade TEXT,
    marbling_predict_quality TEXT
)
"#;

/// Build a store with three carcasses (ids 101, 102, 103)
pub async fn setup_fixture() -> Fixture {
    let dir = TempDir::new().expect("Should create temp dir");
    let db_path = dir.path().join("marbling.db");
    let images_dir = dir.path().join("images");

    let url = format!("sqlite://{}?mode=rwc", db_path.display());
    let writer = SqlitePool::connect(&url).await.expect("Should create database");
    sqlx::query(CREATE_TABLE).execute(&writer).await.unwrap();
    sqlx::query(
        "INSERT INTO carcass_analysis
            (carcass_id, weight_legacy, rea_legacy, rea_predict,
             marbling_legacy, marbling_legacy_grade, marbling_legacy_quality,
             marbling_predict, marbling_predict_grade, marbling_predict_quality,
             yieldgrade_legacy, yieldgrade_legacy_grade)
         VALUES
            (101, 342.5, 82.0, 84.1, 450, 'Choice', 'Average', 495, 'Choice', 'High', 2.8, 'YG3'),
            (102, NULL, 75.5, 75.7, 380, 'Select', 'Low', 380, 'Select', 'Low', NULL, NULL),
            (103, 298, NULL, 71.2, NULL, NULL, NULL, 510, 'Prime', 'Low', 3.1, 'YG3')",
    )
    .execute(&writer)
    .await
    .unwrap();
    writer.close().await;

    for sub in ["original_images", "legacy_images", "processed_images"] {
        fs::create_dir_all(images_dir.join(sub)).unwrap();
    }

    Fixture {
        dir,
        db_path,
        images_dir,
    }
}

/// Drop a placeholder image file into a category directory
pub fn write_image(images_dir: &Path, category_dir: &str, file_name: &str) {
    fs::write(images_dir.join(category_dir).join(file_name), b"\x89PNG fixture").unwrap();
}

/// A zero-byte file: reported as present, fails to load
pub fn write_empty_image(images_dir: &Path, category_dir: &str, file_name: &str) {
    fs::write(images_dir.join(category_dir).join(file_name), b"").unwrap();
}

/// Serve the fixture on an ephemeral port; returns the API base URL
pub async fn spawn_server(fixture: &Fixture) -> String {
    let pool = db::connect_readonly(&fixture.db_path)
        .await
        .expect("Should connect to test database");
    let app = build_router(AppState::new(pool, fixture.images_dir.clone()));

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{}/api", addr)
}

/// A listener that accepts connections and never answers
pub async fn spawn_silent_server() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        let mut held = Vec::new();
        while let Ok((socket, _)) = listener.accept().await {
            held.push(socket);
        }
    });
    format!("http://{}/api", addr)
}

/// An address nothing is listening on
pub async fn closed_address() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{}/api", addr)
}
