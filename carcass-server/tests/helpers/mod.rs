//! Test fixtures: a temporary record store and image tree

#![allow(dead_code)]

use axum::body::Body;
use axum::http::Request;
use serde_json::Value;
use sqlx::SqlitePool;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

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
    setup_fixture_with_id_column("INTEGER PRIMARY KEY").await
}

/// Same rows, with `carcass_id` declared as `id_column`
pub async fn setup_fixture_with_id_column(id_column: &str) -> Fixture {
    let dir = TempDir::new().expect("Should create temp dir");
    let db_path = dir.path().join("marbling.db");
    let images_dir = dir.path().join("images");

    let url = format!("sqlite://{}?mode=rwc", db_path.display());
    let writer = SqlitePool::connect(&url).await.expect("Should create database");
    let create = CREATE_TABLE.replace(
        "carcass_id INTEGER PRIMARY KEY",
        &format!("carcass_id {}", id_column),
    );
    sqlx::query(&create).execute(&writer).await.unwrap();
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

/// GET request with empty body
pub fn get(uri: &str) -> Request<Body> {
    Request::builder()
        .method("GET")
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

/// Extract JSON body from response
pub async fn extract_json(body: Body) -> Value {
    let bytes = axum::body::to_bytes(body, usize::MAX)
        .await
        .expect("Should read body");
    serde_json::from_slice(&bytes).expect("Should parse JSON")
}
