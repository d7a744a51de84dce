//! HTTP API handlers for carcass-server

pub mod buildinfo;
pub mod carcass;
pub mod error;
pub mod health;
pub mod images;

pub use buildinfo::{get_build_info, BuildInfo};
pub use carcass::{get_carcass, list_carcasses};
pub use error::ApiError;
pub use health::health_routes;
pub use images::check_images;
