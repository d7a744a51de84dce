//! # Carcass Common Library
//!
//! Shared code for the carcass grading viewer:
//! - Record model and the static field tables (pairing, detail groups)
//! - Legacy vs predict comparison rules
//! - Image resolution on disk and fallback naming
//! - Bootstrap configuration loading
//! - Common error type

pub mod compare;
pub mod config;
pub mod error;
pub mod fields;
pub mod images;
pub mod models;

pub use compare::{difference, is_different, Delta, DeltaSign};
pub use error::{Error, Result};
pub use fields::{Field, FieldValue};
pub use images::{ImageAvailability, ImageCategory, ImageRoots};
pub use models::CarcassRecord;
