//! carcass-viewer library - client side of the carcass grading viewer
//!
//! Talks to carcass-server over HTTP and turns the responses into
//! display-ready views:
//! - [`list_view`]: sortable, searchable record table
//! - [`detail_view`]: one record grouped by topic, plus its images
//! - [`gallery`]: per-category image loading state machine
//! - [`refresh`]: recurring background tasks with cancellation handles

pub mod client;
pub mod detail_view;
pub mod gallery;
pub mod list_view;
pub mod refresh;
pub mod render;
pub mod view_state;

pub use client::{ApiClient, ClientError, HealthStatus};
pub use view_state::{ConnectivityBanner, ViewState};
