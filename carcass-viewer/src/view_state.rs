//! View-level state
//!
//! Client failures stop here: every load result becomes a [`ViewState`]
//! and nothing propagates past the view boundary.

use crate::client::ClientError;

/// What a view shows for one load
#[derive(Debug, Clone, PartialEq)]
pub enum ViewState<T> {
    Loading,
    Ready(T),
    /// Loaded successfully, nothing to show
    Empty,
    /// "Data not found" (not an error banner)
    NotFound,
    /// Error banner; `retryable` views offer a manual retry
    Failed { message: String, retryable: bool },
}

impl<T> ViewState<T> {
    pub fn from_result(result: Result<T, ClientError>) -> Self {
        match result {
            Ok(value) => ViewState::Ready(value),
            Err(e) => Self::from_error(&e),
        }
    }

    pub fn from_error(error: &ClientError) -> Self {
        match error {
            ClientError::NotFound(_) => ViewState::NotFound,
            ClientError::Timeout(after) => ViewState::Failed {
                message: format!(
                    "The server did not respond within {} s. Please try again.",
                    after.as_secs()
                ),
                retryable: true,
            },
            ClientError::DataUnavailable(_) => ViewState::Failed {
                message: "Failed to load data. Please try again.".to_string(),
                retryable: true,
            },
            ClientError::Config(msg) => ViewState::Failed {
                message: msg.clone(),
                retryable: false,
            },
        }
    }

    pub fn ready(&self) -> Option<&T> {
        match self {
            ViewState::Ready(value) => Some(value),
            _ => None,
        }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> ViewState<U> {
        match self {
            ViewState::Loading => ViewState::Loading,
            ViewState::Ready(value) => ViewState::Ready(f(value)),
            ViewState::Empty => ViewState::Empty,
            ViewState::NotFound => ViewState::NotFound,
            ViewState::Failed { message, retryable } => ViewState::Failed { message, retryable },
        }
    }
}

impl<T> ViewState<Vec<T>> {
    /// Like [`ViewState::from_result`], but an empty list is [`ViewState::Empty`]
    pub fn from_list(result: Result<Vec<T>, ClientError>) -> Self {
        match result {
            Ok(items) if items.is_empty() => ViewState::Empty,
            other => Self::from_result(other),
        }
    }
}

/// Server connectivity, driven only by health checks
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConnectivityBanner {
    /// No check has completed yet
    Unknown,
    Online,
    Offline(String),
}

impl ConnectivityBanner {
    pub fn from_health<T>(result: &Result<T, ClientError>) -> Self {
        match result {
            Ok(_) => ConnectivityBanner::Online,
            Err(e) => ConnectivityBanner::Offline(e.to_string()),
        }
    }
}
