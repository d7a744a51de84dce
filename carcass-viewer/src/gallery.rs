//! Image gallery: one loading state machine per image category
//!
//! ```text
//! Unavailable                       (server reported no file)
//! Loading(src) ──load ok──▶ Loaded(src)
//!      │
//!   load error ──▶ FailedRetrying(alt) ──load ok──▶ Loaded(alt)
//!      │                    │
//!      │               load error
//!      ▼                    ▼
//!    Failed ◀───────────────┘        (no alternate name left)
//! ```
//!
//! At most one retry is made, using the first alternate name from the
//! older dataset naming convention.

use async_trait::async_trait;
use carcass_common::{ImageAvailability, ImageCategory};
use futures::future::join_all;
use tracing::debug;

/// Attempts per category: the reported path plus one retry
const MAX_ATTEMPTS: usize = 2;

/// Fetches an image by URL path; `true` when the bytes arrived
#[async_trait]
pub trait ImageLoader: Send + Sync {
    async fn load(&self, url_path: &str) -> bool;
}

/// Loading state of one image
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImageLoadState {
    Loading(String),
    Loaded(String),
    /// No image for this category (placeholder card)
    Unavailable,
    /// First source failed; retrying with the alternate name
    FailedRetrying(String),
    /// Every source failed ("load failed" placeholder, distinct from unavailable)
    Failed,
}

/// One gallery card
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageSlot {
    pub category: ImageCategory,
    /// URL paths to try, in order
    sources: Vec<String>,
    state: ImageLoadState,
}

impl ImageSlot {
    pub fn new(category: ImageCategory, carcass_id: &str, availability: &ImageAvailability) -> Self {
        if !availability.is_available(category) {
            return Self {
                category,
                sources: Vec::new(),
                state: ImageLoadState::Unavailable,
            };
        }

        let sources: Vec<String> = availability
            .path(category)
            .map(str::to_string)
            .into_iter()
            .chain(category.fallback_names(carcass_id))
            .take(MAX_ATTEMPTS)
            .map(|file| category.url_path(&file))
            .collect();

        let state = match sources.first() {
            Some(first) => ImageLoadState::Loading(first.clone()),
            None => ImageLoadState::Failed,
        };
        Self {
            category,
            sources,
            state,
        }
    }

    pub fn state(&self) -> &ImageLoadState {
        &self.state
    }

    /// Source currently being fetched, if any
    pub fn pending_source(&self) -> Option<&str> {
        match &self.state {
            ImageLoadState::Loading(src) | ImageLoadState::FailedRetrying(src) => Some(src),
            _ => None,
        }
    }

    pub fn is_settled(&self) -> bool {
        self.pending_source().is_none()
    }

    /// The pending source loaded
    pub fn on_load(&mut self) {
        if let ImageLoadState::Loading(src) | ImageLoadState::FailedRetrying(src) = &self.state {
            self.state = ImageLoadState::Loaded(src.clone());
        }
    }

    /// The pending source failed to load
    pub fn on_error(&mut self) {
        self.state = match &self.state {
            ImageLoadState::Loading(_) => match self.sources.get(1) {
                Some(alternate) => ImageLoadState::FailedRetrying(alternate.clone()),
                None => ImageLoadState::Failed,
            },
            ImageLoadState::FailedRetrying(_) => ImageLoadState::Failed,
            settled => settled.clone(),
        };
    }

    /// Drive this slot until it settles
    pub async fn load_with<L: ImageLoader + ?Sized>(&mut self, loader: &L) {
        while let Some(src) = self.pending_source().map(str::to_string) {
            if loader.load(&src).await {
                self.on_load();
            } else {
                debug!("{} image failed to load from {}", self.category.key(), src);
                self.on_error();
            }
        }
    }
}

/// The three image cards of a detail view
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Gallery {
    pub carcass_id: String,
    pub slots: Vec<ImageSlot>,
}

impl Gallery {
    pub fn new(carcass_id: &str, availability: &ImageAvailability) -> Self {
        Self {
            carcass_id: carcass_id.to_string(),
            slots: ImageCategory::ALL
                .iter()
                .map(|&category| ImageSlot::new(category, carcass_id, availability))
                .collect(),
        }
    }

    pub fn slot(&self, category: ImageCategory) -> Option<&ImageSlot> {
        self.slots.iter().find(|s| s.category == category)
    }

    /// Load every category concurrently
    pub async fn load_all<L: ImageLoader + ?Sized>(&mut self, loader: &L) {
        join_all(self.slots.iter_mut().map(|slot| slot.load_with(loader))).await;
    }
}
