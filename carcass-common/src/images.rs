//! Image resolution
//!
//! Each carcass has up to three pre-rendered images, one per
//! [`ImageCategory`], stored as `{id}{ext}` under the category directory.
//! Resolution tries extensions in [`IMAGE_EXTENSIONS`] order and takes the
//! first hit. Nothing is cached: every call hits the filesystem.
//!
//! A missing file is a normal outcome (`exists == false`). Any other I/O
//! error (permission denied, name too long, ...) is returned to the caller.

use std::io;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{Error, Result};

/// Extension lookup order; earlier entries win when several files exist
pub const IMAGE_EXTENSIONS: [&str; 5] = [".png", ".jpg", ".jpeg", ".bmp", ".webp"];

/// Image kinds shown for each carcass
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageCategory {
    /// Unprocessed photo
    Raw,
    /// Legacy analysis overlay
    Orig,
    /// New analysis overlay
    New,
}

impl ImageCategory {
    pub const ALL: [ImageCategory; 3] = [ImageCategory::Raw, ImageCategory::Orig, ImageCategory::New];

    /// Directory name under the images root (also the URL segment)
    pub fn dir_name(self) -> &'static str {
        match self {
            ImageCategory::Raw => "original_images",
            ImageCategory::Orig => "legacy_images",
            ImageCategory::New => "processed_images",
        }
    }

    pub fn key(self) -> &'static str {
        match self {
            ImageCategory::Raw => "raw",
            ImageCategory::Orig => "orig",
            ImageCategory::New => "new",
        }
    }

    pub fn title(self) -> &'static str {
        match self {
            ImageCategory::Raw => "Source image",
            ImageCategory::Orig => "Legacy analysis",
            ImageCategory::New => "New analysis",
        }
    }

    /// Alternate file names from the older dataset naming convention
    ///
    /// Raw and legacy images were exported as `0000{id}-{n}{letter}.jpg`
    /// with two numbered candidates. Processed images have a single
    /// `processed_{id}.jpg` name.
    pub fn fallback_names(self, id: &str) -> Vec<String> {
        match self {
            ImageCategory::Raw => vec![
                format!("0000{}-1c.jpg", id),
                format!("0000{}-2c.jpg", id),
            ],
            ImageCategory::Orig => vec![
                format!("0000{}-1s.jpg", id),
                format!("0000{}-2s.jpg", id),
            ],
            ImageCategory::New => vec![format!("processed_{}.jpg", id)],
        }
    }

    /// Public URL path for a file of this category
    pub fn url_path(self, file_name: &str) -> String {
        format!("/images/{}/{}", self.dir_name(), file_name)
    }
}

/// Directory for each image category
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageRoots {
    pub raw: PathBuf,
    pub orig: PathBuf,
    pub new: PathBuf,
}

impl ImageRoots {
    /// Standard layout: one subdirectory per category under `images_root`
    pub fn under(images_root: &Path) -> Self {
        Self {
            raw: images_root.join(ImageCategory::Raw.dir_name()),
            orig: images_root.join(ImageCategory::Orig.dir_name()),
            new: images_root.join(ImageCategory::New.dir_name()),
        }
    }

    pub fn dir(&self, category: ImageCategory) -> &Path {
        match category {
            ImageCategory::Raw => &self.raw,
            ImageCategory::Orig => &self.orig,
            ImageCategory::New => &self.new,
        }
    }
}

/// Result of looking up one category
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ImageLookup {
    pub exists: bool,
    /// File name relative to the category directory
    pub path: Option<String>,
}

/// Resolved file name per category
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImagePaths {
    pub raw: Option<String>,
    pub orig: Option<String>,
    pub new: Option<String>,
}

/// Which images exist for one carcass (wire shape of `/api/check-images/:id`)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageAvailability {
    pub raw: bool,
    pub orig: bool,
    pub new: bool,
    #[serde(default)]
    pub paths: ImagePaths,
}

impl ImageAvailability {
    pub fn is_available(&self, category: ImageCategory) -> bool {
        match category {
            ImageCategory::Raw => self.raw,
            ImageCategory::Orig => self.orig,
            ImageCategory::New => self.new,
        }
    }

    pub fn path(&self, category: ImageCategory) -> Option<&str> {
        match category {
            ImageCategory::Raw => self.paths.raw.as_deref(),
            ImageCategory::Orig => self.paths.orig.as_deref(),
            ImageCategory::New => self.paths.new.as_deref(),
        }
    }

    fn set(&mut self, category: ImageCategory, found: ImageLookup) {
        let (flag, path) = match category {
            ImageCategory::Raw => (&mut self.raw, &mut self.paths.raw),
            ImageCategory::Orig => (&mut self.orig, &mut self.paths.orig),
            ImageCategory::New => (&mut self.new, &mut self.paths.new),
        };
        *flag = found.exists;
        *path = found.path;
    }
}

/// Reject identifiers that would escape the category directory
pub fn validate_image_id(id: &str) -> Result<()> {
    let unsafe_id = id.is_empty()
        || id == "."
        || id.contains("..")
        || id.contains('/')
        || id.contains('\\')
        || id.contains('\0');
    if unsafe_id {
        return Err(Error::InvalidInput(format!("Invalid carcass id for image lookup: {:?}", id)));
    }
    Ok(())
}

/// Look in `dir` for `{id}{ext}` in extension priority order
pub fn find_image(id: &str, dir: &Path) -> io::Result<ImageLookup> {
    for ext in IMAGE_EXTENSIONS {
        let file_name = format!("{}{}", id, ext);
        let candidate = dir.join(&file_name);
        debug!("Checking path: {}", candidate.display());

        match std::fs::metadata(&candidate) {
            Ok(meta) if meta.is_file() => {
                return Ok(ImageLookup {
                    exists: true,
                    path: Some(file_name),
                });
            }
            Ok(_) => continue,
            Err(e) if e.kind() == io::ErrorKind::NotFound => continue,
            // A missing category directory reports NotFound above; anything
            // else is a real filesystem failure.
            Err(e) => return Err(e),
        }
    }

    Ok(ImageLookup {
        exists: false,
        path: None,
    })
}

/// Resolve all three categories for one carcass
pub fn resolve(id: &str, roots: &ImageRoots) -> Result<ImageAvailability> {
    validate_image_id(id)?;

    let mut availability = ImageAvailability::default();
    for category in ImageCategory::ALL {
        let found = find_image(id, roots.dir(category))?;
        availability.set(category, found);
    }

    debug!(
        carcass_id = id,
        raw = availability.raw,
        orig = availability.orig,
        new = availability.new,
        "Image availability resolved"
    );
    Ok(availability)
}
