//! Build identification, served at /api/buildinfo and logged at startup

use std::fmt;

use axum::response::Json;
use serde::Serialize;

/// Compile-time identification of the running server binary
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BuildInfo {
    pub service: &'static str,
    pub version: &'static str,
    pub git_hash: &'static str,
    pub build_timestamp: &'static str,
    pub build_profile: &'static str,
}

impl BuildInfo {
    /// Values stamped by build.rs
    pub const fn current() -> Self {
        Self {
            service: env!("CARGO_PKG_NAME"),
            version: env!("CARGO_PKG_VERSION"),
            git_hash: env!("GIT_HASH"),
            build_timestamp: env!("BUILD_TIMESTAMP"),
            build_profile: env!("BUILD_PROFILE"),
        }
    }
}

impl fmt::Display for BuildInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} v{} [{}] built {} ({})",
            self.service, self.version, self.git_hash, self.build_timestamp, self.build_profile
        )
    }
}

/// GET /api/buildinfo
pub async fn get_build_info() -> Json<BuildInfo> {
    Json(BuildInfo::current())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_names_service_and_version() {
        let info = BuildInfo {
            service: "carcass-server",
            version: "1.2.3",
            git_hash: "abcd1234",
            build_timestamp: "2024-05-01T10:00:00Z",
            build_profile: "release",
        };
        assert_eq!(
            info.to_string(),
            "carcass-server v1.2.3 [abcd1234] built 2024-05-01T10:00:00Z (release)"
        );
    }

    #[test]
    fn test_current_is_stamped() {
        let info = BuildInfo::current();
        assert_eq!(info.service, "carcass-server");
        assert_eq!(info.version, env!("CARGO_PKG_VERSION"));
        assert!(!info.git_hash.is_empty());
        assert!(chrono::DateTime::parse_from_rfc3339(info.build_timestamp).is_ok());
    }
}
