//! Serializable style profile for import and export.
//!
//! A [`StyleProfile`] captures everything needed to reproduce an icon's look
//! in another session: the [`Styles`] value plus the export settings.
//!
//! # Example
//!
//! ```
//! use icon_styler::{StyleProfile, Styles};
//!
//! let profile = StyleProfile::new(Styles::default()).with_image_size(256);
//! let json = profile.to_json().unwrap();
//!
//! let restored = StyleProfile::from_json(&json).unwrap();
//! assert_eq!(restored.image_size, 256);
//! ```

use serde::{Deserialize, Serialize};

use crate::error::ProfileError;
use crate::style::Styles;

/// Format version written by this crate.
pub const PROFILE_VERSION: u32 = 1;

/// Export size used when a profile does not set one.
pub const DEFAULT_IMAGE_SIZE: u32 = 128;

/// A serializable snapshot of a styling session.
///
/// # JSON Format
///
/// ```json
/// {
///   "version": 1,
///   "imageSize": 128,
///   "separateBorderRadius": false,
///   "styles": { "borderWidth": 8, "iconSize": 256 }
/// }
/// ```
///
/// Missing fields take their defaults, so a bare `{}` is a valid profile.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "jsonschema", derive(schemars::JsonSchema))]
#[serde(rename_all = "camelCase", default)]
pub struct StyleProfile {
    /// Format version. Profiles newer than [`PROFILE_VERSION`] are rejected.
    pub version: u32,

    /// Edge length of exported images, in pixels.
    pub image_size: u32,

    /// Whether corner radii are edited independently.
    pub separate_border_radius: bool,

    pub styles: Styles,
}

impl Default for StyleProfile {
    fn default() -> Self {
        Self {
            version: PROFILE_VERSION,
            image_size: DEFAULT_IMAGE_SIZE,
            separate_border_radius: false,
            styles: Styles::default(),
        }
    }
}

impl StyleProfile {
    /// Creates a profile around `styles` with default export settings.
    pub fn new(styles: Styles) -> Self {
        Self {
            styles,
            ..Self::default()
        }
    }

    /// Sets the export size.
    pub fn with_image_size(mut self, size: u32) -> Self {
        self.image_size = size;
        self
    }

    /// Sets whether corner radii are edited independently.
    pub fn with_separate_border_radius(mut self, separate: bool) -> Self {
        self.separate_border_radius = separate;
        self
    }

    /// Serializes the profile to a JSON string.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Serializes the profile to a pretty-printed JSON string.
    pub fn to_json_pretty(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Deserializes a profile from a JSON string.
    ///
    /// Color identifiers are kept as written; use [`import`](Self::import)
    /// to load a profile into a running session.
    pub fn from_json(json: &str) -> Result<Self, ProfileError> {
        let profile: Self = serde_json::from_str(json)?;
        if profile.version > PROFILE_VERSION {
            return Err(ProfileError::UnsupportedVersion(profile.version));
        }
        Ok(profile)
    }

    /// Deserializes a profile and gives every color a fresh identifier.
    pub fn import(json: &str) -> Result<Self, ProfileError> {
        let mut profile = Self::from_json(json)?;
        profile.styles = profile.styles.with_fresh_ids();
        Ok(profile)
    }
}

// ============================================================================
// Tests
// ============================================================================
