//! icon-styler: icon styling and export engine
//!
//! This crate turns a declarative [`Styles`] value (gradients, shadows,
//! corner radii, perspective, border ring and a text overlay) into CSS
//! declarations for a live preview, composes it with an icon into an SVG
//! document, and exports that document as PNG, JPEG, SVG or inner SVG.
//! It also flattens large icon collection indexes into searchable name lists.
//!
//! # Example
//!
//! ```
//! use icon_styler::{StyleSession, ExportFormat, MemorySink};
//!
//! # tokio::runtime::Builder::new_current_thread().build().unwrap().block_on(async {
//! let mut session = StyleSession::new();
//! session.set_icon(Some(r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 24 24"><circle cx="12" cy="12" r="10" fill="currentColor"/></svg>"#.into()));
//! session.update(|s| s.border_width = 12.0);
//!
//! // CSS for a live preview
//! let preview = session.preview();
//! assert_eq!(preview.frame.get("padding"), Some("12px"));
//!
//! // Export at the session's image size
//! let sink = MemorySink::new();
//! let saved = session.export(ExportFormat::Png, "my-icon", &sink).await.unwrap();
//! assert_eq!(saved.unwrap().to_str(), Some("my-icon.png"));
//! # });
//! ```
//!
//! # Serializable Profiles
//!
//! Use [`StyleProfile`] with the [`Configurable`] trait to move styles
//! between sessions:
//!
//! ```
//! use icon_styler::{Configurable, StyleProfile, StyleSession};
//!
//! let mut session = StyleSession::new();
//! session.update(|s| s.icon_rotation = 15.0);
//!
//! let json = session.export_profile().to_json().unwrap();
//!
//! let mut other = StyleSession::new();
//! other.apply_profile(&StyleProfile::import(&json).unwrap());
//! assert_eq!(other.styles().icon_rotation, 15.0);
//! ```

pub mod collection;
pub mod css;
pub mod export;
pub mod scale;

mod error;
mod profile;
mod session;
mod style;

pub use collection::{CollectionIndex, FLATTEN_BATCH_SIZE, IconName, flatten, flatten_with};
pub use css::{ProjectedStyles, StyleDeclarations, project_styles};
pub use error::{ExportError, ExportResult, ProfileError};
pub use export::{
    DirectorySink, ExportFormat, ExportOptions, MemorySink, RenderRoot, SaveTarget, SavedFile,
    export_image, export_image_with, spawn_export,
};
pub use profile::{DEFAULT_IMAGE_SIZE, PROFILE_VERSION, StyleProfile};
pub use scale::{PREVIEW_SIZE, export_scale, scale_shadow, scale_value};
pub use session::{Configurable, StyleSession};
pub use style::{
    BorderRadius, Color, ColorId, Corner, GradientKind, Offset, Perspective, Shadow, Styles,
    removed_at, replaced_at,
};
