//! Editing session holding the current styles.

use std::path::PathBuf;
use std::sync::Arc;

use crate::css::{ProjectedStyles, project_styles};
use crate::error::ExportResult;
use crate::export::{ExportFormat, RenderRoot, SaveTarget, export_image};
use crate::profile::{DEFAULT_IMAGE_SIZE, StyleProfile};
use crate::style::{BorderRadius, Corner, Styles};

// ============================================================================
// Configurable Trait
// ============================================================================

/// Trait for types that can be configured from a [`StyleProfile`].
pub trait Configurable {
    /// Applies a profile's settings to this instance.
    fn apply_profile(&mut self, profile: &StyleProfile);

    /// Exports the current settings as a profile.
    fn export_profile(&self) -> StyleProfile;
}

// ============================================================================
// StyleSession
// ============================================================================

/// Owner of the styles being edited.
///
/// Styles are held behind an [`Arc`] and updated copy-on-write: a
/// [`snapshot`](Self::snapshot) taken before an update keeps the old value,
/// so an export in flight never sees a half-applied edit.
///
/// Every effective change bumps a version counter. The composed render root
/// is cached per version and rebuilt lazily.
///
/// # Example
///
/// ```
/// use icon_styler::StyleSession;
///
/// let mut session = StyleSession::new();
/// let before = session.snapshot();
///
/// session.update(|s| s.border_width = 2.0);
///
/// assert_eq!(before.border_width, 8.0);
/// assert_eq!(session.styles().border_width, 2.0);
/// assert_eq!(session.version(), 1);
/// ```
#[derive(Debug, Clone)]
pub struct StyleSession {
    styles: Arc<Styles>,
    version: u64,
    icon_svg: Option<String>,
    image_size: u32,
    separate_border_radius: bool,
    cached_root: Option<(u64, Arc<RenderRoot>)>,
}

impl Default for StyleSession {
    fn default() -> Self {
        Self::new()
    }
}

impl StyleSession {
    /// Creates a session with default styles and no icon.
    pub fn new() -> Self {
        Self::with_styles(Styles::default())
    }

    pub fn with_styles(styles: Styles) -> Self {
        Self {
            styles: Arc::new(styles),
            version: 0,
            icon_svg: None,
            image_size: DEFAULT_IMAGE_SIZE,
            separate_border_radius: false,
            cached_root: None,
        }
    }

    pub fn styles(&self) -> &Styles {
        &self.styles
    }

    /// Returns a shared handle to the current styles.
    pub fn snapshot(&self) -> Arc<Styles> {
        Arc::clone(&self.styles)
    }

    /// Number of effective changes since the session started.
    pub fn version(&self) -> u64 {
        self.version
    }

    /// Applies `edit` to the styles.
    ///
    /// Returns `true` if the styles changed. An edit that leaves every field
    /// equal does not bump the version.
    pub fn update(&mut self, edit: impl FnOnce(&mut Styles)) -> bool {
        let previous = Arc::clone(&self.styles);
        edit(Arc::make_mut(&mut self.styles));

        if *self.styles == *previous {
            self.styles = previous;
            return false;
        }
        self.bump();
        true
    }

    /// Replaces the styles wholesale. Returns `true` if they changed.
    pub fn replace(&mut self, styles: Styles) -> bool {
        if *self.styles == styles {
            return false;
        }
        self.styles = Arc::new(styles);
        self.bump();
        true
    }

    /// Restores default styles.
    pub fn reset(&mut self) -> bool {
        self.replace(Styles::default())
    }

    /// Sets a corner radius.
    ///
    /// Unless corners are edited separately, all four corners take the value.
    pub fn set_corner_radius(&mut self, corner: Corner, radius: f64) -> bool {
        let separate = self.separate_border_radius;
        self.update(|s| {
            s.border_radius = if separate {
                s.border_radius.with_corner(corner, radius)
            } else {
                BorderRadius::uniform(radius)
            };
        })
    }

    pub fn separate_border_radius(&self) -> bool {
        self.separate_border_radius
    }

    pub fn set_separate_border_radius(&mut self, separate: bool) {
        self.separate_border_radius = separate;
    }

    /// The icon being styled, if any.
    pub fn icon(&self) -> Option<&str> {
        self.icon_svg.as_deref()
    }

    /// Sets the icon markup. Returns `true` if it changed.
    pub fn set_icon(&mut self, svg: Option<String>) -> bool {
        if self.icon_svg == svg {
            return false;
        }
        self.icon_svg = svg;
        self.bump();
        true
    }

    /// Edge length of exported images.
    pub fn image_size(&self) -> u32 {
        self.image_size
    }

    pub fn set_image_size(&mut self, size: u32) {
        self.image_size = size;
    }

    /// CSS declarations for a live preview of the current styles.
    pub fn preview(&self) -> ProjectedStyles {
        project_styles(&self.styles)
    }

    /// Returns the composed document for the current styles and icon.
    ///
    /// `Ok(None)` when no icon is set. The document is cached until the
    /// next change.
    pub fn render_root(&mut self) -> ExportResult<Option<Arc<RenderRoot>>> {
        let Some(icon) = self.icon_svg.as_deref() else {
            return Ok(None);
        };

        if let Some((version, root)) = &self.cached_root {
            if *version == self.version {
                return Ok(Some(Arc::clone(root)));
            }
        }

        let root = Arc::new(RenderRoot::compose(&self.styles, icon)?);
        tracing::debug!(version = self.version, "composed render root");
        self.cached_root = Some((self.version, Arc::clone(&root)));
        Ok(Some(root))
    }

    /// Exports the current document at the session's image size.
    ///
    /// Returns `Ok(None)` when there is no icon to export.
    pub async fn export<S>(
        &mut self,
        format: ExportFormat,
        file_base_name: &str,
        sink: &S,
    ) -> ExportResult<Option<PathBuf>>
    where
        S: SaveTarget + ?Sized,
    {
        let root = self.render_root()?;
        export_image(self.image_size, file_base_name, format, root.as_deref(), sink).await
    }

    /// Drops the cached render root.
    pub fn clear_cache(&mut self) {
        self.cached_root = None;
    }

    fn bump(&mut self) {
        self.version += 1;
    }
}

impl Configurable for StyleSession {
    /// Loads a profile into the session.
    ///
    /// Colors get fresh identifiers so they never collide with ids already
    /// handed out in this session.
    fn apply_profile(&mut self, profile: &StyleProfile) {
        self.replace(profile.styles.with_fresh_ids());
        self.image_size = profile.image_size;
        self.separate_border_radius = profile.separate_border_radius;
    }

    fn export_profile(&self) -> StyleProfile {
        StyleProfile::new(Styles::clone(&self.styles))
            .with_image_size(self.image_size)
            .with_separate_border_radius(self.separate_border_radius)
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::export::MemorySink;

    const ICON: &str = r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 24 24"><path d="M4 4h16v16H4z" fill="currentColor"/></svg>"#;

    #[test]
    fn update_bumps_version_only_on_change() {
        let mut session = StyleSession::new();

        assert!(session.update(|s| s.icon_size = 128.0));
        assert_eq!(session.version(), 1);

        assert!(!session.update(|s| s.icon_size = 128.0));
        assert_eq!(session.version(), 1);
    }

    #[test]
    fn snapshot_is_isolated_from_updates() {
        let mut session = StyleSession::new();
        let snapshot = session.snapshot();

        session.update(|s| s.text_value = "new".to_string());

        assert_eq!(snapshot.text_value, "");
        assert_eq!(session.styles().text_value, "new");
    }

    #[test]
    fn noop_update_keeps_snapshot_identity() {
        let mut session = StyleSession::new();
        let snapshot = session.snapshot();

        session.update(|_| {});
        assert!(Arc::ptr_eq(&snapshot, &session.snapshot()));
    }

    #[test]
    fn replace_and_reset() {
        let mut session = StyleSession::new();
        let custom = Styles {
            border_width: 0.0,
            ..session.styles().clone()
        };

        assert!(session.replace(custom.clone()));
        assert!(!session.replace(custom));
        assert!(session.reset());
        assert_eq!(session.styles().border_width, 8.0);
        assert_eq!(session.version(), 2);
    }

    #[test]
    fn corner_radius_respects_separate_mode() {
        let mut session = StyleSession::new();

        session.set_corner_radius(Corner::TopLeft, 10.0);
        assert_eq!(session.styles().border_radius, BorderRadius::uniform(10.0));

        session.set_separate_border_radius(true);
        session.set_corner_radius(Corner::BottomLeft, 2.0);
        assert_eq!(session.styles().border_radius.0, [10.0, 10.0, 10.0, 2.0]);
    }

    #[test]
    fn render_root_requires_icon() {
        let mut session = StyleSession::new();
        assert!(session.render_root().unwrap().is_none());
    }

    #[test]
    fn render_root_is_cached_per_version() {
        let mut session = StyleSession::new();
        session.set_icon(Some(ICON.to_string()));

        let first = session.render_root().unwrap().unwrap();
        let second = session.render_root().unwrap().unwrap();
        assert!(Arc::ptr_eq(&first, &second));

        session.update(|s| s.icon_color = "#000".to_string());
        let third = session.render_root().unwrap().unwrap();
        assert!(!Arc::ptr_eq(&first, &third));
        assert!(third.markup().contains(r##"color="#000""##));
    }

    #[test]
    fn invalid_icon_surfaces_error() {
        let mut session = StyleSession::new();
        session.set_icon(Some("<not-svg/>".to_string()));
        assert!(session.render_root().is_err());
    }

    #[test]
    fn profile_roundtrip_through_session() {
        let mut session = StyleSession::new();
        session.update(|s| s.icon_rotation = 30.0);
        session.set_image_size(256);
        session.set_separate_border_radius(true);

        let profile = session.export_profile();
        assert_eq!(profile.image_size, 256);
        assert!(profile.separate_border_radius);

        let mut other = StyleSession::new();
        other.apply_profile(&profile);

        assert_eq!(other.styles().icon_rotation, 30.0);
        assert_eq!(other.image_size(), 256);
        assert!(other.separate_border_radius());
        // Imported colors get new ids
        let old_ids: Vec<_> = session.styles().colors().map(|c| c.id().clone()).collect();
        assert!(other.styles().colors().all(|c| !old_ids.contains(c.id())));
    }

    #[test]
    fn preview_reflects_current_styles() {
        let mut session = StyleSession::new();
        session.update(|s| s.icon_size = 100.0);
        assert_eq!(session.preview().icon.get("width"), Some("100px"));
    }

    #[tokio::test]
    async fn export_uses_session_size() {
        let mut session = StyleSession::new();
        let sink = MemorySink::new();

        // No icon yet
        assert!(session.export(ExportFormat::Png, "icon", &sink).await.unwrap().is_none());

        session.set_icon(Some(ICON.to_string()));
        session.set_image_size(48);
        session.export(ExportFormat::Png, "icon", &sink).await.unwrap();

        let file = &sink.files()[0];
        let decoded = image::load_from_memory(&file.bytes).unwrap();
        assert_eq!((decoded.width(), decoded.height()), (48, 48));
    }
}
