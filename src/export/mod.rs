//! Export of a render root to PNG, JPEG, SVG or inner SVG.
//!
//! # Formats
//!
//! | format | output | file |
//! |---|---|---|
//! | [`ExportFormat::Png`] | raster, `size x size`, transparent | `<name>.png` |
//! | [`ExportFormat::Jpeg`] | raster over an opaque matte | `<name>.jpeg` |
//! | [`ExportFormat::Svg`] | root resized to `size` | `<name>.svg` |
//! | [`ExportFormat::InnerSvg`] | first `<svg>` nested in the root, as is | `<name>.svg` |
//!
//! Rasterization and encoding run on a blocking task, and saving goes
//! through the async [`SaveTarget`], so the calling task only suspends
//! while they run. Independent exports do not interact.

pub mod document;
pub mod markup;
pub mod raster;
pub mod sink;

pub use document::RenderRoot;
pub use sink::{DirectorySink, MemorySink, SaveTarget, SavedFile};

use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

use palette::Srgb;
use serde::{Deserialize, Serialize};
use tokio::task::JoinHandle;

use crate::error::{ExportError, ExportResult};

// ============================================================================
// ExportFormat
// ============================================================================

/// Output format of an export.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "jsonschema", derive(schemars::JsonSchema))]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
pub enum ExportFormat {
    Png,
    Svg,
    Jpeg,
    #[serde(rename = "Inner-Svg")]
    InnerSvg,
}

impl ExportFormat {
    pub const ALL: [Self; 4] = [Self::Png, Self::Svg, Self::Jpeg, Self::InnerSvg];

    /// File extension, without the dot.
    pub fn extension(self) -> &'static str {
        match self {
            Self::Png => "png",
            Self::Svg | Self::InnerSvg => "svg",
            Self::Jpeg => "jpeg",
        }
    }

    pub fn mime_type(self) -> &'static str {
        match self {
            Self::Png => "image/png",
            Self::Svg | Self::InnerSvg => "image/svg+xml",
            Self::Jpeg => "image/jpeg",
        }
    }

    /// Returns `true` for formats that go through rasterization.
    pub fn is_raster(self) -> bool {
        matches!(self, Self::Png | Self::Jpeg)
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Png => "Png",
            Self::Svg => "Svg",
            Self::Jpeg => "Jpeg",
            Self::InnerSvg => "Inner-Svg",
        })
    }
}

// ============================================================================
// ExportOptions
// ============================================================================

/// Encoder settings for raster exports.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExportOptions {
    /// JPEG quality, 1-100.
    pub jpeg_quality: u8,

    /// Opaque color transparent pixels are flattened onto for JPEG.
    pub jpeg_matte: Srgb<u8>,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            jpeg_quality: 95,
            jpeg_matte: Srgb::new(255, 255, 255),
        }
    }
}

// ============================================================================
// Export routine
// ============================================================================

/// Exports `render_root` as `<file_base_name>.<ext>` into `sink`, using
/// default [`ExportOptions`].
///
/// See [`export_image_with`].
pub async fn export_image<S>(
    target_size: u32,
    file_base_name: &str,
    format: ExportFormat,
    render_root: Option<&RenderRoot>,
    sink: &S,
) -> ExportResult<Option<PathBuf>>
where
    S: SaveTarget + ?Sized,
{
    export_image_with(
        target_size,
        file_base_name,
        format,
        render_root,
        sink,
        &ExportOptions::default(),
    )
    .await
}

/// Exports `render_root` as `<file_base_name>.<ext>` into `sink`.
///
/// Returns the saved path, or `Ok(None)` when there is nothing to export:
/// no render root, or an inner SVG export of a root without a nested
/// `<svg>`. Raster formats are rendered at exactly `target_size x
/// target_size`.
pub async fn export_image_with<S>(
    target_size: u32,
    file_base_name: &str,
    format: ExportFormat,
    render_root: Option<&RenderRoot>,
    sink: &S,
    options: &ExportOptions,
) -> ExportResult<Option<PathBuf>>
where
    S: SaveTarget + ?Sized,
{
    let Some(root) = render_root else {
        tracing::debug!(%format, "no render root, skipping export");
        return Ok(None);
    };

    let bytes = match format {
        ExportFormat::Svg => markup::resize_root(root.markup(), target_size)?.into_bytes(),
        ExportFormat::InnerSvg => match markup::first_nested_svg(root.markup())? {
            Some(inner) => inner.as_bytes().to_vec(),
            None => {
                tracing::debug!("render root has no nested svg, skipping export");
                return Ok(None);
            }
        },
        ExportFormat::Png | ExportFormat::Jpeg => {
            let markup = root.markup().to_owned();
            let options = *options;
            tokio::task::spawn_blocking(move || encode_raster(&markup, target_size, format, &options))
                .await
                .map_err(|e| ExportError::Task(e.to_string()))??
        }
    };

    let file_name = format!("{file_base_name}.{}", format.extension());
    let path = sink.save(&file_name, format.mime_type(), &bytes).await?;
    tracing::debug!(%format, target_size, path = %path.display(), "export complete");
    Ok(Some(path))
}

fn encode_raster(
    markup: &str,
    size: u32,
    format: ExportFormat,
    options: &ExportOptions,
) -> ExportResult<Vec<u8>> {
    let image = raster::rasterize(markup, size)?;
    match format {
        ExportFormat::Jpeg => raster::encode_jpeg(&image, options.jpeg_quality, options.jpeg_matte),
        _ => raster::encode_png(&image),
    }
}

/// Starts an export on the current tokio runtime without waiting for it.
///
/// Failures are logged with `tracing::error!` and resolve to `None`; they
/// are never retried. Must be called from within a runtime.
pub fn spawn_export(
    target_size: u32,
    file_base_name: impl Into<String>,
    format: ExportFormat,
    render_root: Option<Arc<RenderRoot>>,
    sink: Arc<dyn SaveTarget>,
) -> JoinHandle<Option<PathBuf>> {
    let file_base_name = file_base_name.into();
    tokio::spawn(async move {
        let result = export_image(
            target_size,
            &file_base_name,
            format,
            render_root.as_deref(),
            sink.as_ref(),
        )
        .await;

        match result {
            Ok(path) => path,
            Err(e) => {
                tracing::error!(%format, name = %file_base_name, error = %e, "export failed");
                None
            }
        }
    })
}

// ============================================================================
// Tests
// ============================================================================
