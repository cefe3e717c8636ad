//! SVG rasterization and PNG/JPEG encoding using resvg and image.

use std::io::Cursor;

use image::codecs::jpeg::JpegEncoder;
use image::codecs::png::PngEncoder;
use image::{ExtendedColorType, ImageEncoder, Rgb, RgbImage, Rgba, RgbaImage};
use palette::Srgb;
use resvg::tiny_skia::{Pixmap, Transform};
use resvg::usvg::{Options, Tree};

use crate::error::{ExportError, ExportResult};

// ============================================================================
// Rasterization
// ============================================================================

/// Renders SVG markup to a `size x size` RGBA image.
///
/// The document is stretched to fill the square exactly, at a pixel ratio of
/// one. System fonts are only loaded when the document contains text.
pub fn rasterize(markup: &str, size: u32) -> ExportResult<RgbaImage> {
    let mut options = Options::default();
    if markup.contains("<text") {
        options.fontdb_mut().load_system_fonts();
    }

    let tree = Tree::from_str(markup, &options).map_err(|e| ExportError::Parse(e.to_string()))?;
    let mut pixmap = Pixmap::new(size, size).ok_or(ExportError::Pixmap(size))?;

    let tree_size = tree.size();
    let transform = Transform::from_scale(
        size as f32 / tree_size.width(),
        size as f32 / tree_size.height(),
    );
    resvg::render(&tree, transform, &mut pixmap.as_mut());

    tracing::debug!(size, "rasterized render root");
    Ok(pixmap_to_rgba_image(&pixmap))
}

/// Converts a tiny_skia Pixmap to an image::RgbaImage.
fn pixmap_to_rgba_image(pixmap: &Pixmap) -> RgbaImage {
    let mut img = RgbaImage::new(pixmap.width(), pixmap.height());

    for (dst, src) in img.pixels_mut().zip(pixmap.pixels()) {
        // tiny_skia stores premultiplied alpha
        let (r, g, b, a) = unpremultiply(src.red(), src.green(), src.blue(), src.alpha());
        *dst = Rgba([r, g, b, a]);
    }

    img
}

/// Unpremultiplies a premultiplied alpha pixel.
fn unpremultiply(r: u8, g: u8, b: u8, a: u8) -> (u8, u8, u8, u8) {
    if a == 0 {
        (0, 0, 0, 0)
    } else {
        let a_f = a as f32 / 255.0;
        (
            (r as f32 / a_f).round().min(255.0) as u8,
            (g as f32 / a_f).round().min(255.0) as u8,
            (b as f32 / a_f).round().min(255.0) as u8,
            a,
        )
    }
}

// ============================================================================
// Matte
// ============================================================================

/// Flattens an RGBA image over an opaque matte color.
pub fn flatten_onto(image: &RgbaImage, matte: Srgb<u8>) -> RgbImage {
    let background = Rgba([matte.red, matte.green, matte.blue, 255]);
    let mut out = RgbImage::new(image.width(), image.height());

    for (dst, src) in out.pixels_mut().zip(image.pixels()) {
        let blended = alpha_blend(*src, background);
        *dst = Rgb([blended[0], blended[1], blended[2]]);
    }

    out
}

/// Alpha blends two RGBA pixels (source over destination).
fn alpha_blend(src: Rgba<u8>, dst: Rgba<u8>) -> Rgba<u8> {
    let sa = src[3] as f32 / 255.0;
    let da = dst[3] as f32 / 255.0;

    let out_a = sa + da * (1.0 - sa);
    if out_a == 0.0 {
        return Rgba([0, 0, 0, 0]);
    }

    let blend = |s: u8, d: u8| -> u8 {
        let sf = s as f32 / 255.0;
        let df = d as f32 / 255.0;
        let out = (sf * sa + df * da * (1.0 - sa)) / out_a;
        (out * 255.0).round() as u8
    };

    Rgba([
        blend(src[0], dst[0]),
        blend(src[1], dst[1]),
        blend(src[2], dst[2]),
        (out_a * 255.0).round() as u8,
    ])
}

// ============================================================================
// Encoding
// ============================================================================

/// Encodes an RGBA image as PNG.
pub fn encode_png(image: &RgbaImage) -> ExportResult<Vec<u8>> {
    let mut bytes = Cursor::new(Vec::new());
    PngEncoder::new(&mut bytes).write_image(
        image.as_raw(),
        image.width(),
        image.height(),
        ExtendedColorType::Rgba8,
    )?;
    Ok(bytes.into_inner())
}

/// Encodes an RGBA image as JPEG at `quality` (1-100), flattened over `matte`.
pub fn encode_jpeg(image: &RgbaImage, quality: u8, matte: Srgb<u8>) -> ExportResult<Vec<u8>> {
    let rgb = flatten_onto(image, matte);
    let mut bytes = Cursor::new(Vec::new());
    JpegEncoder::new_with_quality(&mut bytes, quality.clamp(1, 100)).write_image(
        rgb.as_raw(),
        rgb.width(),
        rgb.height(),
        ExtendedColorType::Rgb8,
    )?;
    Ok(bytes.into_inner())
}

// ============================================================================
// Tests
// ============================================================================
