//! Composition of a render root from a [`Styles`] value and an icon.
//!
//! The composed document mirrors the preview structure: a frame filled with
//! the border gradient, a surface inset by the border ring and filled with
//! the background gradient, the icon centered on top, then the optional text.
//! Perspective and inset shadows have no SVG counterpart and only appear in
//! the CSS preview.

use std::f64::consts::PI;

use quick_xml::escape::escape;

use super::markup::{embeddable_root, ensure_view_box};
use crate::css::declarations::ring_width;
use crate::css::gradient::gradient_stops;
use crate::css::{Num, drop_shadow_filter_css};
use crate::error::ExportResult;
use crate::scale::{PREVIEW_SIZE, export_scale};
use crate::style::{BorderRadius, Color, DEFAULT_TEXT_COLOR, GradientKind, Shadow, Styles};

// ============================================================================
// RenderRoot
// ============================================================================

/// An SVG document ready to be exported.
///
/// This is what the editor has on screen: either markup handed over as is,
/// or a document composed from styles and an icon.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderRoot {
    markup: String,
}

impl RenderRoot {
    /// Wraps existing SVG markup. The markup is validated lazily, at export.
    pub fn from_markup(markup: impl Into<String>) -> Self {
        Self {
            markup: markup.into(),
        }
    }

    /// Composes a document at preview size.
    pub fn compose(styles: &Styles, icon_svg: &str) -> ExportResult<Self> {
        Self::compose_sized(styles, icon_svg, PREVIEW_SIZE as u32)
    }

    /// Composes a document of `size x size` pixels, scaling every length of
    /// `styles` from the preview size.
    ///
    /// Fails if `icon_svg` is not an `<svg>` document.
    pub fn compose_sized(styles: &Styles, icon_svg: &str, size: u32) -> ExportResult<Self> {
        let styles = styles.scaled(export_scale(size));
        let markup = Composer::new(&styles, f64::from(size)).compose(icon_svg)?;
        Ok(Self { markup })
    }

    pub fn markup(&self) -> &str {
        &self.markup
    }

    pub fn into_markup(self) -> String {
        self.markup
    }
}

// ============================================================================
// Composer
// ============================================================================

const FRAME_FILL_ID: &str = "frame-fill";
const SURFACE_FILL_ID: &str = "surface-fill";
const TEXT_FILL_ID: &str = "text-fill";

struct Composer<'a> {
    styles: &'a Styles,
    size: f64,
    defs: Vec<String>,
    body: Vec<String>,
}

impl<'a> Composer<'a> {
    fn new(styles: &'a Styles, size: f64) -> Self {
        Self {
            styles,
            size,
            defs: Vec::new(),
            body: Vec::new(),
        }
    }

    fn compose(mut self, icon_svg: &str) -> ExportResult<String> {
        self.frame();
        self.icon(icon_svg)?;
        if self.styles.has_text() {
            self.text();
        }

        let size = Num(self.size);
        let mut doc = format!(
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="{size}" height="{size}" viewBox="0 0 {size} {size}">"#
        );
        if !self.defs.is_empty() {
            doc.push_str("<defs>");
            doc.extend(self.defs);
            doc.push_str("</defs>");
        }
        doc.extend(self.body);
        doc.push_str("</svg>");
        Ok(doc)
    }

    /// Registers a gradient and returns the paint referencing it.
    fn paint(&mut self, id: &str, colors: &[Color], angle: f64, kind: GradientKind) -> String {
        match svg_gradient(id, colors, angle, kind) {
            Some(def) => {
                self.defs.push(def);
                format!("url(#{id})")
            }
            None => "none".to_string(),
        }
    }

    fn frame(&mut self) {
        let styles = self.styles;
        let ring = ring_width(styles);

        let frame_fill = self.paint(
            FRAME_FILL_ID,
            &styles.border_colors,
            styles.border_rotation,
            styles.border_gradient,
        );
        let outer = rounded_rect_path(0.0, 0.0, self.size, self.size, &styles.border_radius);
        self.body.push(format!(
            r#"<path d="{outer}" fill="{frame_fill}"{}/>"#,
            filter_attr(&styles.shadows)
        ));

        let surface_fill = self.paint(
            SURFACE_FILL_ID,
            &styles.background_colors,
            styles.background_rotation,
            styles.background_gradient,
        );
        let inner_size = (self.size - 2.0 * ring).max(0.0);
        let inner_radius = styles.border_radius.map(|r| (r - ring).max(0.0));
        let inner = rounded_rect_path(ring, ring, inner_size, inner_size, &inner_radius);
        self.body
            .push(format!(r#"<path d="{inner}" fill="{surface_fill}"/>"#));
    }

    fn icon(&mut self, icon_svg: &str) -> ExportResult<()> {
        let styles = self.styles;
        let size = styles.icon_size.max(0.0);
        let half = Num(-size / 2.0);
        let icon = embeddable_root(icon_svg, |attrs| {
            ensure_view_box(attrs);
            attrs.set("x", half.to_string());
            attrs.set("y", half.to_string());
            attrs.set("width", Num(size).to_string());
            attrs.set("height", Num(size).to_string());
            attrs.set("color", &styles.icon_color);
        })?;

        let center = self.size / 2.0;
        self.body.push(format!(
            r#"<g transform="translate({} {}) rotate({})"{}>{icon}</g>"#,
            Num(center + styles.icon_offset.x),
            Num(center + styles.icon_offset.y),
            Num(styles.icon_rotation),
            filter_attr(&styles.icon_shadow),
        ));
        Ok(())
    }

    fn text(&mut self) {
        let styles = self.styles;
        let fill = match self.paint(
            TEXT_FILL_ID,
            &styles.text_colors,
            styles.text_color_rotation,
            styles.text_gradient,
        ) {
            paint if paint != "none" => paint,
            _ => styles
                .text_colors
                .first()
                .map_or(DEFAULT_TEXT_COLOR, Color::value)
                .to_string(),
        };

        let mut attrs = format!(
            r#" font-family="{}" font-size="{}" font-weight="{}" font-style="{}" fill="{}""#,
            escape(styles.text_font.as_str()),
            Num(styles.text_size),
            escape(styles.text_weight.as_str()),
            if styles.text_italic { "italic" } else { "normal" },
            escape(fill.as_str()),
        );
        if styles.text_stroke {
            attrs.push_str(&format!(
                r#" stroke="{}" stroke-width="{}""#,
                escape(styles.text_stroke_color.as_str()),
                Num(styles.text_stroke_width),
            ));
        }

        let center = self.size / 2.0;
        self.body.push(format!(
            r#"<g transform="translate({} {}) rotate({})"{}><text text-anchor="middle" dominant-baseline="central"{attrs}>{}</text></g>"#,
            Num(center + styles.text_offset.x),
            Num(center + styles.text_offset.y),
            Num(styles.text_rotation),
            filter_attr(&styles.text_shadow),
            escape(styles.text_value.as_str()),
        ));
    }
}

/// Builds a ` filter="..."` attribute from the visible shadows, or nothing.
fn filter_attr(shadows: &[Shadow]) -> String {
    let visible: Vec<Shadow> = shadows.iter().filter(|s| is_visible(s)).cloned().collect();
    if visible.is_empty() {
        return String::new();
    }
    format!(
        r#" filter="{}""#,
        escape(drop_shadow_filter_css(&visible).as_str())
    )
}

/// A shadow with no offset and no blur is hidden behind its own element.
fn is_visible(shadow: &Shadow) -> bool {
    shadow.offset_x != 0.0 || shadow.offset_y != 0.0 || shadow.blur != 0.0
}

// ============================================================================
// Geometry and paint
// ============================================================================

fn round4(value: f64) -> f64 {
    (value * 10_000.0).round() / 10_000.0
}

/// Path of a rectangle with independent corner radii.
///
/// Each radius is clamped to half the shorter side.
pub(crate) fn rounded_rect_path(x: f64, y: f64, w: f64, h: f64, radius: &BorderRadius) -> String {
    let max = (w.min(h) / 2.0).max(0.0);
    let [tl, tr, br, bl] = radius.0.map(|r| r.clamp(0.0, max));
    let (right, bottom) = (x + w, y + h);

    format!(
        "M{} {}H{}A{tr} {tr} 0 0 1 {} {}V{}A{br} {br} 0 0 1 {} {}H{}A{bl} {bl} 0 0 1 {} {}V{}A{tl} {tl} 0 0 1 {} {}Z",
        Num(x + tl),
        Num(y),
        Num(right - tr),
        Num(right),
        Num(y + tr),
        Num(bottom - br),
        Num(right - br),
        Num(bottom),
        Num(x + bl),
        Num(x),
        Num(bottom - bl),
        Num(y + tl),
        Num(x + tl),
        Num(y),
        tl = Num(tl),
        tr = Num(tr),
        br = Num(br),
        bl = Num(bl),
    )
}

/// Builds an SVG gradient element equivalent to the CSS gradient.
///
/// Linear gradients follow the CSS angle convention (0deg points up,
/// clockwise). Conic gradients fall back to a linear one at the same angle.
/// Returns `None` when the CSS projection would be empty.
pub(crate) fn svg_gradient(id: &str, colors: &[Color], angle: f64, kind: GradientKind) -> Option<String> {
    if colors.is_empty() {
        return None;
    }

    let stops = gradient_stops(colors);
    let last = (stops.len() - 1).max(1) as f64;
    let stops: String = stops
        .iter()
        .enumerate()
        .map(|(i, color)| {
            format!(
                r#"<stop offset="{}" stop-color="{}"/>"#,
                Num(round4(i as f64 / last)),
                escape(*color)
            )
        })
        .collect();

    match kind {
        GradientKind::Linear | GradientKind::Conic => {
            let theta = angle * PI / 180.0;
            let (sin, cos) = theta.sin_cos();
            let half = (sin.abs() + cos.abs()) / 2.0;
            Some(format!(
                r#"<linearGradient id="{id}" x1="{}" y1="{}" x2="{}" y2="{}">{stops}</linearGradient>"#,
                Num(round4(0.5 - sin * half)),
                Num(round4(0.5 + cos * half)),
                Num(round4(0.5 + sin * half)),
                Num(round4(0.5 - cos * half)),
            ))
        }
        // farthest-corner of the bounding box
        GradientKind::Radial => Some(format!(
            r#"<radialGradient id="{id}" cx="0.5" cy="0.5" r="0.7071">{stops}</radialGradient>"#
        )),
        GradientKind::Unknown => None,
    }
}

// ============================================================================
// Tests
// ============================================================================
