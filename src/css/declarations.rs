//! Declaration blocks for a live preview.

use std::fmt;

use serde::ser::{Serialize, SerializeMap, Serializer};

use super::Num;
use super::geometry::{DEFAULT_PERSPECTIVE_DISTANCE, apply_perspective, border_radius_css};
use super::gradient::gradient_to_css;
use super::shadow::{box_shadow_css, drop_shadow_filter_css, text_shadow_css};
use crate::style::{Offset, Styles};

// ============================================================================
// StyleDeclarations
// ============================================================================

/// An ordered list of CSS declarations.
///
/// Setting a property that is already declared replaces its value in place,
/// so the original declaration order is kept. Serializes as a JSON object.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct StyleDeclarations {
    entries: Vec<(String, String)>,
}

impl StyleDeclarations {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets a property, replacing any previous value.
    pub fn set(&mut self, property: impl Into<String>, value: impl Into<String>) {
        let property = property.into();
        let value = value.into();
        match self.entries.iter_mut().find(|(p, _)| *p == property) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((property, value)),
        }
    }

    /// Sets a property unless `value` is empty.
    pub fn set_non_empty(&mut self, property: impl Into<String>, value: impl Into<String>) {
        let value = value.into();
        if !value.is_empty() {
            self.set(property, value);
        }
    }

    /// Builder form of [`set`](Self::set).
    pub fn with(mut self, property: impl Into<String>, value: impl Into<String>) -> Self {
        self.set(property, value);
        self
    }

    pub fn get(&self, property: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(p, _)| p == property)
            .map(|(_, v)| v.as_str())
    }

    pub fn remove(&mut self, property: &str) -> Option<String> {
        let index = self.entries.iter().position(|(p, _)| p == property)?;
        Some(self.entries.remove(index).1)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(p, v)| (p.as_str(), v.as_str()))
    }

    /// Renders the block as an inline `style` attribute value.
    pub fn to_inline(&self) -> String {
        self.iter()
            .map(|(p, v)| format!("{p}: {v}"))
            .collect::<Vec<_>>()
            .join("; ")
    }
}

impl fmt::Display for StyleDeclarations {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_inline())
    }
}

impl Serialize for StyleDeclarations {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (property, value) in &self.entries {
            map.serialize_entry(property, value)?;
        }
        map.end()
    }
}

// ============================================================================
// Styles projection
// ============================================================================

/// Declarations for each element of the preview.
///
/// ```text
/// frame    border gradient, outer radius, drop and inset shadows
/// └ surface   background gradient, inner radius
///   ├ icon    color, size, transform, drop-shadow filter
///   └ text    font, gradient fill, text shadow, stroke
/// ```
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct ProjectedStyles {
    pub frame: StyleDeclarations,
    pub surface: StyleDeclarations,
    pub icon: StyleDeclarations,
    pub text: StyleDeclarations,
}

/// Projects a whole [`Styles`] value to preview declarations.
///
/// Empty projections (an unknown gradient, no shadows) are left out rather
/// than declared with an empty value.
pub fn project_styles(styles: &Styles) -> ProjectedStyles {
    ProjectedStyles {
        frame: frame_declarations(styles),
        surface: surface_declarations(styles),
        icon: icon_declarations(styles),
        text: text_declarations(styles),
    }
}

/// Width of the visible border ring; zero when padding is off.
pub(crate) fn ring_width(styles: &Styles) -> f64 {
    if styles.padding {
        styles.border_width.max(0.0)
    } else {
        0.0
    }
}

fn frame_declarations(styles: &Styles) -> StyleDeclarations {
    let mut decl = StyleDeclarations::new();
    decl.set_non_empty(
        "background",
        gradient_to_css(&styles.border_colors, styles.border_rotation, styles.border_gradient),
    );
    decl.set("border-radius", border_radius_css(&styles.border_radius));

    let shadows: Vec<_> = [
        box_shadow_css(&styles.shadows, false),
        box_shadow_css(&styles.inset_shadows, true),
    ]
    .into_iter()
    .filter(|s| !s.is_empty())
    .collect();
    decl.set_non_empty("box-shadow", shadows.join(", "));

    decl.set("padding", format!("{}px", Num(ring_width(styles))));
    decl
}

fn surface_declarations(styles: &Styles) -> StyleDeclarations {
    let ring = ring_width(styles);
    let inner_radius = styles.border_radius.map(|r| (r - ring).max(0.0));

    let mut decl = StyleDeclarations::new()
        .with("width", "100%")
        .with("height", "100%");
    decl.set_non_empty(
        "background",
        gradient_to_css(
            &styles.background_colors,
            styles.background_rotation,
            styles.background_gradient,
        ),
    );
    decl.set("border-radius", border_radius_css(&inner_radius));
    decl
}

fn placement_transform(offset: Offset, rotation: f64) -> String {
    format!(
        "translate({}px, {}px) rotate({}deg)",
        Num(offset.x),
        Num(offset.y),
        Num(rotation)
    )
}

fn icon_declarations(styles: &Styles) -> StyleDeclarations {
    let size = format!("{}px", Num(styles.icon_size));
    let mut decl = StyleDeclarations::new()
        .with("color", styles.icon_color.as_str())
        .with("width", size.as_str())
        .with("height", size)
        .with(
            "transform",
            placement_transform(styles.icon_offset, styles.icon_rotation),
        );
    decl.set_non_empty("filter", drop_shadow_filter_css(&styles.icon_shadow));

    apply_perspective(&decl, &styles.icon_perspective, DEFAULT_PERSPECTIVE_DISTANCE)
}

fn text_declarations(styles: &Styles) -> StyleDeclarations {
    let mut decl = StyleDeclarations::new()
        .with("font-family", styles.text_font.as_str())
        .with("font-size", format!("{}px", Num(styles.text_size)))
        .with("font-weight", styles.text_weight.as_str())
        .with(
            "font-style",
            if styles.text_italic { "italic" } else { "normal" },
        );

    let fill = gradient_to_css(
        &styles.text_colors,
        styles.text_color_rotation,
        styles.text_gradient,
    );
    if !fill.is_empty() {
        decl.set("background", fill);
        decl.set("background-clip", "text");
        decl.set("-webkit-background-clip", "text");
        decl.set("color", "transparent");
    }

    decl.set_non_empty("text-shadow", text_shadow_css(&styles.text_shadow));
    if styles.text_stroke {
        decl.set(
            "-webkit-text-stroke",
            format!(
                "{}px {}",
                Num(styles.text_stroke_width),
                styles.text_stroke_color
            ),
        );
    }
    decl.set(
        "transform",
        placement_transform(styles.text_offset, styles.text_rotation),
    );

    apply_perspective(&decl, &styles.text_perspective, DEFAULT_PERSPECTIVE_DISTANCE)
}
