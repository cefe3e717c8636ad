//! Style model describing an icon's visual configuration.
//!
//! [`Styles`] is the single source of truth edited by the session and
//! consumed by the CSS projection and export modules. Values follow a
//! copy-on-write discipline: every edit produces a new value, so a snapshot
//! handed to an export never changes underneath it.
//!
//! # JSON Format
//!
//! Shadows, perspectives and offsets serialize as positional arrays:
//!
//! ```json
//! {
//!   "shadows": [[0, 4, 12, 0, { "id": "3f1c...", "value": "rgba(0, 0, 0, 0.25)" }]],
//!   "iconPerspective": [true, 15, -10],
//!   "iconOffset": [0, 8]
//! }
//! ```

use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub const DEFAULT_BACKGROUND_COLOR: &str = "#FFFFFF00";
pub const DEFAULT_BORDER_COLOR: &str = "#FFFFFF00";
pub const DEFAULT_TEXT_COLOR: &str = "#000";
pub const DEFAULT_SHADOW_COLOR: &str = "rgba(0, 0, 0, 0)";
pub const DEFAULT_ICON_COLOR: &str = "#FFFFFF";
pub const DEFAULT_TEXT_FONT: &str = "sans-serif";
pub const DEFAULT_TEXT_AND_ICON_SHADOW_COLOR: &str = "rgba(0, 0, 0, 0)";

// ============================================================================
// Color
// ============================================================================

/// Session-unique identifier of a [`Color`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "jsonschema", derive(schemars::JsonSchema))]
#[serde(transparent)]
pub struct ColorId(String);

impl ColorId {
    /// Generates a fresh identifier from a random v4 UUID.
    pub fn generate() -> Self {
        Self(Uuid::new_v4().simple().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ColorId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A color entry in a gradient or shadow.
///
/// The value is any textual CSS color (`#FFF`, `#FFFFFF00`, `rgba(...)`).
/// Colors are immutable: an edit replaces the whole `Color`, which also
/// gives it a new identifier.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "jsonschema", derive(schemars::JsonSchema))]
pub struct Color {
    id: ColorId,
    value: String,
}

impl Color {
    /// Creates a color with a freshly generated identifier.
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            id: ColorId::generate(),
            value: value.into(),
        }
    }

    pub fn id(&self) -> &ColorId {
        &self.id
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    /// Returns a copy of this color carrying a new identifier.
    ///
    /// Used when importing a profile so imported ids never collide with
    /// ids already handed out in this session.
    pub fn refreshed(&self) -> Self {
        Self::new(self.value.clone())
    }
}

// ============================================================================
// Shadow
// ============================================================================

type ShadowTuple = (f64, f64, f64, f64, Color);

/// A shadow: `(offset_x, offset_y, blur, spread, color)`.
///
/// Spread is always stored even though drop and text shadows ignore it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "ShadowTuple", into = "ShadowTuple")]
pub struct Shadow {
    pub offset_x: f64,
    pub offset_y: f64,
    pub blur: f64,
    pub spread: f64,
    pub color: Color,
}

impl Shadow {
    pub fn new(offset_x: f64, offset_y: f64, blur: f64, spread: f64, color: Color) -> Self {
        Self {
            offset_x,
            offset_y,
            blur,
            spread,
            color,
        }
    }

    /// A zero-sized shadow of the given color, the starting point for a new
    /// shadow entry in the editor.
    pub fn transparent(color: impl Into<String>) -> Self {
        Self::new(0.0, 0.0, 0.0, 0.0, Color::new(color))
    }
}

impl From<ShadowTuple> for Shadow {
    fn from((offset_x, offset_y, blur, spread, color): ShadowTuple) -> Self {
        Self::new(offset_x, offset_y, blur, spread, color)
    }
}

impl From<Shadow> for ShadowTuple {
    fn from(shadow: Shadow) -> Self {
        (
            shadow.offset_x,
            shadow.offset_y,
            shadow.blur,
            shadow.spread,
            shadow.color,
        )
    }
}

// ============================================================================
// Gradient, Perspective, Geometry
// ============================================================================

/// Gradient kind, selecting the CSS gradient function.
///
/// Any unrecognized string deserializes to [`GradientKind::Unknown`], which
/// projects to no gradient at all.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "jsonschema", derive(schemars::JsonSchema))]
#[serde(rename_all = "lowercase")]
pub enum GradientKind {
    #[default]
    Linear,
    Radial,
    Conic,
    #[serde(other)]
    Unknown,
}

type PerspectiveTuple = (bool, f64, f64);

/// 3D tilt applied to the icon or text: `(enabled, rotate_x, rotate_y)`.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(from = "PerspectiveTuple", into = "PerspectiveTuple")]
pub struct Perspective {
    pub enabled: bool,
    pub rotate_x: f64,
    pub rotate_y: f64,
}

impl Perspective {
    pub fn new(enabled: bool, rotate_x: f64, rotate_y: f64) -> Self {
        Self {
            enabled,
            rotate_x,
            rotate_y,
        }
    }
}

impl From<PerspectiveTuple> for Perspective {
    fn from((enabled, rotate_x, rotate_y): PerspectiveTuple) -> Self {
        Self::new(enabled, rotate_x, rotate_y)
    }
}

impl From<Perspective> for PerspectiveTuple {
    fn from(p: Perspective) -> Self {
        (p.enabled, p.rotate_x, p.rotate_y)
    }
}

type OffsetTuple = (f64, f64);

/// Translation of the icon or text from the center of the frame.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(from = "OffsetTuple", into = "OffsetTuple")]
pub struct Offset {
    pub x: f64,
    pub y: f64,
}

impl Offset {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

impl From<OffsetTuple> for Offset {
    fn from((x, y): OffsetTuple) -> Self {
        Self::new(x, y)
    }
}

impl From<Offset> for OffsetTuple {
    fn from(o: Offset) -> Self {
        (o.x, o.y)
    }
}

/// A corner of the frame, in CSS `border-radius` order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Corner {
    TopLeft = 0,
    TopRight = 1,
    BottomRight = 2,
    BottomLeft = 3,
}

/// Corner radii `[top_left, top_right, bottom_right, bottom_left]`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "jsonschema", derive(schemars::JsonSchema))]
#[serde(transparent)]
pub struct BorderRadius(pub [f64; 4]);

impl BorderRadius {
    /// The same radius on all four corners.
    pub fn uniform(radius: f64) -> Self {
        Self([radius; 4])
    }

    pub fn corner(&self, corner: Corner) -> f64 {
        self.0[corner as usize]
    }

    /// Returns a copy with a single corner changed.
    pub fn with_corner(self, corner: Corner, radius: f64) -> Self {
        let mut radii = self.0;
        radii[corner as usize] = radius;
        Self(radii)
    }

    pub fn is_uniform(&self) -> bool {
        self.0.iter().all(|r| *r == self.0[0])
    }

    /// Applies `f` to every corner.
    pub fn map(self, f: impl Fn(f64) -> f64) -> Self {
        Self(self.0.map(f))
    }
}

impl Default for BorderRadius {
    fn default() -> Self {
        Self::uniform(64.0)
    }
}

// ============================================================================
// Styles
// ============================================================================

/// The aggregate style configuration of an icon.
///
/// Every field has the editor's default, so a partial JSON document fills
/// in whatever it does not mention.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[cfg_attr(feature = "jsonschema", derive(schemars::JsonSchema))]
#[serde(rename_all = "camelCase", default)]
pub struct Styles {
    pub background_colors: Vec<Color>,
    pub background_gradient: GradientKind,
    /// Gradient direction in degrees.
    pub background_rotation: f64,

    pub border_colors: Vec<Color>,
    pub border_gradient: GradientKind,
    pub border_radius: BorderRadius,
    pub border_rotation: f64,
    pub border_width: f64,

    pub icon_color: String,
    pub icon_offset: Offset,
    pub icon_perspective: Perspective,
    pub icon_rotation: f64,
    pub icon_shadow: Vec<Shadow>,
    pub icon_size: f64,

    pub inset_shadows: Vec<Shadow>,
    pub padding: bool,
    pub shadows: Vec<Shadow>,

    /// Text gradient direction in degrees.
    pub text_color_rotation: f64,
    pub text_colors: Vec<Color>,
    pub text_font: String,
    pub text_gradient: GradientKind,
    pub text_italic: bool,
    pub text_offset: Offset,
    pub text_perspective: Perspective,
    pub text_rotation: f64,
    pub text_shadow: Vec<Shadow>,
    pub text_size: f64,
    pub text_stroke: bool,
    pub text_stroke_color: String,
    pub text_stroke_width: f64,
    pub text_value: String,
    pub text_weight: String,
}

impl Default for Styles {
    fn default() -> Self {
        Self {
            background_colors: vec![Color::new(DEFAULT_BACKGROUND_COLOR)],
            background_gradient: GradientKind::Linear,
            background_rotation: 180.0,
            border_colors: vec![Color::new(DEFAULT_BORDER_COLOR)],
            border_gradient: GradientKind::Linear,
            border_radius: BorderRadius::uniform(64.0),
            border_rotation: 180.0,
            border_width: 8.0,
            icon_color: DEFAULT_ICON_COLOR.to_string(),
            icon_offset: Offset::default(),
            icon_perspective: Perspective::default(),
            icon_rotation: 0.0,
            icon_shadow: vec![Shadow::transparent(DEFAULT_TEXT_AND_ICON_SHADOW_COLOR)],
            icon_size: 256.0,
            inset_shadows: vec![Shadow::transparent(DEFAULT_SHADOW_COLOR)],
            padding: true,
            shadows: vec![Shadow::transparent(DEFAULT_SHADOW_COLOR)],
            text_color_rotation: 0.0,
            text_colors: vec![Color::new(DEFAULT_TEXT_COLOR)],
            text_font: DEFAULT_TEXT_FONT.to_string(),
            text_gradient: GradientKind::Linear,
            text_italic: false,
            text_offset: Offset::default(),
            text_perspective: Perspective::default(),
            text_rotation: 0.0,
            text_shadow: vec![Shadow::transparent(DEFAULT_TEXT_AND_ICON_SHADOW_COLOR)],
            text_size: 128.0,
            text_stroke: false,
            text_stroke_color: DEFAULT_BACKGROUND_COLOR.to_string(),
            text_stroke_width: 2.0,
            text_value: String::new(),
            text_weight: "400".to_string(),
        }
    }
}

impl Styles {
    /// Returns a copy in which every color carries a new identifier.
    pub fn with_fresh_ids(&self) -> Self {
        let colors = |colors: &[Color]| colors.iter().map(Color::refreshed).collect();
        let shadows = |shadows: &[Shadow]| {
            shadows
                .iter()
                .map(|s| Shadow {
                    color: s.color.refreshed(),
                    ..s.clone()
                })
                .collect()
        };

        Self {
            background_colors: colors(&self.background_colors),
            border_colors: colors(&self.border_colors),
            text_colors: colors(&self.text_colors),
            icon_shadow: shadows(&self.icon_shadow),
            inset_shadows: shadows(&self.inset_shadows),
            shadows: shadows(&self.shadows),
            text_shadow: shadows(&self.text_shadow),
            ..self.clone()
        }
    }

    /// Iterates over every color held by these styles, shadows included.
    pub fn colors(&self) -> impl Iterator<Item = &Color> {
        let shadow_colors = self
            .icon_shadow
            .iter()
            .chain(&self.inset_shadows)
            .chain(&self.shadows)
            .chain(&self.text_shadow)
            .map(|s| &s.color);

        self.background_colors
            .iter()
            .chain(&self.border_colors)
            .chain(&self.text_colors)
            .chain(shadow_colors)
    }

    /// Returns true if there is text to draw.
    pub fn has_text(&self) -> bool {
        !self.text_value.trim().is_empty()
    }
}

// ============================================================================
// Copy-on-write helpers
// ============================================================================

/// Returns a new vector with the element at `index` replaced.
///
/// An out-of-range index yields an unchanged copy.
pub fn replaced_at<T: Clone>(values: &[T], value: T, index: usize) -> Vec<T> {
    let mut out = values.to_vec();
    if let Some(slot) = out.get_mut(index) {
        *slot = value;
    }
    out
}

/// Returns a new vector without the element at `index`.
///
/// An out-of-range index yields an unchanged copy.
pub fn removed_at<T: Clone>(values: &[T], index: usize) -> Vec<T> {
    let mut out = values.to_vec();
    if index < out.len() {
        out.remove(index);
    }
    out
}

// ============================================================================
// JSON schema for positional types
// ============================================================================

#[cfg(feature = "jsonschema")]
mod schema {
    use schemars::JsonSchema;
    use schemars::r#gen::SchemaGenerator;
    use schemars::schema::Schema;

    use super::{Offset, OffsetTuple, Perspective, PerspectiveTuple, Shadow, ShadowTuple};

    macro_rules! positional_schema {
        ($ty:ty, $tuple:ty, $name:literal) => {
            impl JsonSchema for $ty {
                fn schema_name() -> String {
                    $name.to_owned()
                }

                fn json_schema(generator: &mut SchemaGenerator) -> Schema {
                    <$tuple>::json_schema(generator)
                }
            }
        };
    }

    positional_schema!(Shadow, ShadowTuple, "Shadow");
    positional_schema!(Perspective, PerspectiveTuple, "Perspective");
    positional_schema!(Offset, OffsetTuple, "Offset");
}

// ============================================================================
// Tests
// ============================================================================
