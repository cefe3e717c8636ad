//! CSS projection of the style model.
//!
//! Every function here is pure: given a fragment of [`Styles`](crate::Styles)
//! it returns a string usable directly as a CSS property value. The
//! [`declarations`] module assembles those values into per-element
//! declaration blocks for a live preview.

pub mod declarations;
pub mod geometry;
pub mod gradient;
pub mod shadow;

pub use declarations::{ProjectedStyles, StyleDeclarations, project_styles};
pub use geometry::{
    DEFAULT_PERSPECTIVE_DISTANCE, apply_perspective, border_radius_css,
    compose_perspective_transform,
};
pub use gradient::gradient_to_css;
pub use shadow::{box_shadow_css, drop_shadow_filter_css, text_shadow_css};

use std::fmt;

/// Formats a number the way a style sheet expects it: shortest form, no
/// trailing `.0`, and no negative zero.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Num(pub f64);

impl fmt::Display for Num {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // -0.0 == 0.0, so this also folds negative zero
        if self.0 == 0.0 {
            f.write_str("0")
        } else {
            write!(f, "{}", self.0)
        }
    }
}
