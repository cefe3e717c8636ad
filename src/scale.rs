//! Uniform scaling of geometric style values.
//!
//! Styles are edited at [`PREVIEW_SIZE`]; exporting at another resolution
//! scales lengths by `target / PREVIEW_SIZE`. Colors, angles and toggles are
//! not functions of size and pass through unchanged.

use crate::style::{Offset, Shadow, Styles};

/// Edge length, in pixels, of the preview the styles are authored against.
pub const PREVIEW_SIZE: f64 = 512.0;

/// Scales a single value.
pub fn scale_value(value: f64, factor: f64) -> f64 {
    value * factor
}

/// Scales the four numeric fields of a shadow, keeping its color.
pub fn scale_shadow(shadow: &Shadow, factor: f64) -> Shadow {
    Shadow::new(
        scale_value(shadow.offset_x, factor),
        scale_value(shadow.offset_y, factor),
        scale_value(shadow.blur, factor),
        scale_value(shadow.spread, factor),
        shadow.color.clone(),
    )
}

/// Factor that maps preview geometry onto a `target_size` square.
pub fn export_scale(target_size: u32) -> f64 {
    f64::from(target_size) / PREVIEW_SIZE
}

fn scale_shadows(shadows: &[Shadow], factor: f64) -> Vec<Shadow> {
    shadows.iter().map(|s| scale_shadow(s, factor)).collect()
}

fn scale_offset(offset: Offset, factor: f64) -> Offset {
    Offset::new(scale_value(offset.x, factor), scale_value(offset.y, factor))
}

impl Styles {
    /// Returns a copy with every length multiplied by `factor`.
    pub fn scaled(&self, factor: f64) -> Self {
        Self {
            border_radius: self.border_radius.map(|r| scale_value(r, factor)),
            border_width: scale_value(self.border_width, factor),
            icon_offset: scale_offset(self.icon_offset, factor),
            icon_shadow: scale_shadows(&self.icon_shadow, factor),
            icon_size: scale_value(self.icon_size, factor),
            inset_shadows: scale_shadows(&self.inset_shadows, factor),
            shadows: scale_shadows(&self.shadows, factor),
            text_offset: scale_offset(self.text_offset, factor),
            text_shadow: scale_shadows(&self.text_shadow, factor),
            text_size: scale_value(self.text_size, factor),
            text_stroke_width: scale_value(self.text_stroke_width, factor),
            ..self.clone()
        }
    }
}
