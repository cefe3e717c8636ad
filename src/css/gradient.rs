//! Gradient projection.

use super::Num;
use crate::style::{Color, GradientKind};

/// Returns the color stops of a gradient.
///
/// A single color is duplicated so the gradient has two stops; CSS rejects
/// a gradient with only one.
pub(crate) fn gradient_stops(colors: &[Color]) -> Vec<&str> {
    match colors {
        [only] => vec![only.value(), only.value()],
        _ => colors.iter().map(Color::value).collect(),
    }
}

/// Projects a list of colors to a CSS gradient.
///
/// | kind | output |
/// |---|---|
/// | `Linear` | `linear-gradient(<deg>deg, c1, c2, ...)` |
/// | `Radial` | `radial-gradient(c1, c2, ...)` |
/// | `Conic` | `conic-gradient(from <deg>deg, c1, c2, ...)` |
/// | `Unknown` | empty string |
///
/// An empty color list also yields an empty string. Callers treat the
/// empty string as "no gradient applied".
pub fn gradient_to_css(colors: &[Color], direction: f64, kind: GradientKind) -> String {
    if colors.is_empty() {
        return String::new();
    }
    let stops = gradient_stops(colors).join(", ");

    match kind {
        GradientKind::Linear => format!("linear-gradient({}deg, {stops})", Num(direction)),
        GradientKind::Radial => format!("radial-gradient({stops})"),
        GradientKind::Conic => format!("conic-gradient(from {}deg, {stops})", Num(direction)),
        GradientKind::Unknown => String::new(),
    }
}
