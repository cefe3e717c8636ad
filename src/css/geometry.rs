//! Border radius and perspective projection.

use super::Num;
use super::declarations::StyleDeclarations;
use crate::style::{BorderRadius, Perspective};

/// Perspective distance in pixels used when none is given.
pub const DEFAULT_PERSPECTIVE_DISTANCE: f64 = 500.0;

/// Projects corner radii to a `border-radius` value.
///
/// Corners are emitted in CSS order: top-left, top-right, bottom-right,
/// bottom-left.
pub fn border_radius_css(radius: &BorderRadius) -> String {
    let [tl, tr, br, bl] = radius.0;
    format!("{}px {}px {}px {}px", Num(tl), Num(tr), Num(br), Num(bl))
}

/// Composes a perspective rotation onto an existing `transform` value.
///
/// When the perspective is disabled the existing transform is returned
/// untouched. Otherwise `rotateX(<x>deg) rotateY(<y>deg)` is appended to it,
/// or returned alone when there is no existing transform.
pub fn compose_perspective_transform(
    existing: Option<&str>,
    perspective: &Perspective,
) -> Option<String> {
    if !perspective.enabled {
        return existing.map(str::to_owned);
    }

    let rotation = format!(
        "rotateX({}deg) rotateY({}deg)",
        Num(perspective.rotate_x),
        Num(perspective.rotate_y)
    );
    match existing.map(str::trim) {
        Some(current) if !current.is_empty() => Some(format!("{current} {rotation}")),
        _ => Some(rotation),
    }
}

/// Returns `declarations` with a perspective applied.
///
/// An enabled perspective sets `perspective: <distance>px`, forces
/// `transform-style: preserve-3d`, and composes the rotation onto whatever
/// `transform` is already declared. A disabled one returns the input as is.
pub fn apply_perspective(
    declarations: &StyleDeclarations,
    perspective: &Perspective,
    distance: f64,
) -> StyleDeclarations {
    if !perspective.enabled {
        return declarations.clone();
    }

    let mut out = declarations.clone();
    out.set("perspective", format!("{}px", Num(distance)));
    out.set("transform-style", "preserve-3d");
    if let Some(transform) = compose_perspective_transform(declarations.get("transform"), perspective) {
        out.set("transform", transform);
    }
    out
}
