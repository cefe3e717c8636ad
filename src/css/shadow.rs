//! Shadow projection for `box-shadow`, `filter: drop-shadow()` and
//! `text-shadow`.

use super::Num;
use crate::style::Shadow;

/// Projects shadows to a `box-shadow` value.
///
/// Each entry is `<x>px <y>px <blur>px <spread>px <color>`, followed by
/// ` inset` when `inset` is set. Entries are joined with `", "`.
pub fn box_shadow_css(shadows: &[Shadow], inset: bool) -> String {
    shadows
        .iter()
        .map(|s| {
            let entry = format!(
                "{}px {}px {}px {}px {}",
                Num(s.offset_x),
                Num(s.offset_y),
                Num(s.blur),
                Num(s.spread),
                s.color.value()
            );
            if inset { entry + " inset" } else { entry }
        })
        .collect::<Vec<_>>()
        .join(", ")
}

/// Projects shadows to a chain of `drop-shadow()` filter functions.
///
/// `drop-shadow()` has no spread parameter, so spread is dropped. Functions
/// are joined with a single space.
pub fn drop_shadow_filter_css(shadows: &[Shadow]) -> String {
    shadows
        .iter()
        .map(|s| {
            format!(
                "drop-shadow({}px {}px {}px {})",
                Num(s.offset_x),
                Num(s.offset_y),
                Num(s.blur),
                s.color.value()
            )
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Projects shadows to a `text-shadow` value (spread dropped).
pub fn text_shadow_css(shadows: &[Shadow]) -> String {
    shadows
        .iter()
        .map(|s| {
            format!(
                "{}px {}px {}px {}",
                Num(s.offset_x),
                Num(s.offset_y),
                Num(s.blur),
                s.color.value()
            )
        })
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::style::Color;

    fn shadow(x: f64, y: f64, blur: f64, spread: f64, color: &str) -> Shadow {
        Shadow::new(x, y, blur, spread, Color::new(color))
    }

    #[test]
    fn box_shadow_empty() {
        assert_eq!(box_shadow_css(&[], false), "");
        assert_eq!(box_shadow_css(&[], true), "");
    }

    #[test]
    fn box_shadow_entries() {
        let shadows = [shadow(1.0, 2.0, 3.0, 4.0, "red"), shadow(0.0, -1.5, 8.0, 0.0, "#000")];

        assert_eq!(
            box_shadow_css(&shadows, false),
            "1px 2px 3px 4px red, 0px -1.5px 8px 0px #000"
        );
        assert_eq!(
            box_shadow_css(&shadows, true),
            "1px 2px 3px 4px red inset, 0px -1.5px 8px 0px #000 inset"
        );
    }

    #[test]
    fn box_shadow_separator_count() {
        for len in 1..6 {
            let shadows: Vec<_> = (0..len).map(|i| shadow(i as f64, 0.0, 0.0, 0.0, "red")).collect();
            let css = box_shadow_css(&shadows, false);
            assert_eq!(css.matches(", ").count(), len - 1);
        }
    }

    #[test]
    fn drop_shadow_omits_spread() {
        let shadows = [shadow(1.0, 2.0, 3.0, 99.0, "red"), shadow(4.0, 5.0, 6.0, 99.0, "blue")];
        assert_eq!(
            drop_shadow_filter_css(&shadows),
            "drop-shadow(1px 2px 3px red) drop-shadow(4px 5px 6px blue)"
        );
    }

    #[test]
    fn text_shadow_omits_spread() {
        let shadows = [shadow(1.0, 2.0, 3.0, 99.0, "red"), shadow(4.0, 5.0, 6.0, 99.0, "blue")];
        assert_eq!(text_shadow_css(&shadows), "1px 2px 3px red, 4px 5px 6px blue");
    }
}
