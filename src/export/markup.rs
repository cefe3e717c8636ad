//! SVG markup surgery: root attribute rewriting and nested element lookup.
//!
//! Only the root start tag is ever rewritten; the rest of the document is
//! copied byte for byte, so icon markup keeps its original formatting.

use quick_xml::Reader;
use quick_xml::escape::escape;
use quick_xml::events::{BytesStart, Event};

use crate::error::{ExportError, ExportResult};

/// Attributes of a start tag, in document order.
///
/// Values are kept in their escaped form, exactly as they appear in the
/// markup.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Attributes {
    entries: Vec<(String, String)>,
}

impl Attributes {
    pub fn get(&self, name: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }

    /// Sets an attribute from an unescaped value.
    pub fn set(&mut self, name: &str, value: impl AsRef<str>) {
        let value = escape(value.as_ref()).into_owned();
        match self.entries.iter_mut().find(|(k, _)| k == name) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((name.to_string(), value)),
        }
    }

    pub fn remove(&mut self, name: &str) {
        self.entries.retain(|(k, _)| k != name);
    }

    fn write_tag(&self, name: &str, self_closing: bool) -> String {
        let mut tag = format!("<{name}");
        for (key, value) in &self.entries {
            let quote = if value.contains('"') { '\'' } else { '"' };
            tag.push_str(&format!(" {key}={quote}{value}{quote}"));
        }
        tag.push_str(if self_closing { "/>" } else { ">" });
        tag
    }
}

/// Location and content of the root start tag.
struct RootTag {
    start: usize,
    end: usize,
    name: String,
    attributes: Attributes,
    self_closing: bool,
}

fn parse_error(reader: &Reader<&[u8]>, err: impl std::fmt::Display) -> ExportError {
    ExportError::Parse(format!("at position {}: {err}", reader.error_position()))
}

fn collect_attributes(reader: &Reader<&[u8]>, tag: &BytesStart<'_>) -> ExportResult<Attributes> {
    let mut attributes = Attributes::default();
    for attr in tag.attributes().with_checks(false) {
        let attr = attr.map_err(|e| parse_error(reader, e))?;
        attributes.entries.push((
            String::from_utf8_lossy(attr.key.as_ref()).into_owned(),
            String::from_utf8_lossy(&attr.value).into_owned(),
        ));
    }
    Ok(attributes)
}

fn find_root(markup: &str) -> ExportResult<RootTag> {
    let mut reader = Reader::from_str(markup);
    loop {
        let start = reader.buffer_position() as usize;
        let (tag, self_closing) = match reader.read_event() {
            Ok(Event::Start(tag)) => (tag, false),
            Ok(Event::Empty(tag)) => (tag, true),
            Ok(Event::Eof) => return Err(ExportError::Parse("document has no root element".into())),
            Ok(_) => continue,
            Err(e) => return Err(parse_error(&reader, e)),
        };
        let end = reader.buffer_position() as usize;

        return Ok(RootTag {
            start,
            end,
            name: String::from_utf8_lossy(tag.name().as_ref()).into_owned(),
            attributes: collect_attributes(&reader, &tag)?,
            self_closing,
        });
    }
}

/// Rewrites the attributes of the root `<svg>` element.
///
/// Anything before the root (XML declaration, doctype, comments) is kept.
/// Fails if the markup is not well formed up to the root tag, or if the
/// root element is not `svg`.
pub fn rewrite_root(markup: &str, edit: impl FnOnce(&mut Attributes)) -> ExportResult<String> {
    rewrite(markup, edit, true)
}

/// Like [`rewrite_root`], but drops everything before the root element so
/// the result can be embedded inside another document.
pub fn embeddable_root(markup: &str, edit: impl FnOnce(&mut Attributes)) -> ExportResult<String> {
    rewrite(markup, edit, false)
}

fn rewrite(
    markup: &str,
    edit: impl FnOnce(&mut Attributes),
    keep_prolog: bool,
) -> ExportResult<String> {
    let mut root = find_root(markup)?;
    if local_name(&root.name) != "svg" {
        return Err(ExportError::Parse(format!(
            "root element is <{}>, expected <svg>",
            root.name
        )));
    }

    edit(&mut root.attributes);

    let mut out = String::with_capacity(markup.len() + 64);
    if keep_prolog {
        out.push_str(&markup[..root.start]);
    }
    out.push_str(&root.attributes.write_tag(&root.name, root.self_closing));
    out.push_str(&markup[root.end..]);
    Ok(out)
}

/// Adds a `viewBox` derived from numeric `width` and `height` when the
/// element has none, so resizing scales the content instead of cropping it.
pub(crate) fn ensure_view_box(attrs: &mut Attributes) {
    if attrs.get("viewBox").is_some() {
        return;
    }
    let width = attrs.get("width").and_then(parse_length);
    let height = attrs.get("height").and_then(parse_length);
    if let (Some(w), Some(h)) = (width, height) {
        attrs.set("viewBox", format!("0 0 {w} {h}"));
    }
}

/// Sets the root's `width` and `height` to `size`, keeping or deriving its
/// `viewBox`.
pub fn resize_root(markup: &str, size: u32) -> ExportResult<String> {
    rewrite_root(markup, |attrs| {
        ensure_view_box(attrs);
        attrs.set("width", size.to_string());
        attrs.set("height", size.to_string());
    })
}

/// Returns the markup of the first `<svg>` element nested inside the root.
///
/// The root element itself is never returned. `Ok(None)` means the document
/// parsed but holds no nested `<svg>`.
pub fn first_nested_svg(markup: &str) -> ExportResult<Option<&str>> {
    let mut reader = Reader::from_str(markup);
    let mut depth = 0usize;

    loop {
        let start = reader.buffer_position() as usize;
        match reader.read_event() {
            Ok(Event::Start(tag)) => {
                if depth > 0 && local_name_bytes(tag.name().as_ref()) == b"svg" {
                    reader
                        .read_to_end(tag.name())
                        .map_err(|e| parse_error(&reader, e))?;
                    let end = reader.buffer_position() as usize;
                    return Ok(Some(&markup[start..end]));
                }
                depth += 1;
            }
            Ok(Event::Empty(tag)) => {
                if depth > 0 && local_name_bytes(tag.name().as_ref()) == b"svg" {
                    let end = reader.buffer_position() as usize;
                    return Ok(Some(&markup[start..end]));
                }
            }
            Ok(Event::End(_)) => depth = depth.saturating_sub(1),
            Ok(Event::Eof) => return Ok(None),
            Ok(_) => {}
            Err(e) => return Err(parse_error(&reader, e)),
        }
    }
}

/// Parses a plain or `px` length such as `24` or `24px`.
pub(crate) fn parse_length(value: &str) -> Option<f64> {
    let value = value.trim();
    value
        .strip_suffix("px")
        .unwrap_or(value)
        .trim()
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite() && *v > 0.0)
}

fn local_name(name: &str) -> &str {
    name.rsplit(':').next().unwrap_or(name)
}

fn local_name_bytes(name: &[u8]) -> &[u8] {
    match name.iter().rposition(|b| *b == b':') {
        Some(i) => &name[i + 1..],
        None => name,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ICON: &str = r#"<svg xmlns="http://www.w3.org/2000/svg" width="24" height="24"><path d="M0 0h24v24H0z" fill="currentColor"/></svg>"#;

    #[test]
    fn resize_adds_view_box() {
        let resized = resize_root(ICON, 256).unwrap();
        assert!(resized.starts_with(
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="256" height="256" viewBox="0 0 24 24">"#
        ));
        assert!(resized.ends_with(r#"<path d="M0 0h24v24H0z" fill="currentColor"/></svg>"#));
    }

    #[test]
    fn resize_keeps_existing_view_box() {
        let svg = r#"<svg viewBox="0 0 16 16" width="1em" height="1em"></svg>"#;
        let resized = resize_root(svg, 64).unwrap();
        assert_eq!(resized, r#"<svg viewBox="0 0 16 16" width="64" height="64"></svg>"#);
    }

    #[test]
    fn rewrite_keeps_prolog() {
        let svg = "<?xml version=\"1.0\"?>\n<svg width=\"10\" height=\"10\"/>";
        let out = rewrite_root(svg, |a| a.set("color", "#fff")).unwrap();
        assert_eq!(
            out,
            "<?xml version=\"1.0\"?>\n<svg width=\"10\" height=\"10\" color=\"#fff\"/>"
        );
    }

    #[test]
    fn embeddable_root_drops_prolog() {
        let svg = "<?xml version=\"1.0\"?>\n<!-- icon -->\n<svg width=\"10\" height=\"10\"></svg>";
        let out = embeddable_root(svg, |a| a.remove("width")).unwrap();
        assert_eq!(out, "<svg height=\"10\"></svg>");
    }

    #[test]
    fn rewrite_escapes_values() {
        let out = rewrite_root("<svg></svg>", |a| a.set("data-x", "a<b&\"c\"")).unwrap();
        assert!(out.contains("data-x=\"a&lt;b&amp;&quot;c&quot;\""));
    }

    #[test]
    fn rewrite_rejects_non_svg_root() {
        let err = rewrite_root("<div></div>", |_| {}).unwrap_err();
        assert!(matches!(err, ExportError::Parse(_)));
    }

    #[test]
    fn nested_svg_found() {
        let doc = format!(
            r#"<svg xmlns="http://www.w3.org/2000/svg"><rect width="5" height="5"/><g>{ICON}</g><svg id="second"/></svg>"#
        );
        assert_eq!(first_nested_svg(&doc).unwrap(), Some(ICON));
    }

    #[test]
    fn nested_empty_svg_found() {
        let doc = r#"<svg><g><svg id="inner"/></g></svg>"#;
        assert_eq!(first_nested_svg(doc).unwrap(), Some(r#"<svg id="inner"/>"#));
    }

    #[test]
    fn root_is_not_nested() {
        assert_eq!(first_nested_svg(ICON).unwrap(), None);
    }

    #[test]
    fn malformed_markup_is_an_error() {
        assert!(first_nested_svg("<svg><g></svg>").is_err());
    }

    #[test]
    fn lengths() {
        assert_eq!(parse_length("24"), Some(24.0));
        assert_eq!(parse_length(" 12.5px "), Some(12.5));
        assert_eq!(parse_length("1em"), None);
        assert_eq!(parse_length("0"), None);
    }
}
