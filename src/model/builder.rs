//! Structural element model builder
//!
//! Builds a [`XamlElement`] tree from one element's raw text. The builder
//! distinguishes three shapes for `<Parent.Property>` constructs (string
//! value, single nested element, list of elements), recurses into ordinary
//! child elements, and subtracts all consumed child markup from the
//! residual text content. Comments are dropped, not modeled.

use memchr::memmem;

use crate::core::scanner::{is_name_char, is_whitespace, Scanner};
use crate::model::element::{PropertyElement, PropertyValue, XamlAttribute, XamlElement};

/// Build the structural model of the element whose full text is `text`,
/// positioned at `absolute_offset` in the originating document.
///
/// Malformed spans degrade to a partial model (fewer attributes or
/// children) rather than failing.
pub fn build_element(text: &str, absolute_offset: usize) -> XamlElement {
    let bytes = text.as_bytes();
    let mut element = XamlElement {
        name: String::new(),
        attributes: Vec::new(),
        children: Vec::new(),
        property_elements: Vec::new(),
        content: String::new(),
        offset: absolute_offset,
        len: text.len(),
    };

    let mut scanner = Scanner::new(bytes);
    if scanner.peek() != Some(b'<') {
        return element;
    }
    scanner.advance(1);
    let name_start = scanner.position();
    if scanner.read_name().is_none() {
        return element;
    }
    let name_end = scanner.position();
    element.name = text[name_start..name_end].to_string();

    scanner.set_position(0);
    let open_end = match scanner.find_tag_end_quoted() {
        Some(pos) => pos,
        None => return element,
    };

    parse_attributes(text, name_end, open_end, absolute_offset, &mut element.attributes);

    // Self-closing form has no inner content
    if open_end > 0 && bytes[open_end - 1] == b'/' {
        return element;
    }

    let closer_start = match memmem::rfind(bytes, b"</") {
        Some(pos) if pos > open_end => pos,
        _ => return element,
    };

    let inner_start = open_end + 1;
    let inner_end = closer_start;

    // Spans consumed by children, property elements, and comments, in
    // source order; subtracted from the residual content afterwards
    let mut consumed: Vec<(usize, usize)> = Vec::new();

    let mut pos = inner_start;
    while pos < inner_end {
        let mut cursor = Scanner::new(bytes);
        cursor.set_position(pos);
        let lt = match cursor.find_byte(b'<') {
            Some(p) if p < inner_end => p,
            _ => break,
        };
        cursor.set_position(lt);

        if cursor.starts_with(b"<!--") {
            let end = match cursor.find_substring(b"-->") {
                Some(p) => p + 3,
                None => inner_end,
            };
            consumed.push((lt, end.min(inner_end)));
            pos = end;
            continue;
        }

        cursor.set_position(lt + 1);
        let child_name_start = cursor.position();
        if cursor.read_name().is_none() {
            pos = lt + 1;
            continue;
        }
        let child_name = &text[child_name_start..cursor.position()];

        let span_end = element_span(text, lt).unwrap_or(inner_end).min(inner_end);

        if let Some(prop_name) = property_name(&element.name, child_name) {
            let prop = build_property_element(
                text,
                lt,
                span_end,
                prop_name,
                absolute_offset,
            );
            element.property_elements.push(prop);
        } else {
            element
                .children
                .push(build_element(&text[lt..span_end], absolute_offset + lt));
        }

        consumed.push((lt, span_end));
        pos = span_end;
    }

    debug_assert!(consumed.windows(2).all(|w| w[0].1 <= w[1].0));

    let mut content = String::new();
    let mut cur = inner_start;
    for &(start, end) in &consumed {
        content.push_str(&text[cur..start]);
        cur = end;
    }
    content.push_str(&text[cur..inner_end]);
    element.content = content.trim().to_string();

    element
}

/// The property name when `child_name` is a property element of `parent`
/// (`Grid.RowDefinitions` under `Grid` gives `RowDefinitions`)
fn property_name<'a>(parent: &str, child_name: &'a str) -> Option<&'a str> {
    child_name.strip_prefix(parent)?.strip_prefix('.')
}

fn parse_attributes(
    text: &str,
    start: usize,
    end: usize,
    absolute_offset: usize,
    out: &mut Vec<XamlAttribute>,
) {
    let bytes = text.as_bytes();
    let mut pos = start;
    while pos < end {
        while pos < end && is_whitespace(bytes[pos]) {
            pos += 1;
        }
        if pos >= end || bytes[pos] == b'/' {
            break;
        }
        let name_start = pos;
        while pos < end && is_name_char(bytes[pos]) {
            pos += 1;
        }
        if pos == name_start {
            pos += 1;
            continue;
        }
        let name = &text[name_start..pos];
        while pos < end && is_whitespace(bytes[pos]) {
            pos += 1;
        }
        if pos >= end || bytes[pos] != b'=' {
            continue;
        }
        pos += 1;
        while pos < end && is_whitespace(bytes[pos]) {
            pos += 1;
        }
        if pos >= end || bytes[pos] != b'"' {
            continue;
        }
        pos += 1;
        let value_start = pos;
        while pos < end && bytes[pos] != b'"' {
            pos += 1;
        }
        out.push(XamlAttribute {
            name: name.to_string(),
            value: text[value_start..pos].to_string(),
            offset: absolute_offset + value_start,
            len: pos - value_start,
        });
        pos += 1;
    }
}

fn build_property_element(
    text: &str,
    start: usize,
    end: usize,
    prop_name: &str,
    absolute_offset: usize,
) -> PropertyElement {
    let mut prop = PropertyElement {
        name: prop_name.to_string(),
        value: PropertyValue::Text(String::new()),
        offset: absolute_offset + start,
        len: end - start,
    };

    let bytes = text.as_bytes();
    let mut scanner = Scanner::new(bytes);
    scanner.set_position(start);
    let open_end = match scanner.find_tag_end_quoted() {
        Some(pos) if pos < end => pos,
        _ => return prop,
    };
    if bytes[open_end - 1] == b'/' {
        return prop;
    }
    let closer_start = match memmem::rfind(&bytes[start..end], b"</") {
        Some(pos) if start + pos > open_end => start + pos,
        _ => return prop,
    };

    let inner = &text[open_end + 1..closer_start];
    let trimmed = inner.trim();
    if !trimmed.starts_with('<') {
        prop.value = PropertyValue::Text(trimmed.to_string());
        return prop;
    }

    // Element-valued property: collect sibling child elements, dropping
    // interleaved comments
    let mut elements = Vec::new();
    let mut pos = open_end + 1;
    while pos < closer_start {
        let mut cursor = Scanner::new(bytes);
        cursor.set_position(pos);
        let lt = match cursor.find_byte(b'<') {
            Some(p) if p < closer_start => p,
            _ => break,
        };
        cursor.set_position(lt);
        if cursor.starts_with(b"<!--") {
            pos = match cursor.find_substring(b"-->") {
                Some(p) => p + 3,
                None => closer_start,
            };
            continue;
        }
        cursor.set_position(lt + 1);
        if cursor.read_name().is_none() {
            pos = lt + 1;
            continue;
        }
        let span_end = element_span(text, lt).unwrap_or(closer_start).min(closer_start);
        elements.push(build_element(&text[lt..span_end], absolute_offset + lt));
        pos = span_end;
    }

    prop.value = match elements.len() {
        0 => PropertyValue::Text(String::new()),
        1 => PropertyValue::Element(elements.remove(0)),
        _ => PropertyValue::Elements(elements),
    };
    prop
}

/// End offset (exclusive) of the element opening at `start`, found by
/// depth-balanced matching on the element's own name. Tags with other
/// names never affect the depth, so same-named nesting resolves correctly.
fn element_span(text: &str, start: usize) -> Option<usize> {
    let bytes = text.as_bytes();
    let mut scanner = Scanner::new(bytes);
    scanner.set_position(start + 1);
    let name_start = scanner.position();
    scanner.read_name()?;
    let name = &bytes[name_start..scanner.position()];

    scanner.set_position(start);
    let first_end = scanner.find_tag_end_quoted()?;
    if bytes[first_end - 1] == b'/' {
        return Some(first_end + 1);
    }

    let mut depth = 1usize;
    let mut pos = first_end + 1;
    while pos < bytes.len() {
        scanner.set_position(pos);
        let lt = scanner.find_byte(b'<')?;
        scanner.set_position(lt);

        if scanner.starts_with(b"<!--") {
            pos = scanner.find_substring(b"-->")? + 3;
            continue;
        }

        let after = &bytes[lt + 1..];
        if after.first() == Some(&b'/')
            && after[1..].starts_with(name)
            && name_boundary(after.get(1 + name.len()))
        {
            scanner.set_position(lt);
            let end = scanner.find_byte(b'>')?;
            depth -= 1;
            if depth == 0 {
                return Some(end + 1);
            }
            pos = end + 1;
        } else if after.starts_with(name) && name_boundary(after.get(name.len())) {
            scanner.set_position(lt);
            let end = scanner.find_tag_end_quoted()?;
            if bytes[end - 1] != b'/' {
                depth += 1;
            }
            pos = end + 1;
        } else {
            pos = lt + 1;
        }
    }
    None
}

fn name_boundary(b: Option<&u8>) -> bool {
    match b {
        None => true,
        Some(&b) => !is_name_char(b),
    }
}
