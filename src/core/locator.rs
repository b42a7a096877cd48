//! Attribute and content locator
//!
//! Given one element's raw text, locates a named attribute in any of the
//! forms XAML allows: inline (`Name="value"`), property-element
//! (`<Type.Name>value</Type.Name>`), or default inner content. Returns the
//! value together with its byte offset and length inside the given text.
//!
//! Pure functions: identical inputs always produce identical results.

use memchr::memmem;

use super::scanner::is_whitespace;

/// Attribute form bitmask
pub mod forms {
    /// Inline `Name="value"` syntax
    pub const INLINE: u8 = 0x01;
    /// Property-element `<Type.Name>value</Type.Name>` syntax
    pub const ELEMENT: u8 = 0x02;
    /// Plain inner text content
    pub const DEFAULT_VALUE: u8 = 0x04;
    /// All forms
    pub const ANY: u8 = INLINE | ELEMENT | DEFAULT_VALUE;
}

/// The form in which an attribute value was found
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttributeForm {
    Inline,
    Element,
    DefaultValue,
}

/// A located attribute or content value
///
/// `offset` and `len` are byte positions within the element text that was
/// searched, not the whole document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LocatedValue<'a> {
    pub form: AttributeForm,
    pub offset: usize,
    pub len: usize,
    pub value: &'a str,
}

/// Find an attribute value in the given element text.
///
/// `search_forms` is a bitmask of [`forms`] constants. When multiple forms
/// are requested the search order is Inline, then Element, then
/// DefaultValue, and the first match wins: an element may legally express
/// the same property both inline and as content, and inline takes
/// precedence.
pub fn find_attribute<'a>(
    element_text: &'a str,
    attribute_name: &str,
    search_forms: u8,
) -> Option<LocatedValue<'a>> {
    if search_forms & forms::INLINE != 0 {
        if let Some(found) = find_inline(element_text, attribute_name) {
            return Some(found);
        }
    }
    if search_forms & forms::ELEMENT != 0 {
        if let Some(found) = find_property_element(element_text, attribute_name) {
            return Some(found);
        }
    }
    if search_forms & forms::DEFAULT_VALUE != 0 {
        if let Some(found) = find_default_value(element_text) {
            return Some(found);
        }
    }
    None
}

/// Locate `{name}="` and slice up to the closing quote
fn find_inline<'a>(element_text: &'a str, attribute_name: &str) -> Option<LocatedValue<'a>> {
    let needle = format!("{attribute_name}=\"");
    let start = memmem::find(element_text.as_bytes(), needle.as_bytes())?;
    let value_start = start + needle.len();
    let rel_end = memchr::memchr(b'"', &element_text.as_bytes()[value_start..])?;

    Some(LocatedValue {
        form: AttributeForm::Inline,
        offset: value_start,
        len: rel_end,
        value: &element_text[value_start..value_start + rel_end],
    })
}

/// The element's bare name: everything from after `<` to the first space or `>`
pub fn bare_element_name(element_text: &str) -> &str {
    let body = element_text.strip_prefix('<').unwrap_or(element_text);
    let end = body
        .as_bytes()
        .iter()
        .position(|&b| is_whitespace(b) || b == b'>' || b == b'/')
        .unwrap_or(body.len());
    &body[..end]
}

/// Locate `<{ElementName}.{name}> ... </{ElementName}.{name}>`
fn find_property_element<'a>(
    element_text: &'a str,
    attribute_name: &str,
) -> Option<LocatedValue<'a>> {
    let element_name = bare_element_name(element_text);
    if element_name.is_empty() {
        return None;
    }

    let opener = format!("<{element_name}.{attribute_name}>");
    let closer = format!("</{element_name}.{attribute_name}>");

    let open_at = memmem::find(element_text.as_bytes(), opener.as_bytes())?;
    let close_at = memmem::find(element_text.as_bytes(), closer.as_bytes())?;
    if close_at < open_at {
        return None;
    }

    let value_start = open_at + opener.len();
    Some(LocatedValue {
        form: AttributeForm::Element,
        offset: value_start,
        len: close_at - value_start,
        value: &element_text[value_start..close_at],
    })
}

/// Locate plain inner text between the opening tag and the final closer
///
/// Only qualifies when the content is non-whitespace and does not itself
/// start with `<` (nested markup is not a default value).
fn find_default_value(element_text: &str) -> Option<LocatedValue<'_>> {
    let element_name = bare_element_name(element_text);
    if element_name.is_empty() {
        return None;
    }

    let bytes = element_text.as_bytes();
    let open_end = super::scanner::Scanner::new(bytes).find_tag_end_quoted()?;
    // Self-closing tags have no inner content
    if open_end > 0 && bytes[open_end - 1] == b'/' {
        return None;
    }

    let closer = format!("</{element_name}>");
    let close_at = memmem::rfind(bytes, closer.as_bytes())?;
    if close_at < open_end + 1 {
        return None;
    }

    let content = &element_text[open_end + 1..close_at];
    let trimmed = content.trim();
    if trimmed.is_empty() || trimmed.starts_with('<') {
        return None;
    }

    let lead = content.len() - content.trim_start().len();
    Some(LocatedValue {
        form: AttributeForm::DefaultValue,
        offset: open_end + 1 + lead,
        len: trimmed.len(),
        value: trimmed,
    })
}

/// Whether a located value should trigger string analysis.
///
/// Only values whose first character is a letter or digit are interesting:
/// this filters out binding expressions (`{Binding ...}`, `{x:Bind ...}`),
/// empty strings, and whitespace-only values.
pub fn value_is_interesting(value: &str) -> bool {
    value.chars().next().is_some_and(|c| c.is_alphanumeric())
}
