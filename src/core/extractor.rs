//! Streaming element extractor
//!
//! Walks raw XAML text in a single left-to-right scan, tracking nested
//! element boundaries with a stack of tracking frames, and dispatches every
//! fully-closed element to registered handlers. Comments and processing
//! instructions suppress all tracking until their terminator. Malformed
//! closers (no matching open frame) are ignored silently: the effect of
//! bad markup is fewer dispatched elements, never a failure.
//!
//! Elements are dispatched at their closing point, so a parent is always
//! dispatched after all of its children have been scanned.

use std::collections::HashMap;

use crate::core::matcher::target_matches;
use crate::core::scanner::{is_name_char, is_name_start_char, Scanner};
use crate::error::Error;

/// Per-document context threaded to every handler invocation.
///
/// Captures the xmlns alias declarations of the first parsed opening tag,
/// so handlers can do alias-aware attribute matching (e.g. resolving which
/// prefix maps to the `x:` namespace for `x:Bind`).
#[derive(Debug, Clone, Default)]
pub struct DocumentContext {
    /// Alias -> namespace URI; the default (unprefixed) namespace is keyed by ""
    pub xmlns_aliases: HashMap<String, String>,
}

/// One fully-closed element discovered by the extractor
#[derive(Debug, Clone)]
pub struct ExtractedElement<'a> {
    /// Element name as written, possibly with namespace prefix
    pub name: &'a str,
    /// Absolute byte offset of the element's `<` in the document
    pub offset: usize,
    /// Full element text including children
    pub text: &'a str,
    /// Opening tag with all inner content elided (`<Foo a="1"></Foo>`);
    /// identical to `text` for self-closing elements
    pub opening_tag: String,
    /// Leading whitespace of the line the element starts on
    pub line_indent: String,
}

/// Receiver for extracted elements
pub trait ExtractHandler {
    /// Element type this handler applies to: a plain name or a wildcard
    /// pattern (see [`crate::core::matcher`])
    fn target_type(&self) -> &str;

    /// Built-in handlers have their failures propagated; failures from
    /// external handlers are logged and suppressed
    fn built_in(&self) -> bool {
        false
    }

    fn on_element(
        &mut self,
        element: &ExtractedElement<'_>,
        ctx: &DocumentContext,
    ) -> Result<(), Error>;
}

/// Transient stack entry for one open element
struct TrackingFrame {
    /// Element name as written
    name: String,
    /// Offset of the opening `<`
    start: usize,
    /// Leading whitespace of the line the opening tag started on
    indent: String,
}

/// Streaming extractor over one document
pub struct ElementExtractor;

impl ElementExtractor {
    /// Walk `text`, dispatching every fully-closed element to `catch_all`
    /// first and then to every type-matching handler in registration order.
    ///
    /// Returns the captured document context.
    pub fn extract(
        text: &str,
        handlers: &mut [&mut dyn ExtractHandler],
        catch_all: &mut dyn ExtractHandler,
    ) -> Result<DocumentContext, Error> {
        let ctx = DocumentContext {
            xmlns_aliases: capture_xmlns_aliases(text),
        };

        let bytes = text.as_bytes();
        let mut stack: Vec<TrackingFrame> = Vec::with_capacity(16);

        // Lexical mode
        let mut in_comment = false;
        let mut in_pi = false;
        let mut in_tag = false;
        let mut in_quote = false;

        // Current tag being read: name region and closing-name region are
        // contiguous byte ranges sliced out of the input
        let mut identifying = false;
        let mut name_start = 0usize;
        let mut name_len = 0usize;
        let mut current_name: Option<(usize, usize)> = None;
        let mut tag_start = 0usize;
        let mut closing = false;
        let mut closing_name_start = 0usize;
        let mut closing_name_len = 0usize;

        // Leading indentation of the current line (for fix-up formatting)
        let mut indent_start = 0usize;
        let mut indent_len = 0usize;
        let mut collecting_indent = true;

        let mut i = 0usize;
        while i < bytes.len() {
            let b = bytes[i];

            if in_comment {
                if b == b'>' && i >= 2 && &bytes[i - 2..i] == b"--" {
                    in_comment = false;
                }
                i += 1;
                continue;
            }
            if in_pi {
                if b == b'>' && i >= 1 && bytes[i - 1] == b'?' {
                    in_pi = false;
                }
                i += 1;
                continue;
            }

            if b == b'\n' {
                if in_tag {
                    // A tag spanning lines: its frame belongs to the line it
                    // started on, so push before the indent state moves
                    if identifying && name_len > 0 {
                        current_name = Some((name_start, name_len));
                        push_frame(
                            &mut stack,
                            text,
                            name_start,
                            name_len,
                            tag_start,
                            indent_start,
                            indent_len,
                        );
                        identifying = false;
                    }
                } else {
                    indent_start = i + 1;
                    indent_len = 0;
                    collecting_indent = true;
                }
                i += 1;
                continue;
            }
            if collecting_indent && !in_tag {
                if b == b' ' || b == b'\t' {
                    indent_len += 1;
                    i += 1;
                    continue;
                }
                collecting_indent = false;
            }

            if in_tag && b == b'"' {
                in_quote = !in_quote;
                i += 1;
                continue;
            }
            if in_quote {
                i += 1;
                continue;
            }

            match b {
                b'<' => {
                    if bytes[i..].starts_with(b"<!--") {
                        in_comment = true;
                        i += 4;
                        continue;
                    }
                    if bytes.get(i + 1) == Some(&b'?') {
                        in_pi = true;
                        i += 2;
                        continue;
                    }
                    in_tag = true;
                    tag_start = i;
                    identifying = true;
                    name_start = i + 1;
                    name_len = 0;
                    current_name = None;
                    closing = false;
                    closing_name_len = 0;
                }
                b'/' if in_tag => {
                    // Either `</Name>` (name follows) or a self-closing `/>`
                    closing = true;
                    closing_name_start = i + 1;
                    closing_name_len = 0;
                    if identifying && name_len > 0 {
                        // `<Name/>` with no attributes: the slash terminates
                        // the name, and the frame must exist before the `>`
                        // resolves it
                        current_name = Some((name_start, name_len));
                        push_frame(
                            &mut stack,
                            text,
                            name_start,
                            name_len,
                            tag_start,
                            indent_start,
                            indent_len,
                        );
                        identifying = false;
                    }
                }
                b'>' if in_tag => {
                    in_tag = false;

                    // An unterminated element name means an attribute-less
                    // tag: push its frame before resolving
                    if identifying && name_len > 0 {
                        current_name = Some((name_start, name_len));
                        push_frame(
                            &mut stack,
                            text,
                            name_start,
                            name_len,
                            tag_start,
                            indent_start,
                            indent_len,
                        );
                        identifying = false;
                    }

                    if closing {
                        // Resolve which frame is being closed: prefer the
                        // explicit closing name, fall back to the current
                        // tag's name, then to the top of the stack
                        let resolved: Option<String> = if closing_name_len > 0 {
                            Some(
                                text[closing_name_start..closing_name_start + closing_name_len]
                                    .to_string(),
                            )
                        } else if let Some((ns, nl)) = current_name {
                            Some(text[ns..ns + nl].to_string())
                        } else {
                            stack.last().map(|f| f.name.clone())
                        };

                        // Pop only on an exact name match at the top of the
                        // stack; a mismatched closer is malformed markup and
                        // leaves the stack untouched
                        let matches_top = match (&resolved, stack.last()) {
                            (Some(name), Some(top)) => top.name == *name,
                            _ => false,
                        };

                        if let Some(frame) = matches_top.then(|| stack.pop()).flatten() {
                            let full = &text[frame.start..i + 1];
                            let element = ExtractedElement {
                                name: &text[frame.start + 1
                                    ..frame.start + 1 + frame.name.len()],
                                offset: frame.start,
                                text: full,
                                opening_tag: elide_children(full),
                                line_indent: frame.indent,
                            };
                            dispatch(&element, &ctx, handlers, catch_all)?;
                        }
                    }

                    closing = false;
                    identifying = false;
                    current_name = None;
                }
                c if identifying && is_name_or_start(c, name_len, i, name_start) => {
                    name_len += 1;
                }
                c if closing
                    && closing_name_len == 0
                    && i == closing_name_start
                    && is_name_start_char(c) =>
                {
                    closing_name_len = 1;
                }
                c if closing
                    && closing_name_len > 0
                    && i == closing_name_start + closing_name_len
                    && is_name_char(c) =>
                {
                    closing_name_len += 1;
                }
                b' ' | b'\t' | b'\r' if identifying && name_len > 0 => {
                    // Attributes follow; the element is now a known frame
                    current_name = Some((name_start, name_len));
                    push_frame(
                        &mut stack,
                        text,
                        name_start,
                        name_len,
                        tag_start,
                        indent_start,
                        indent_len,
                    );
                    identifying = false;
                }
                _ => {
                    // Whitespace or stray bytes between a closing name and
                    // its `>` (`</Grid >`) are inert; the tag stays open
                    // until the `>` resolves it
                    if identifying && name_len == 0 && !closing {
                        // `<` not followed by a name character: not a tag
                        identifying = false;
                        in_tag = false;
                    }
                }
            }

            i += 1;
        }

        Ok(ctx)
    }
}

fn is_name_or_start(b: u8, name_len: usize, pos: usize, name_start: usize) -> bool {
    if pos != name_start + name_len {
        return false;
    }
    if name_len == 0 {
        is_name_start_char(b)
    } else {
        is_name_char(b)
    }
}

#[allow(clippy::too_many_arguments)]
fn push_frame(
    stack: &mut Vec<TrackingFrame>,
    text: &str,
    name_start: usize,
    name_len: usize,
    tag_start: usize,
    indent_start: usize,
    indent_len: usize,
) {
    stack.push(TrackingFrame {
        name: text[name_start..name_start + name_len].to_string(),
        start: tag_start,
        indent: text[indent_start..indent_start + indent_len].to_string(),
    });
}

fn dispatch(
    element: &ExtractedElement<'_>,
    ctx: &DocumentContext,
    handlers: &mut [&mut dyn ExtractHandler],
    catch_all: &mut dyn ExtractHandler,
) -> Result<(), Error> {
    run_handler(catch_all, element, ctx)?;

    for handler in handlers.iter_mut() {
        if target_matches(
            handler.target_type(),
            element.name,
            &element.opening_tag,
            element.text,
        ) {
            run_handler(*handler, element, ctx)?;
        }
    }
    Ok(())
}

/// Invoke one handler, propagating failures only for built-in handlers
fn run_handler(
    handler: &mut dyn ExtractHandler,
    element: &ExtractedElement<'_>,
    ctx: &DocumentContext,
) -> Result<(), Error> {
    match handler.on_element(element, ctx) {
        Ok(()) => Ok(()),
        Err(err) if handler.built_in() => Err(err),
        Err(err) => {
            log::error!(
                "external handler '{}' failed on <{}>: {err}",
                handler.target_type(),
                element.name
            );
            Ok(())
        }
    }
}

/// Derive the opening-tag-only form: strip everything between the first
/// unquoted `>` of the opening tag and the final closer
fn elide_children(full: &str) -> String {
    let bytes = full.as_bytes();
    let open_end = match Scanner::new(bytes).find_tag_end_quoted() {
        Some(pos) => pos,
        None => return full.to_string(),
    };
    // Self-closing: nothing to elide
    if open_end > 0 && bytes[open_end - 1] == b'/' {
        return full.to_string();
    }
    match full.rfind("</") {
        Some(close_start) if close_start > open_end => {
            let mut out = String::with_capacity(open_end + 1 + (full.len() - close_start));
            out.push_str(&full[..open_end + 1]);
            out.push_str(&full[close_start..]);
            out
        }
        _ => full.to_string(),
    }
}

/// Capture `xmlns` alias declarations from the first opening tag
fn capture_xmlns_aliases(text: &str) -> HashMap<String, String> {
    let mut aliases = HashMap::new();

    let Some(open_tag) = first_opening_tag(text) else {
        return aliases;
    };

    let bytes = open_tag.as_bytes();
    for found in memchr::memmem::find_iter(bytes, b"xmlns") {
        // Must be attribute-position: preceded by whitespace
        if found == 0 || !crate::core::scanner::is_whitespace(bytes[found - 1]) {
            continue;
        }
        let rest = &open_tag[found + 5..];
        let (alias, after) = if let Some(stripped) = rest.strip_prefix(':') {
            let end = stripped
                .as_bytes()
                .iter()
                .position(|&b| !is_name_char(b))
                .unwrap_or(stripped.len());
            (&stripped[..end], &stripped[end..])
        } else {
            ("", rest)
        };
        if let Some(value_part) = after.strip_prefix("=\"") {
            if let Some(end_quote) = value_part.find('"') {
                aliases.insert(alias.to_string(), value_part[..end_quote].to_string());
            }
        }
    }

    aliases
}

/// Slice the first real opening tag, skipping comments and processing
/// instructions before the root element
fn first_opening_tag(text: &str) -> Option<&str> {
    let bytes = text.as_bytes();
    let mut scanner = Scanner::new(bytes);

    loop {
        let lt = scanner.find_byte(b'<')?;
        scanner.set_position(lt);
        if scanner.starts_with(b"<!--") {
            let close = scanner.find_substring(b"-->")?;
            scanner.set_position(close + 3);
            continue;
        }
        if scanner.peek_at(1) == Some(b'?') {
            let close = scanner.find_substring(b"?>")?;
            scanner.set_position(close + 2);
            continue;
        }
        if scanner.peek_at(1).is_some_and(is_name_start_char) {
            scanner.set_position(lt);
            let end = scanner.find_tag_end_quoted()?;
            return Some(&text[lt..=end]);
        }
        scanner.set_position(lt + 1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Collects every dispatched element
    struct Collector {
        target: String,
        built_in: bool,
        seen: Vec<(String, usize, String)>,
    }

    impl Collector {
        fn new(target: &str) -> Self {
            Self {
                target: target.to_string(),
                built_in: false,
                seen: Vec::new(),
            }
        }
    }

    impl ExtractHandler for Collector {
        fn target_type(&self) -> &str {
            &self.target
        }

        fn built_in(&self) -> bool {
            self.built_in
        }

        fn on_element(
            &mut self,
            element: &ExtractedElement<'_>,
            _ctx: &DocumentContext,
        ) -> Result<(), Error> {
            self.seen
                .push((element.name.to_string(), element.offset, element.text.to_string()));
            Ok(())
        }
    }

    fn extract_all(text: &str) -> Vec<(String, usize, String)> {
        let mut catch_all = Collector::new("");
        ElementExtractor::extract(text, &mut [], &mut catch_all).unwrap();
        catch_all.seen
    }

    #[test]
    fn test_single_self_closing() {
        let seen = extract_all(r#"<TextBlock Text="Hi" />"#);
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].0, "TextBlock");
        assert_eq!(seen[0].1, 0);
    }

    #[test]
    fn test_attribute_less_tag() {
        let seen = extract_all("<Grid></Grid>");
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].2, "<Grid></Grid>");
    }

    #[test]
    fn test_children_dispatched_before_parent() {
        let seen = extract_all("<StackPanel><TextBlock /><Button /></StackPanel>");
        let names: Vec<_> = seen.iter().map(|e| e.0.as_str()).collect();
        assert_eq!(names, ["TextBlock", "Button", "StackPanel"]);
    }

    #[test]
    fn test_extraction_completeness() {
        // All five elements dispatched, each span reproduces the source verbatim
        let text = r#"<Page>
    <Grid>
        <TextBlock Text="One" />
        <Border><TextBlock Text="Two" /></Border>
    </Grid>
</Page>"#;
        let seen = extract_all(text);
        assert_eq!(seen.len(), 5);
        for (_, offset, span_text) in &seen {
            assert_eq!(&text[*offset..*offset + span_text.len()], span_text);
        }
    }

    #[test]
    fn test_same_name_at_multiple_depths() {
        let text = "<Grid><Grid><TextBlock /></Grid></Grid>";
        let seen = extract_all(text);
        assert_eq!(seen.len(), 3);
        // Inner grid closes first
        assert_eq!(seen[1].2, "<Grid><TextBlock /></Grid>");
        assert_eq!(seen[2].2, text);
    }

    #[test]
    fn test_comment_suppresses_tracking() {
        let seen = extract_all("<Grid><!-- <TextBlock /> --></Grid>");
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].0, "Grid");
    }

    #[test]
    fn test_processing_instruction_ignored() {
        let seen = extract_all("<?xml version=\"1.0\"?><Grid />");
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].0, "Grid");
    }

    #[test]
    fn test_unmatched_closer_ignored() {
        let seen = extract_all("<Grid></Border></Grid>");
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].0, "Grid");
    }

    #[test]
    fn test_whitespace_before_closer_gt() {
        // `</Grid >` is well-formed; the trailing space must not abandon
        // the closing tag or strand the enclosing frames
        let seen = extract_all("<Page><Grid><TextBlock /></Grid ></Page>");
        let names: Vec<&str> = seen.iter().map(|(n, _, _)| n.as_str()).collect();
        assert_eq!(names, ["TextBlock", "Grid", "Page"]);
    }

    #[test]
    fn test_gt_in_attribute_value() {
        let seen = extract_all(r#"<TextBlock Text="a > b" />"#);
        assert_eq!(seen.len(), 1);
        assert_eq!(seen[0].2, r#"<TextBlock Text="a > b" />"#);
    }

    #[test]
    fn test_opening_tag_elides_children() {
        let mut catch_all = Collector::new("");
        let mut elements: Vec<String> = Vec::new();

        struct Grabber<'a>(&'a mut Vec<String>);
        impl ExtractHandler for Grabber<'_> {
            fn target_type(&self) -> &str {
                "StackPanel"
            }
            fn on_element(
                &mut self,
                element: &ExtractedElement<'_>,
                _ctx: &DocumentContext,
            ) -> Result<(), Error> {
                self.0.push(element.opening_tag.clone());
                Ok(())
            }
        }

        let mut grabber = Grabber(&mut elements);
        let mut handlers: [&mut dyn ExtractHandler; 1] = [&mut grabber];
        ElementExtractor::extract(
            r#"<StackPanel Spacing="4"><TextBlock /></StackPanel>"#,
            &mut handlers,
            &mut catch_all,
        )
        .unwrap();

        assert_eq!(elements, [r#"<StackPanel Spacing="4"></StackPanel>"#]);
    }

    #[test]
    fn test_typed_handler_matching() {
        let mut catch_all = Collector::new("");
        let mut typed = Collector::new("TextBlock");
        let mut handlers: [&mut dyn ExtractHandler; 1] = [&mut typed];
        ElementExtractor::extract(
            "<Grid><TextBlock /><ctl:TextBlock /><Button /></Grid>",
            &mut handlers,
            &mut catch_all,
        )
        .unwrap();

        assert_eq!(catch_all.seen.len(), 4);
        // Exact and local-name matches both fire
        assert_eq!(typed.seen.len(), 2);
    }

    #[test]
    fn test_external_handler_error_is_suppressed() {
        struct Failing;
        impl ExtractHandler for Failing {
            fn target_type(&self) -> &str {
                "TextBlock"
            }
            fn on_element(
                &mut self,
                _element: &ExtractedElement<'_>,
                _ctx: &DocumentContext,
            ) -> Result<(), Error> {
                Err(Error::analyzer("Failing", "boom"))
            }
        }

        let mut catch_all = Collector::new("");
        let mut failing = Failing;
        let mut handlers: [&mut dyn ExtractHandler; 1] = [&mut failing];
        let result = ElementExtractor::extract(
            "<Grid><TextBlock /></Grid>",
            &mut handlers,
            &mut catch_all,
        );
        assert!(result.is_ok());
        assert_eq!(catch_all.seen.len(), 2);
    }

    #[test]
    fn test_builtin_handler_error_propagates() {
        struct FailingBuiltin;
        impl ExtractHandler for FailingBuiltin {
            fn target_type(&self) -> &str {
                "TextBlock"
            }
            fn built_in(&self) -> bool {
                true
            }
            fn on_element(
                &mut self,
                _element: &ExtractedElement<'_>,
                _ctx: &DocumentContext,
            ) -> Result<(), Error> {
                Err(Error::analyzer("FailingBuiltin", "defect"))
            }
        }

        let mut catch_all = Collector::new("");
        let mut failing = FailingBuiltin;
        let mut handlers: [&mut dyn ExtractHandler; 1] = [&mut failing];
        let result = ElementExtractor::extract(
            "<Grid><TextBlock /></Grid>",
            &mut handlers,
            &mut catch_all,
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_xmlns_alias_capture() {
        let text = r#"<Page xmlns="http://schemas.microsoft.com/winfx/2006/xaml/presentation"
    xmlns:x="http://schemas.microsoft.com/winfx/2006/xaml">
    <Grid />
</Page>"#;
        let mut catch_all = Collector::new("");
        let ctx = ElementExtractor::extract(text, &mut [], &mut catch_all).unwrap();
        assert_eq!(
            ctx.xmlns_aliases.get("x").map(String::as_str),
            Some("http://schemas.microsoft.com/winfx/2006/xaml")
        );
        assert_eq!(
            ctx.xmlns_aliases.get("").map(String::as_str),
            Some("http://schemas.microsoft.com/winfx/2006/xaml/presentation")
        );
    }

    #[test]
    fn test_line_indent_captured() {
        let text = "<Grid>\n    <TextBlock />\n</Grid>";

        struct IndentGrabber(Vec<String>);
        impl ExtractHandler for IndentGrabber {
            fn target_type(&self) -> &str {
                ""
            }
            fn on_element(
                &mut self,
                element: &ExtractedElement<'_>,
                _ctx: &DocumentContext,
            ) -> Result<(), Error> {
                self.0.push(element.line_indent.clone());
                Ok(())
            }
        }

        let mut grabber = IndentGrabber(Vec::new());
        ElementExtractor::extract(text, &mut [], &mut grabber).unwrap();
        assert_eq!(grabber.0, ["    ", ""]);
    }
}
