//! Grid row/column rewriter
//!
//! Rewrites `Grid.Row` / `Grid.Column` indices when a new definition is
//! inserted: nested grids are fenced off as exclusion ranges, shift
//! replacements are generated highest-index-first so no value is rewritten
//! twice, and the replacement scan skips matches inside any exclusion.

use memchr::{memmem, memrchr};

/// One text edit against the original input, for in-place application by
/// a host editing API. `start == end` is a pure insertion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Edit {
    pub start: usize,
    pub end: usize,
    pub replacement: String,
}

/// The composed result of a row/column insertion, with the intermediate
/// artifacts kept for inspection
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RowInsertion {
    /// The rewritten grid text
    pub text: String,
    /// Nested-grid ranges that were protected from renumbering
    pub exclusions: Vec<(usize, usize)>,
    /// The (find, replace) pairs that were applied
    pub replacements: Vec<(String, String)>,
    /// Equivalent edit list against the original text, in application order
    pub edits: Vec<Edit>,
}

/// Byte ranges of nested `<Grid>` elements within `grid_text`, each paired
/// with the nearest-following literal `</Grid>`.
///
/// Deliberately not a depth-balanced scan: an inner grid-in-grid-in-grid
/// whose closer appears before the correct one will mis-pair. Ranges are
/// non-overlapping and in source order; the scan resumes after each closed
/// range.
pub fn exclusions(grid_text: &str) -> Vec<(usize, usize)> {
    const CLOSER: &[u8] = b"</Grid>";
    let bytes = grid_text.as_bytes();
    let mut ranges = Vec::new();

    // Start past the outer grid's own `<`
    let mut pos = 1;
    while pos < bytes.len() {
        let open = match memmem::find(&bytes[pos..], b"<Grid") {
            Some(i) => pos + i,
            None => break,
        };
        let boundary = matches!(
            bytes.get(open + 5),
            None | Some(b' ') | Some(b'\t') | Some(b'\n') | Some(b'\r') | Some(b'>') | Some(b'/')
        );
        if !boundary {
            pos = open + 1;
            continue;
        }
        let close_end = match memmem::find(&bytes[open..], CLOSER) {
            Some(i) => open + i + CLOSER.len(),
            None => break,
        };
        ranges.push((open, close_end));
        pos = close_end;
    }
    ranges
}

/// Find/replace pairs shifting `Grid.Row="i"` to `"i+1"` for every row at
/// or above the insertion index, highest first. `None` (no resolvable row
/// context) produces an empty list, letting insertion proceed shift-free.
pub fn row_shift_replacements(
    insert_row: Option<usize>,
    total_rows: usize,
) -> Vec<(String, String)> {
    shift_replacements("Grid.Row", insert_row, total_rows)
}

/// Column counterpart of [`row_shift_replacements`]
pub fn column_shift_replacements(
    insert_column: Option<usize>,
    total_columns: usize,
) -> Vec<(String, String)> {
    shift_replacements("Grid.Column", insert_column, total_columns)
}

fn shift_replacements(
    attribute: &str,
    insert_at: Option<usize>,
    total: usize,
) -> Vec<(String, String)> {
    let Some(insert_at) = insert_at else {
        return Vec::new();
    };
    // Descending, so a value rewritten to i+1 is never found again by the
    // later pass looking for i+1
    (insert_at..total)
        .rev()
        .map(|i| {
            (
                format!(" {attribute}=\"{i}\""),
                format!(" {attribute}=\"{}\"", i + 1),
            )
        })
        .collect()
}

/// Apply each (find, replace) pair left to right, skipping matches whose
/// offset lies inside any exclusion range
pub fn apply_replacements(
    text: &str,
    replacements: &[(String, String)],
    exclusions: &[(usize, usize)],
) -> String {
    let mut result = text.to_string();
    for (find, replace) in replacements {
        result = apply_one(&result, find, replace, exclusions);
    }
    result
}

fn apply_one(text: &str, find: &str, replace: &str, exclusions: &[(usize, usize)]) -> String {
    let bytes = text.as_bytes();
    let mut out = String::with_capacity(text.len());
    let mut pos = 0;
    while pos < text.len() {
        let at = match memmem::find(&bytes[pos..], find.as_bytes()) {
            Some(i) => pos + i,
            None => {
                out.push_str(&text[pos..]);
                return out;
            }
        };
        out.push_str(&text[pos..at]);
        if is_excluded(at, exclusions) {
            out.push_str(find);
        } else {
            out.push_str(replace);
        }
        pos = at + find.len();
    }
    out
}

fn is_excluded(offset: usize, exclusions: &[(usize, usize)]) -> bool {
    exclusions.iter().any(|&(start, end)| offset >= start && offset < end)
}

/// Insert definition markup immediately before `insert_offset`, indented
/// to match the anchor line's existing leading whitespace
pub fn insert_row_definition(grid_text: &str, insert_offset: usize, definition: &str) -> String {
    let indent = line_indent(grid_text, insert_offset);
    let mut out = String::with_capacity(grid_text.len() + definition.len() + indent.len() + 1);
    out.push_str(&grid_text[..insert_offset]);
    out.push_str(definition);
    out.push('\n');
    out.push_str(indent);
    out.push_str(&grid_text[insert_offset..]);
    out
}

fn line_indent(text: &str, offset: usize) -> &str {
    let bytes = text.as_bytes();
    let line_start = memrchr(b'\n', &bytes[..offset]).map(|i| i + 1).unwrap_or(0);
    let indent_len = bytes[line_start..offset]
        .iter()
        .take_while(|&&b| b == b' ' || b == b'\t')
        .count();
    &text[line_start..line_start + indent_len]
}

/// The composed row insertion: compute exclusions, shift every
/// `Grid.Row` at or above `row_index` by one (outside nested grids), and
/// insert a new `<RowDefinition>` with the given height at the index's
/// position in the definitions list
pub fn insert_row(
    grid_text: &str,
    row_index: usize,
    total_rows: usize,
    height: &str,
) -> RowInsertion {
    let exclusions = exclusions(grid_text);
    let replacements = row_shift_replacements(Some(row_index), total_rows);

    let shifted = apply_replacements(grid_text, &replacements, &exclusions);

    let definition = format!("<RowDefinition Height=\"{height}\" />");
    let original_anchor = row_definition_anchor(grid_text, row_index);
    let shifted_anchor = row_definition_anchor(&shifted, row_index);
    let text = match shifted_anchor {
        Some(anchor) => insert_row_definition(&shifted, anchor, &definition),
        None => shifted,
    };

    let mut edits = replacement_edits(grid_text, &replacements, &exclusions);
    if let Some(anchor) = original_anchor {
        let indent = line_indent(grid_text, anchor);
        edits.push(Edit {
            start: anchor,
            end: anchor,
            replacement: format!("{definition}\n{indent}"),
        });
    }

    RowInsertion {
        text,
        exclusions,
        replacements,
        edits,
    }
}

/// Edit-list form of the guarded substitution, against the original text
pub fn replacement_edits(
    text: &str,
    replacements: &[(String, String)],
    exclusions: &[(usize, usize)],
) -> Vec<Edit> {
    let bytes = text.as_bytes();
    let mut edits = Vec::new();
    for (find, replace) in replacements {
        let mut pos = 0;
        while let Some(i) = memmem::find(&bytes[pos..], find.as_bytes()) {
            let at = pos + i;
            if !is_excluded(at, exclusions) {
                edits.push(Edit {
                    start: at,
                    end: at + find.len(),
                    replacement: replace.clone(),
                });
            }
            pos = at + find.len();
        }
    }
    edits
}

/// Offset of the `row_index`-th `<RowDefinition` inside the grid's
/// `<Grid.RowDefinitions>` block, or of the block's closer when the index
/// is past the end
fn row_definition_anchor(grid_text: &str, row_index: usize) -> Option<usize> {
    let bytes = grid_text.as_bytes();
    let block = memmem::find(bytes, b"<Grid.RowDefinitions")?;
    let block_end = memmem::find(&bytes[block..], b"</Grid.RowDefinitions>")
        .map(|i| block + i)?;

    let mut pos = block + 1;
    let mut seen = 0;
    while pos < block_end {
        let at = match memmem::find(&bytes[pos..block_end], b"<RowDefinition") {
            Some(i) => pos + i,
            None => break,
        };
        // Not the closer and not the block opener itself
        if bytes.get(at + 14) != Some(&b's') {
            if seen == row_index {
                return Some(at);
            }
            seen += 1;
        }
        pos = at + 14;
    }
    Some(block_end)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_sibling_nested_grid_exclusions() {
        let text = "<Grid>\
            <Grid><TextBlock Grid.Row=\"0\" /></Grid>\
            <Border />\
            <Grid><TextBlock Grid.Row=\"1\" /></Grid>\
        </Grid>";
        let ranges = exclusions(text);
        assert_eq!(ranges.len(), 2);
        let (a1, b1) = ranges[0];
        let (a2, b2) = ranges[1];
        assert!(a1 < b1 && b1 <= a2 && a2 < b2);
        assert_eq!(&text[a1..a1 + 5], "<Grid");
        assert_eq!(&text[b1 - 7..b1], "</Grid>");
    }

    #[test]
    fn test_exclusions_ignore_grid_prefixed_names() {
        let text = "<Grid><Grid.RowDefinitions></Grid.RowDefinitions></Grid>";
        assert!(exclusions(text).is_empty());
    }

    #[test]
    fn test_replacement_list_shape() {
        let replacements = row_shift_replacements(Some(1), 3);
        assert_eq!(
            replacements,
            vec![
                (" Grid.Row=\"2\"".to_string(), " Grid.Row=\"3\"".to_string()),
                (" Grid.Row=\"1\"".to_string(), " Grid.Row=\"2\"".to_string()),
            ]
        );
        assert!(row_shift_replacements(None, 3).is_empty());
        assert!(row_shift_replacements(Some(3), 3).is_empty());
    }

    #[test]
    fn test_no_double_shift() {
        // Rows 0..4, insert at 1: rows 1-3 shift once each, row 0 untouched
        let text = "<a Grid.Row=\"0\" /><b Grid.Row=\"1\" /><c Grid.Row=\"2\" /><d Grid.Row=\"3\" />";
        let replacements = row_shift_replacements(Some(1), 4);
        let result = apply_replacements(text, &replacements, &[]);
        assert_eq!(
            result,
            "<a Grid.Row=\"0\" /><b Grid.Row=\"2\" /><c Grid.Row=\"3\" /><d Grid.Row=\"4\" />"
        );
    }

    #[test]
    fn test_excluded_matches_skipped() {
        let text = "<Grid>\
            <TextBlock Grid.Row=\"1\" />\
            <Grid><TextBlock Grid.Row=\"1\" /></Grid>\
        </Grid>";
        let ranges = exclusions(text);
        let replacements = row_shift_replacements(Some(0), 2);
        let result = apply_replacements(text, &replacements, &ranges);
        // Outer reference shifted, nested one untouched
        assert_eq!(
            result,
            "<Grid>\
            <TextBlock Grid.Row=\"2\" />\
            <Grid><TextBlock Grid.Row=\"1\" /></Grid>\
        </Grid>"
        );
    }

    #[test]
    fn test_insert_definition_matches_indentation() {
        let text = "<Grid>\n        <RowDefinition Height=\"*\" />\n</Grid>";
        let anchor = text.find("<RowDefinition").unwrap();
        let result = insert_row_definition(text, anchor, "<RowDefinition Height=\"Auto\" />");
        assert_eq!(
            result,
            "<Grid>\n        <RowDefinition Height=\"Auto\" />\n        <RowDefinition Height=\"*\" />\n</Grid>"
        );
    }

    #[test]
    fn test_insert_row_end_to_end() {
        let input = "<Grid>\n\
    <Grid.RowDefinitions>\n\
        <RowDefinition Height=\"*\" />\n\
        <RowDefinition Height=\"Auto\" />\n\
        <RowDefinition Height=\"*\" />\n\
    </Grid.RowDefinitions>\n\
    <TextBlock Text=\"Footer\" Grid.Row=\"2\" />\n\
</Grid>";

        let result = insert_row(input, 1, 3, "XXX");

        // Row order after insertion at index 1: *, XXX, Auto, *; the
        // footer's row reference shifts from 2 to 3
        let expected = "<Grid>\n\
    <Grid.RowDefinitions>\n\
        <RowDefinition Height=\"*\" />\n\
        <RowDefinition Height=\"XXX\" />\n\
        <RowDefinition Height=\"Auto\" />\n\
        <RowDefinition Height=\"*\" />\n\
    </Grid.RowDefinitions>\n\
    <TextBlock Text=\"Footer\" Grid.Row=\"3\" />\n\
</Grid>";
        assert_eq!(result.text, expected);
        assert_eq!(result.replacements.len(), 2);
        assert!(result.exclusions.is_empty());
    }

    #[test]
    fn test_insert_row_edit_list() {
        let input = "<Grid>\n\
    <Grid.RowDefinitions>\n\
        <RowDefinition Height=\"*\" />\n\
        <RowDefinition Height=\"Auto\" />\n\
    </Grid.RowDefinitions>\n\
    <TextBlock Grid.Row=\"1\" />\n\
</Grid>";
        let result = insert_row(input, 1, 2, "XXX");

        // One shift edit (row 1 -> 2) and one insertion edit
        assert_eq!(result.edits.len(), 2);
        let shift = &result.edits[0];
        assert_eq!(
            &input[shift.start..shift.end],
            " Grid.Row=\"1\""
        );
        assert_eq!(shift.replacement, " Grid.Row=\"2\"");
        let insertion = &result.edits[1];
        assert_eq!(insertion.start, insertion.end);
        assert!(insertion.replacement.starts_with("<RowDefinition Height=\"XXX\" />"));
        assert_eq!(insertion.start, input.find("<RowDefinition Height=\"Auto\"").unwrap());
    }

    #[test]
    fn test_insert_past_end_appends_before_block_closer() {
        let input = "<Grid>\n\
    <Grid.RowDefinitions>\n\
        <RowDefinition Height=\"*\" />\n\
    </Grid.RowDefinitions>\n\
</Grid>";
        let result = insert_row(input, 1, 1, "Auto");
        let star = result.text.find("Height=\"*\"").unwrap();
        let auto = result.text.find("Height=\"Auto\"").unwrap();
        assert!(auto > star);
        assert!(result.text.contains("</Grid.RowDefinitions>"));
    }
}
