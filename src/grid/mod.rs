//! Grid-specific text mutation

pub mod rewriter;

pub use rewriter::{
    apply_replacements, column_shift_replacements, exclusions, insert_row,
    insert_row_definition, replacement_edits, row_shift_replacements, Edit, RowInsertion,
};
