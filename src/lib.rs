//! xamlint - Incremental XAML element extraction and structural analysis
//!
//! Pipeline:
//! raw text -> element extractor (streaming byte scan) -> per-element spans
//! -> attribute/content locator + structural model (cached) -> analyzer
//! dispatch -> positioned tags. Separately, the grid rewriter turns a row
//! or column insertion into guarded index shifts plus a definition insert.
//!
//! Inputs are UTF-8 strings scanned as raw bytes; every position is a byte
//! offset into the original text.

pub mod analysis;
pub mod core;
pub mod error;
pub mod grid;
pub mod model;

pub use analysis::{
    AnalysisAction, AnalysisContext, AnalyzerRegistry, BuiltinRegistry, DocumentAnalyzer,
    ElementAnalyzer, Platform, Severity, Suppression, SuppressionList, Tag,
};
pub use crate::core::extractor::{
    DocumentContext, ElementExtractor, ExtractHandler, ExtractedElement,
};
pub use crate::core::locator::{find_attribute, forms, value_is_interesting, LocatedValue};
pub use error::Error;
pub use grid::{insert_row, RowInsertion};
pub use model::{build_element, ElementCache, XamlElement};
