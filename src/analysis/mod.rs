//! Analyzer dispatch and analysis actions
//!
//! The outward-facing layer: a registry of element analyzers, the
//! document pipeline turning raw text into positioned tags, and the
//! suppression rules applied around it.

pub mod action;
pub mod analyzers;
pub mod context;
pub mod dispatch;
pub mod registry;
pub mod suppression;

pub use action::{filter_supported, ActionKind, ActionTarget, AnalysisAction, Severity};
pub use context::{AnalysisContext, Platform};
pub use dispatch::{DocumentAnalyzer, Tag, UNEXPECTED_CODE};
pub use registry::{AnalyzerRegistry, BuiltinRegistry, ElementAnalyzer};
pub use suppression::{Suppression, SuppressionList};
