//! Core markup-scanning primitives
//!
//! This module contains the fundamental building blocks for XAML analysis:
//! - Scanner: memchr-accelerated byte cursor over raw markup
//! - Extractor: streaming element extraction with handler dispatch
//! - Locator: attribute and content location within one element's text
//! - Matcher: element-type matching rules for analyzer targeting

pub mod extractor;
pub mod locator;
pub mod matcher;
pub mod scanner;
