//! Structural element model
//!
//! On-demand tree representation of one element occurrence, with a
//! bounded content-keyed cache to avoid reparsing repeated markup.

pub mod builder;
pub mod cache;
pub mod element;

pub use builder::build_element;
pub use cache::ElementCache;
pub use element::{PropertyElement, PropertyValue, XamlAttribute, XamlElement};
