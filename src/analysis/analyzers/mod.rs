//! Built-in element analyzers
//!
//! Each analyzer covers one inspection shape: attribute naming conventions
//! (every element), hard-coded string extraction (TextBlock), structural
//! child checks (Grid), accessibility (Image), and platform-gated binding
//! modes (TextBox).

mod binding;
mod every_element;
mod grid;
mod image;
mod text_block;

pub use binding::BindingAnalyzer;
pub use every_element::EveryElementAnalyzer;
pub use grid::GridAnalyzer;
pub use image::ImageAnalyzer;
pub use text_block::{generate_uid, TextBlockAnalyzer};
