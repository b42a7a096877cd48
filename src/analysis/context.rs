//! Per-pass analyzer context

use std::collections::HashMap;
use std::path::PathBuf;

/// Target XAML platform; analyzers early-return when inapplicable
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Platform {
    Wpf,
    Uwp,
    WinUi,
}

/// Contextual metadata threaded to every analyzer invocation
#[derive(Debug, Clone)]
pub struct AnalysisContext {
    pub platform: Platform,
    /// Alias -> namespace URI from the document's root element; the
    /// default namespace is keyed by ""
    pub xmlns_aliases: HashMap<String, String>,
    /// Identity of the containing file, when known
    pub file: Option<PathBuf>,
}

impl AnalysisContext {
    pub fn new(platform: Platform) -> Self {
        AnalysisContext {
            platform,
            xmlns_aliases: HashMap::new(),
            file: None,
        }
    }

    pub fn with_file(mut self, file: impl Into<PathBuf>) -> Self {
        self.file = Some(file.into());
        self
    }

    pub fn with_aliases(mut self, aliases: HashMap<String, String>) -> Self {
        self.xmlns_aliases = aliases;
        self
    }

    /// Alias bound to the core XAML namespace (conventionally `x`)
    pub fn xaml_alias(&self) -> &str {
        self.xmlns_aliases
            .iter()
            .find(|(_, uri)| uri.ends_with("winfx/2006/xaml"))
            .map(|(alias, _)| alias.as_str())
            .unwrap_or("x")
    }
}
