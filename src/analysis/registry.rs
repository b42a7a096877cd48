//! Analyzer registry
//!
//! Maps element types to analyzer instances. The registry is an explicit,
//! constructed object rather than process-wide state, so sessions and tests
//! get independent instances. The mechanism populating it with external
//! analyzers (plugin scanning and the like) lives behind [`AnalyzerRegistry`]
//! with callers registering instances directly.

use crate::analysis::action::AnalysisAction;
use crate::analysis::context::AnalysisContext;
use crate::core::matcher::target_matches;
use crate::error::Error;
use crate::model::XamlElement;

/// One element-type analyzer
pub trait ElementAnalyzer: Send + Sync {
    /// Element type this analyzer applies to: a plain name or a wildcard
    /// pattern (see [`crate::core::matcher`])
    fn target_type(&self) -> &str;

    /// Built-in analyzers have failures treated as internal defects;
    /// external analyzer failures are logged and suppressed
    fn built_in(&self) -> bool {
        false
    }

    fn analyze(
        &self,
        element: &XamlElement,
        ctx: &AnalysisContext,
    ) -> Result<Vec<AnalysisAction>, Error>;
}

/// Lookup interface the dispatch layer depends on
pub trait AnalyzerRegistry: Send + Sync {
    /// All analyzers applying to an element, in registration order.
    /// `opening_tag` and `full_text` feed the wildcard match rules.
    fn analyzers_for(
        &self,
        element_name: &str,
        opening_tag: &str,
        full_text: &str,
    ) -> Vec<&dyn ElementAnalyzer>;
}

/// Registry holding the built-in analyzer set plus any externally
/// registered analyzers
#[derive(Default)]
pub struct BuiltinRegistry {
    analyzers: Vec<Box<dyn ElementAnalyzer>>,
}

impl BuiltinRegistry {
    /// Registry with the built-in analyzers installed
    pub fn new() -> Self {
        use crate::analysis::analyzers;

        let mut registry = BuiltinRegistry::empty();
        registry.register(Box::new(analyzers::TextBlockAnalyzer));
        registry.register(Box::new(analyzers::GridAnalyzer));
        registry.register(Box::new(analyzers::ImageAnalyzer));
        registry.register(Box::new(analyzers::BindingAnalyzer));
        registry
    }

    pub fn empty() -> Self {
        BuiltinRegistry {
            analyzers: Vec::new(),
        }
    }

    pub fn register(&mut self, analyzer: Box<dyn ElementAnalyzer>) {
        self.analyzers.push(analyzer);
    }
}

impl AnalyzerRegistry for BuiltinRegistry {
    fn analyzers_for(
        &self,
        element_name: &str,
        opening_tag: &str,
        full_text: &str,
    ) -> Vec<&dyn ElementAnalyzer> {
        self.analyzers
            .iter()
            .filter(|a| target_matches(a.target_type(), element_name, opening_tag, full_text))
            .map(|a| a.as_ref())
            .collect()
    }
}
