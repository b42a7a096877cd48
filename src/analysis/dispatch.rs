//! Document analysis pipeline
//!
//! Runs the extraction pass over one document, feeding every element to
//! the catch-all analyzer and then to each type-matching registered
//! analyzer, and collects the emitted actions as positioned tags. Failure
//! policy: external analyzer errors and panics are logged and suppressed;
//! built-in errors abort the pass and surface as one synthetic
//! "unexpected error" tag at document start.

use std::cell::RefCell;
use std::collections::HashMap;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use rayon::prelude::*;

use crate::analysis::action::{
    filter_supported, ActionKind, ActionTarget, AnalysisAction, Severity,
};
use crate::analysis::analyzers::EveryElementAnalyzer;
use crate::analysis::context::{AnalysisContext, Platform};
use crate::analysis::registry::{AnalyzerRegistry, BuiltinRegistry, ElementAnalyzer};
use crate::analysis::suppression::SuppressionList;
use crate::core::extractor::{DocumentContext, ElementExtractor, ExtractHandler, ExtractedElement};
use crate::error::Error;
use crate::model::{ElementCache, XamlElement};

/// Code carried by the synthetic tag produced when a pass fails outright
pub const UNEXPECTED_CODE: &str = "XA9999";

/// One positioned finding
#[derive(Debug, Clone, PartialEq)]
pub struct Tag {
    pub code: String,
    pub severity: Severity,
    pub description: String,
    /// Absolute byte span in the document text
    pub offset: usize,
    pub len: usize,
    pub action: AnalysisAction,
}

struct CachedPass {
    text: String,
    tags: Vec<Tag>,
}

/// Session-scoped analysis service: registry, suppression list, element
/// cache, and per-path result cache, explicitly constructed with a clear
/// lifetime rather than process-wide state
pub struct DocumentAnalyzer {
    platform: Platform,
    registry: Box<dyn AnalyzerRegistry>,
    suppressions: SuppressionList,
    element_cache: ElementCache,
    document_cache: Mutex<HashMap<PathBuf, CachedPass>>,
}

impl DocumentAnalyzer {
    /// Analyzer with the built-in set installed
    pub fn new(platform: Platform) -> Self {
        DocumentAnalyzer {
            platform,
            registry: Box::new(BuiltinRegistry::new()),
            suppressions: SuppressionList::default(),
            element_cache: ElementCache::default(),
            document_cache: Mutex::new(HashMap::new()),
        }
    }

    pub fn with_suppressions(mut self, suppressions: SuppressionList) -> Self {
        self.suppressions = suppressions;
        self
    }

    /// Replace the analyzer lookup; the pass consults only the
    /// [`AnalyzerRegistry`] interface, so any populating mechanism works
    pub fn with_registry(mut self, registry: Box<dyn AnalyzerRegistry>) -> Self {
        self.registry = registry;
        self
    }

    /// Analyze one document, returning its positioned tags.
    ///
    /// Results are cached by path and reused until the text changes.
    /// A whole-file suppression short-circuits before any parsing.
    pub fn analyze(&self, path: &Path, text: &str) -> Vec<Tag> {
        if self.suppressions.suppresses_file(path) {
            return Vec::new();
        }

        if let Some(tags) = self.cached(path, text) {
            return tags;
        }

        let tags = match self.run_pass(path, text) {
            Ok(tags) => tags,
            Err(err) => {
                log::error!("analysis of {} failed: {err}", path.display());
                vec![unexpected_tag(&err)]
            }
        };

        let tags: Vec<Tag> = tags
            .into_iter()
            .filter(|tag| !self.suppressions.suppresses(&tag.code, path))
            .collect();

        self.lock_documents().insert(
            path.to_path_buf(),
            CachedPass {
                text: text.to_string(),
                tags: tags.clone(),
            },
        );
        tags
    }

    /// Analyze independent documents in parallel
    pub fn analyze_documents(&self, documents: &[(PathBuf, String)]) -> Vec<(PathBuf, Vec<Tag>)> {
        documents
            .par_iter()
            .map(|(path, text)| (path.clone(), self.analyze(path, text)))
            .collect()
    }

    fn run_pass(&self, path: &Path, text: &str) -> Result<Vec<Tag>, Error> {
        let base = AnalysisContext::new(self.platform).with_file(path);
        let sink = RefCell::new(Vec::new());

        let mut pass = PassAdapter {
            registry: self.registry.as_ref(),
            catch_all: EveryElementAnalyzer,
            base: &base,
            cache: &self.element_cache,
            sink: &sink,
        };

        // Outermost boundary: a panic anywhere in the pass becomes an
        // error instead of unwinding into the caller
        let outcome = catch_unwind(AssertUnwindSafe(|| {
            ElementExtractor::extract(text, &mut [], &mut pass)
        }));

        drop(pass);

        match outcome {
            Ok(Ok(_)) => Ok(sink.into_inner()),
            Ok(Err(err)) => Err(err),
            Err(_) => Err(Error::Internal("analysis pass panicked".to_string())),
        }
    }

    fn cached(&self, path: &Path, text: &str) -> Option<Vec<Tag>> {
        let cache = self.lock_documents();
        let pass = cache.get(path)?;
        (pass.text == text).then(|| pass.tags.clone())
    }

    fn lock_documents(&self) -> std::sync::MutexGuard<'_, HashMap<PathBuf, CachedPass>> {
        match self.document_cache.lock() {
            Ok(guard) => guard,
            Err(poisoned) => poisoned.into_inner(),
        }
    }
}

/// Drives every extracted element through the catch-all analyzer and the
/// registry lookup, building the structural model once per element through
/// the shared cache and converting the emitted actions to tags
struct PassAdapter<'a> {
    registry: &'a dyn AnalyzerRegistry,
    catch_all: EveryElementAnalyzer,
    base: &'a AnalysisContext,
    cache: &'a ElementCache,
    sink: &'a RefCell<Vec<Tag>>,
}

impl PassAdapter<'_> {
    fn run_analyzer(
        &self,
        analyzer: &dyn ElementAnalyzer,
        model: &XamlElement,
        ctx: &AnalysisContext,
    ) -> Result<(), Error> {
        let outcome = if analyzer.built_in() {
            analyzer.analyze(model, ctx)
        } else {
            // External code: contain panics as well as errors
            match catch_unwind(AssertUnwindSafe(|| analyzer.analyze(model, ctx))) {
                Ok(result) => result,
                Err(_) => Err(Error::AnalyzerPanic {
                    name: analyzer.target_type().to_string(),
                }),
            }
        };

        let actions = match outcome {
            Ok(actions) => actions,
            Err(err) if !analyzer.built_in() => {
                log::error!("analyzer {} failed: {err}", analyzer.target_type());
                return Ok(());
            }
            Err(err) => return Err(err),
        };

        let mut sink = self.sink.borrow_mut();
        for action in filter_supported(actions) {
            sink.push(to_tag(action, model));
        }
        Ok(())
    }
}

impl ExtractHandler for PassAdapter<'_> {
    fn target_type(&self) -> &str {
        ""
    }

    fn built_in(&self) -> bool {
        true
    }

    fn on_element(
        &mut self,
        element: &ExtractedElement<'_>,
        doc_ctx: &DocumentContext,
    ) -> Result<(), Error> {
        let model = self.cache.get_or_build(element.text, element.offset);
        let mut ctx = self.base.clone();
        ctx.xmlns_aliases = doc_ctx.xmlns_aliases.clone();

        self.run_analyzer(&self.catch_all, &model, &ctx)?;
        for analyzer in
            self.registry
                .analyzers_for(element.name, &element.opening_tag, element.text)
        {
            self.run_analyzer(analyzer, &model, &ctx)?;
        }
        Ok(())
    }
}

fn to_tag(action: AnalysisAction, model: &XamlElement) -> Tag {
    let (offset, len) = match &action.target {
        Some(ActionTarget::Span { offset, len }) => (*offset, *len),
        Some(ActionTarget::Attribute(name)) => model
            .attribute(name)
            .map(|a| (a.offset, a.len))
            .unwrap_or((model.offset, model.len)),
        Some(ActionTarget::Element) | None => (model.offset, model.len),
    };
    Tag {
        code: action.code.clone(),
        severity: action.severity,
        description: action.description.clone(),
        offset,
        len,
        action,
    }
}

fn unexpected_tag(err: &Error) -> Tag {
    let description = format!("Unexpected error during analysis: {err}");
    Tag {
        code: UNEXPECTED_CODE.to_string(),
        severity: Severity::Error,
        description: description.clone(),
        offset: 0,
        len: 0,
        action: AnalysisAction::new(
            ActionKind::Highlight,
            Severity::Error,
            UNEXPECTED_CODE,
            description,
        )
        .with_target(ActionTarget::Span { offset: 0, len: 0 }),
    }
}
