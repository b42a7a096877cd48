//! Error types for the analysis engine

use thiserror::Error;

/// Errors surfaced by extraction handlers and analyzers.
///
/// Failures from external (third-party) handlers are logged and suppressed
/// by the dispatch layer; failures from built-in handlers propagate and
/// abort the document pass.
#[derive(Debug, Error)]
pub enum Error {
    /// An analyzer or extraction handler reported a failure
    #[error("analyzer '{name}' failed: {message}")]
    Analyzer { name: String, message: String },

    /// An analyzer panicked (caught at the dispatch boundary)
    #[error("analyzer '{name}' panicked")]
    AnalyzerPanic { name: String },

    /// An internal defect in the engine itself
    #[error("internal error: {0}")]
    Internal(String),
}

impl Error {
    /// Convenience constructor for analyzer failures
    pub fn analyzer(name: impl Into<String>, message: impl Into<String>) -> Self {
        Error::Analyzer {
            name: name.into(),
            message: message.into(),
        }
    }
}
