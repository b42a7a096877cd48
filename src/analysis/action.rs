//! Analysis actions
//!
//! The structured suggestions analyzers emit: an operation kind, severity,
//! stable short code, human-readable text, and the positional target the
//! action applies to. Actions can be grouped with `and_then` (apply all)
//! or `or_else` (offer as alternatives).

/// Severity classification for one finding
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    Info,
    Warning,
    Error,
}

/// Operation kind of an analysis action.
///
/// `Unsupported` is the explicit "this operation has no implementation"
/// variant; it carries no positional target and is filtered out before
/// actions reach consumers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionKind {
    Highlight,
    AddAttribute,
    RemoveAttribute,
    ReplaceAttributeValue,
    RenameElement,
    ReplaceElement,
    AddChild,
    RemoveChild,
    AddXmlns,
    Unsupported,
}

/// What the action positionally applies to
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ActionTarget {
    /// The whole element span
    Element,
    /// A named attribute of the element
    Attribute(String),
    /// An explicit byte span in the document
    Span { offset: usize, len: usize },
}

#[derive(Debug, Clone, PartialEq)]
pub struct AnalysisAction {
    pub kind: ActionKind,
    pub severity: Severity,
    /// Stable short code, used for suppression matching (`XA0401`)
    pub code: String,
    pub description: String,
    /// Text shown on the fix affordance
    pub action_text: String,
    pub extended_message: Option<String>,
    pub more_info_url: Option<String>,
    pub target: Option<ActionTarget>,
    /// Attribute or element name payload, per kind
    pub name: Option<String>,
    /// Attribute value or child markup payload, per kind
    pub value: Option<String>,
    /// Further actions applied together with this one
    pub and_then: Vec<AnalysisAction>,
    /// Alternative actions offered instead of this one
    pub or_else: Vec<AnalysisAction>,
}

impl AnalysisAction {
    pub fn new(
        kind: ActionKind,
        severity: Severity,
        code: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        AnalysisAction {
            kind,
            severity,
            code: code.into(),
            description: description.into(),
            action_text: String::new(),
            extended_message: None,
            more_info_url: None,
            target: if kind == ActionKind::Unsupported {
                None
            } else {
                Some(ActionTarget::Element)
            },
            name: None,
            value: None,
            and_then: Vec::new(),
            or_else: Vec::new(),
        }
    }

    /// An operation with no implementation; never reaches consumers
    pub fn unsupported(code: impl Into<String>) -> Self {
        AnalysisAction::new(ActionKind::Unsupported, Severity::Info, code, "unsupported")
    }

    pub fn with_action_text(mut self, text: impl Into<String>) -> Self {
        self.action_text = text.into();
        self
    }

    pub fn with_target(mut self, target: ActionTarget) -> Self {
        self.target = Some(target);
        self
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_value(mut self, value: impl Into<String>) -> Self {
        self.value = Some(value.into());
        self
    }

    pub fn with_extended_message(mut self, message: impl Into<String>) -> Self {
        self.extended_message = Some(message.into());
        self
    }

    pub fn with_more_info_url(mut self, url: impl Into<String>) -> Self {
        self.more_info_url = Some(url.into());
        self
    }

    pub fn and_then(mut self, action: AnalysisAction) -> Self {
        self.and_then.push(action);
        self
    }

    pub fn or_else(mut self, action: AnalysisAction) -> Self {
        self.or_else.push(action);
        self
    }

    pub fn is_supported(&self) -> bool {
        self.kind != ActionKind::Unsupported
    }
}

/// Drop unsupported actions, including within groups
pub fn filter_supported(actions: Vec<AnalysisAction>) -> Vec<AnalysisAction> {
    actions
        .into_iter()
        .filter(AnalysisAction::is_supported)
        .map(|mut action| {
            action.and_then = filter_supported(std::mem::take(&mut action.and_then));
            action.or_else = filter_supported(std::mem::take(&mut action.or_else));
            action
        })
        .collect()
}
