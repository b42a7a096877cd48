//! Catch-all analyzer applied to every element

use crate::analysis::action::{ActionKind, ActionTarget, AnalysisAction, Severity};
use crate::analysis::context::AnalysisContext;
use crate::analysis::registry::ElementAnalyzer;
use crate::core::locator::value_is_interesting;
use crate::error::Error;
use crate::model::XamlElement;

/// Naming-convention and generic hard-coded-string checks that apply
/// regardless of element type. Dispatched first for every element.
pub struct EveryElementAnalyzer;

impl ElementAnalyzer for EveryElementAnalyzer {
    fn target_type(&self) -> &str {
        ""
    }

    fn built_in(&self) -> bool {
        true
    }

    fn analyze(
        &self,
        element: &XamlElement,
        ctx: &AnalysisContext,
    ) -> Result<Vec<AnalysisAction>, Error> {
        let mut actions = Vec::new();
        let xaml = ctx.xaml_alias();
        let prefixed_name = format!("{xaml}:Name");
        let prefixed_uid = format!("{xaml}:Uid");

        for attr in &element.attributes {
            let is_name = attr.name == "Name" || attr.name == prefixed_name;
            let is_uid = attr.name == "Uid" || attr.name == prefixed_uid;

            if (is_name || is_uid) && starts_lowercase(&attr.value) {
                let (code, what) = if is_name {
                    ("XA0401", "Name")
                } else {
                    ("XA0402", "Uid")
                };
                actions.push(
                    AnalysisAction::new(
                        ActionKind::Highlight,
                        Severity::Warning,
                        code,
                        format!("{what} '{}' should begin with an uppercase character", attr.value),
                    )
                    .with_target(ActionTarget::Attribute(attr.name.clone()))
                    .with_action_text(format!("Capitalize '{}'", attr.value))
                    .and_then(
                        AnalysisAction::new(
                            ActionKind::ReplaceAttributeValue,
                            Severity::Warning,
                            code,
                            "Capitalize first character",
                        )
                        .with_target(ActionTarget::Attribute(attr.name.clone()))
                        .with_name(attr.name.clone())
                        .with_value(capitalize_first(&attr.value)),
                    ),
                );
            }

            if attr.name == "ToolTipService.ToolTip" && value_is_interesting(&attr.value) {
                actions.push(
                    AnalysisAction::new(
                        ActionKind::Highlight,
                        Severity::Warning,
                        "XA0403",
                        format!("Hard-coded tooltip text \"{}\"", attr.value),
                    )
                    .with_target(ActionTarget::Attribute(attr.name.clone()))
                    .with_action_text("Move hard-coded string to a resource file"),
                );
            }
        }

        Ok(actions)
    }
}

fn starts_lowercase(value: &str) -> bool {
    value.chars().next().is_some_and(|c| c.is_lowercase())
}

fn capitalize_first(value: &str) -> String {
    let mut chars = value.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
