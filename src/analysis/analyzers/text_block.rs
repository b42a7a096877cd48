//! Hard-coded string detection on TextBlock

use uuid::Uuid;

use crate::analysis::action::{ActionKind, ActionTarget, AnalysisAction, Severity};
use crate::analysis::context::AnalysisContext;
use crate::analysis::registry::ElementAnalyzer;
use crate::core::locator::value_is_interesting;
use crate::error::Error;
use crate::model::XamlElement;

/// Flags hard-coded `Text` values (inline attribute or default content)
/// and offers to key them by a generated Uid for resource extraction
pub struct TextBlockAnalyzer;

impl ElementAnalyzer for TextBlockAnalyzer {
    fn target_type(&self) -> &str {
        "TextBlock"
    }

    fn built_in(&self) -> bool {
        true
    }

    fn analyze(
        &self,
        element: &XamlElement,
        ctx: &AnalysisContext,
    ) -> Result<Vec<AnalysisAction>, Error> {
        let (value, target) = match element.attribute("Text") {
            Some(attr) => (
                attr.value.as_str(),
                ActionTarget::Attribute("Text".to_string()),
            ),
            None => (element.content.as_str(), ActionTarget::Element),
        };

        if !value_is_interesting(value) {
            return Ok(Vec::new());
        }

        let xaml = ctx.xaml_alias();
        let existing_uid = element
            .attribute_value(&format!("{xaml}:Uid"))
            .or_else(|| element.attribute_value("Uid"));

        let mut action = AnalysisAction::new(
            ActionKind::Highlight,
            Severity::Warning,
            "XA0501",
            format!("Hard-coded string \"{value}\""),
        )
        .with_target(target)
        .with_action_text("Move hard-coded string to a resource file");

        if existing_uid.is_none() {
            let uid = generate_uid(value, element.local_name());
            action = action.and_then(
                AnalysisAction::new(
                    ActionKind::AddAttribute,
                    Severity::Warning,
                    "XA0501",
                    "Key the string with a Uid",
                )
                .with_name(format!("{xaml}:Uid"))
                .with_value(uid),
            );
        }

        Ok(vec![action])
    }
}

/// Derive a stable resource identifier from a string value: each word
/// title-cased and stripped to alphanumerics, then the element type name
/// appended. When the value yields no usable characters, a random numeric
/// seed stands in (collision-avoidance only, not collision-proof).
pub fn generate_uid(value: &str, type_name: &str) -> String {
    let mut seed = String::new();
    for word in value.split_whitespace() {
        let mut chars = word.chars().filter(|c| c.is_alphanumeric());
        if let Some(first) = chars.next() {
            seed.extend(first.to_uppercase());
            seed.extend(chars);
        }
    }

    if seed.is_empty() {
        seed = Uuid::new_v4()
            .simple()
            .to_string()
            .chars()
            .filter(|c| c.is_ascii_digit())
            .take(6)
            .collect();
        if seed.is_empty() {
            seed.push('0');
        }
    }

    format!("{seed}{type_name}")
}
