//! Image accessibility checks

use crate::analysis::action::{ActionKind, AnalysisAction, Severity};
use crate::analysis::context::AnalysisContext;
use crate::analysis::registry::ElementAnalyzer;
use crate::error::Error;
use crate::model::XamlElement;

/// Flags `Image` elements a screen reader cannot describe: no
/// `AutomationProperties.Name` and not marked decorative
pub struct ImageAnalyzer;

impl ElementAnalyzer for ImageAnalyzer {
    fn target_type(&self) -> &str {
        "Image"
    }

    fn built_in(&self) -> bool {
        true
    }

    fn analyze(
        &self,
        element: &XamlElement,
        _ctx: &AnalysisContext,
    ) -> Result<Vec<AnalysisAction>, Error> {
        let has_name = element
            .attribute_value("AutomationProperties.Name")
            .map_or(false, |v| !v.trim().is_empty())
            || element.property_element("AutomationProperties.Name").is_some();
        let decorative = element
            .attribute_value("AutomationProperties.AccessibilityView")
            .map_or(false, |v| v.eq_ignore_ascii_case("Raw"));

        if has_name || decorative {
            return Ok(Vec::new());
        }

        Ok(vec![AnalysisAction::new(
            ActionKind::AddAttribute,
            Severity::Warning,
            "XA0701",
            "Image has no automation name for screen readers",
        )
        .with_name("AutomationProperties.Name")
        .with_value("")
        .with_action_text("Add AutomationProperties.Name")
        .with_more_info_url(
            "https://learn.microsoft.com/windows/apps/design/accessibility/basic-accessibility-information",
        )])
    }
}
