//! x:Bind mode checks

use crate::analysis::action::{ActionKind, ActionTarget, AnalysisAction, Severity};
use crate::analysis::context::{AnalysisContext, Platform};
use crate::analysis::registry::ElementAnalyzer;
use crate::error::Error;
use crate::model::XamlElement;

/// The default `x:Bind` mode is OneTime; a `TextBox.Text` bound without an
/// explicit `Mode=` almost always wants TwoWay. Alias-aware: the `x:`
/// prefix is resolved from the document's xmlns declarations. Not
/// applicable to WPF, which has no `x:Bind`.
pub struct BindingAnalyzer;

impl ElementAnalyzer for BindingAnalyzer {
    fn target_type(&self) -> &str {
        "TextBox"
    }

    fn built_in(&self) -> bool {
        true
    }

    fn analyze(
        &self,
        element: &XamlElement,
        ctx: &AnalysisContext,
    ) -> Result<Vec<AnalysisAction>, Error> {
        if ctx.platform == Platform::Wpf {
            return Ok(Vec::new());
        }

        let Some(attr) = element.attribute("Text") else {
            return Ok(Vec::new());
        };
        let value = attr.value.trim();

        let bind_prefix = format!("{{{}:Bind", ctx.xaml_alias());
        if !value.starts_with(&bind_prefix) || value.contains("Mode=") {
            return Ok(Vec::new());
        }

        let Some(body) = value.strip_suffix('}') else {
            return Ok(Vec::new());
        };
        let suggested = format!("{}, Mode=TwoWay}}", body.trim_end());

        Ok(vec![AnalysisAction::new(
            ActionKind::ReplaceAttributeValue,
            Severity::Info,
            "XA0801",
            "x:Bind defaults to OneTime; a TextBox.Text binding usually needs TwoWay",
        )
        .with_target(ActionTarget::Attribute("Text".to_string()))
        .with_name("Text".to_string())
        .with_value(suggested)
        .with_action_text("Add Mode=TwoWay")])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::build_element;

    fn analyze(text: &str, platform: Platform) -> Vec<AnalysisAction> {
        let element = build_element(text, 0);
        BindingAnalyzer
            .analyze(&element, &AnalysisContext::new(platform))
            .unwrap()
    }

    #[test]
    fn test_modeless_bind_flagged() {
        let actions = analyze(r#"<TextBox Text="{x:Bind ViewModel.Name}" />"#, Platform::Uwp);
        assert_eq!(actions.len(), 1);
        assert_eq!(
            actions[0].value.as_deref(),
            Some("{x:Bind ViewModel.Name, Mode=TwoWay}")
        );
    }

    #[test]
    fn test_explicit_mode_passes() {
        assert!(analyze(
            r#"<TextBox Text="{x:Bind ViewModel.Name, Mode=TwoWay}" />"#,
            Platform::Uwp
        )
        .is_empty());
    }

    #[test]
    fn test_classic_binding_passes() {
        assert!(analyze(r#"<TextBox Text="{Binding Name}" />"#, Platform::Uwp).is_empty());
    }

    #[test]
    fn test_wpf_skipped() {
        assert!(analyze(r#"<TextBox Text="{x:Bind ViewModel.Name}" />"#, Platform::Wpf).is_empty());
    }
}
