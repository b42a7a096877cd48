//! Target-type match rules
//!
//! Handlers and analyzers declare the element type they apply to as a
//! string: a plain name (matched exactly or by local name), or one of the
//! wildcard patterns `ANYCONTAINING:marker`, `ANYORCHILDRENCONTAINING:marker`,
//! and `ANYOF:a,b,c`. The patterns form a closed set of rule variants
//! evaluated by a single matcher, rather than ad hoc prefix checks spread
//! through dispatch code.

use super::scanner::split_name;

/// Prefix for "dispatch if this substring appears in the opening tag"
pub const ANY_CONTAINING: &str = "ANYCONTAINING:";
/// Prefix for "dispatch if this substring appears anywhere in the element"
pub const ANY_OR_CHILDREN_CONTAINING: &str = "ANYORCHILDRENCONTAINING:";
/// Prefix for "dispatch if the element name is any of the listed names"
pub const ANY_OF: &str = "ANYOF:";

/// A single element-matching rule
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MatchRule {
    /// Element name equals the pattern
    Exact(String),
    /// Element name without its namespace prefix equals the pattern
    LocalName(String),
    /// The pattern appears anywhere in the element's own opening tag
    ContainsSubstring(String),
    /// The pattern appears anywhere in the full element including children
    ContainsInSelfOrChildren(String),
    /// Element name matches any of the listed names (exact or local)
    AnyOf(Vec<String>),
}

impl MatchRule {
    /// Evaluate this rule against an element's name and textual forms
    pub fn matches(&self, name: &str, opening_tag: &str, full_text: &str) -> bool {
        match self {
            MatchRule::Exact(pattern) => name == pattern,
            MatchRule::LocalName(pattern) => split_name(name).1 == pattern,
            MatchRule::ContainsSubstring(marker) => opening_tag.contains(marker.as_str()),
            MatchRule::ContainsInSelfOrChildren(marker) => full_text.contains(marker.as_str()),
            MatchRule::AnyOf(names) => names
                .iter()
                .any(|n| name == n || split_name(name).1 == n),
        }
    }
}

/// Parse a target-type string into its match rules
///
/// A plain name yields both an exact and a local-name rule so that a
/// handler registered for `TextBlock` also fires for `controls:TextBlock`.
pub fn rules_for(target_type: &str) -> Vec<MatchRule> {
    if let Some(marker) = target_type.strip_prefix(ANY_CONTAINING) {
        vec![MatchRule::ContainsSubstring(marker.to_string())]
    } else if let Some(marker) = target_type.strip_prefix(ANY_OR_CHILDREN_CONTAINING) {
        vec![MatchRule::ContainsInSelfOrChildren(marker.to_string())]
    } else if let Some(list) = target_type.strip_prefix(ANY_OF) {
        vec![MatchRule::AnyOf(
            list.split(',')
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .collect(),
        )]
    } else {
        vec![
            MatchRule::Exact(target_type.to_string()),
            MatchRule::LocalName(target_type.to_string()),
        ]
    }
}

/// Whether a target-type string matches the given element
pub fn target_matches(target_type: &str, name: &str, opening_tag: &str, full_text: &str) -> bool {
    rules_for(target_type)
        .iter()
        .any(|rule| rule.matches(name, opening_tag, full_text))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exact_match() {
        assert!(target_matches("TextBlock", "TextBlock", "<TextBlock>", "<TextBlock></TextBlock>"));
        assert!(!target_matches("TextBlock", "TextBox", "<TextBox>", "<TextBox/>"));
    }

    #[test]
    fn test_local_name_match() {
        assert!(target_matches(
            "TextBlock",
            "controls:TextBlock",
            "<controls:TextBlock>",
            "<controls:TextBlock/>"
        ));
    }

    #[test]
    fn test_any_containing() {
        let opening = r#"<TextBox Text="{x:Bind Name}">"#;
        assert!(target_matches("ANYCONTAINING:x:Bind", "TextBox", opening, opening));
        assert!(!target_matches("ANYCONTAINING:x:Bind", "TextBox", "<TextBox>", "<TextBox/>"));
    }

    #[test]
    fn test_any_or_children_containing() {
        let full = "<StackPanel><TextBlock Uid=\"Header\"/></StackPanel>";
        let opening = "<StackPanel></StackPanel>";
        assert!(target_matches("ANYORCHILDRENCONTAINING:Uid=", "StackPanel", opening, full));
        assert!(!target_matches("ANYCONTAINING:Uid=", "StackPanel", opening, full));
    }

    #[test]
    fn test_any_of() {
        assert!(target_matches("ANYOF:Button,CheckBox", "CheckBox", "<CheckBox>", "<CheckBox/>"));
        assert!(target_matches(
            "ANYOF:Button,CheckBox",
            "ctl:Button",
            "<ctl:Button>",
            "<ctl:Button/>"
        ));
        assert!(!target_matches("ANYOF:Button,CheckBox", "Slider", "<Slider>", "<Slider/>"));
    }
}
