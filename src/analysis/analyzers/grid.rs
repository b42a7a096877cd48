//! Missing grid row/column definition detection

use crate::analysis::action::{ActionKind, AnalysisAction, Severity};
use crate::analysis::context::AnalysisContext;
use crate::analysis::registry::ElementAnalyzer;
use crate::error::Error;
use crate::model::{PropertyValue, XamlElement};

/// Compares the highest `Grid.Row` / `Grid.Column` assigned by direct
/// children against the number of defined rows/columns, and offers to add
/// the missing definitions. Rows and columns each get their own scan.
pub struct GridAnalyzer;

impl ElementAnalyzer for GridAnalyzer {
    fn target_type(&self) -> &str {
        "Grid"
    }

    fn built_in(&self) -> bool {
        true
    }

    fn analyze(
        &self,
        element: &XamlElement,
        _ctx: &AnalysisContext,
    ) -> Result<Vec<AnalysisAction>, Error> {
        let mut actions = Vec::new();

        let defined_rows = definition_count(element, "RowDefinitions");
        let highest_row = highest_assigned(element, "Grid.Row");
        if let Some(action) = missing_definitions(
            "XA0601",
            "row",
            "RowDefinitions",
            "<RowDefinition Height=\"*\" />",
            defined_rows,
            highest_row,
        ) {
            actions.push(action);
        }

        let defined_columns = definition_count(element, "ColumnDefinitions");
        let highest_column = highest_assigned(element, "Grid.Column");
        if let Some(action) = missing_definitions(
            "XA0602",
            "column",
            "ColumnDefinitions",
            "<ColumnDefinition Width=\"*\" />",
            defined_columns,
            highest_column,
        ) {
            actions.push(action);
        }

        Ok(actions)
    }
}

/// Number of row/column definitions the grid declares, in either the
/// succinct inline form (`RowDefinitions="*,Auto"`) or the property-element
/// form
fn definition_count(element: &XamlElement, name: &str) -> usize {
    if let Some(inline) = element.attribute_value(name) {
        if inline.trim().is_empty() {
            return 0;
        }
        return inline.split(',').count();
    }
    match element.property_element(name).map(|p| &p.value) {
        Some(PropertyValue::Elements(defs)) => defs.len(),
        Some(PropertyValue::Element(_)) => 1,
        Some(PropertyValue::Text(_)) | None => 0,
    }
}

/// Highest row/column index assigned by a direct child, if any
fn highest_assigned(element: &XamlElement, attribute: &str) -> Option<usize> {
    element
        .children
        .iter()
        .filter_map(|child| child.attribute_value(attribute))
        .filter_map(|value| value.parse::<usize>().ok())
        .max()
}

fn missing_definitions(
    code: &str,
    axis: &str,
    property: &str,
    definition_markup: &str,
    defined: usize,
    highest: Option<usize>,
) -> Option<AnalysisAction> {
    let highest = highest?;
    let needed = highest + 1;
    if needed <= defined {
        return None;
    }

    let markup: String = (defined..needed)
        .map(|_| definition_markup)
        .collect::<Vec<_>>()
        .join("\n");

    Some(
        AnalysisAction::new(
            ActionKind::AddChild,
            Severity::Warning,
            code,
            format!(
                "Grid.{}=\"{highest}\" assigned but only {defined} {axis} definition{} declared",
                if axis == "row" { "Row" } else { "Column" },
                if defined == 1 { " is" } else { "s are" },
            ),
        )
        .with_action_text(format!("Add missing {axis} definitions"))
        .with_name(property.to_string())
        .with_value(markup),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::context::Platform;
    use crate::model::build_element;

    fn analyze(text: &str) -> Vec<AnalysisAction> {
        let element = build_element(text, 0);
        GridAnalyzer
            .analyze(&element, &AnalysisContext::new(Platform::Uwp))
            .unwrap()
    }

    #[test]
    fn test_missing_row_definitions_flagged() {
        let actions = analyze(
            "<Grid>\
                <Grid.RowDefinitions>\
                    <RowDefinition Height=\"*\" />\
                </Grid.RowDefinitions>\
                <TextBlock Grid.Row=\"2\" />\
            </Grid>",
        );
        assert_eq!(actions.len(), 1);
        assert_eq!(actions[0].code, "XA0601");
        assert_eq!(actions[0].kind, ActionKind::AddChild);
        // Rows 1 and 2 are undefined
        assert_eq!(
            actions[0].value.as_deref(),
            Some("<RowDefinition Height=\"*\" />\n<RowDefinition Height=\"*\" />")
        );
    }

    #[test]
    fn test_sufficient_definitions_pass() {
        let actions = analyze(
            "<Grid>\
                <Grid.RowDefinitions>\
                    <RowDefinition Height=\"*\" />\
                    <RowDefinition Height=\"Auto\" />\
                </Grid.RowDefinitions>\
                <TextBlock Grid.Row=\"1\" />\
            </Grid>",
        );
        assert!(actions.is_empty());
    }

    #[test]
    fn test_rows_and_columns_scanned_independently() {
        let actions = analyze(
            "<Grid><Button Grid.Row=\"1\" Grid.Column=\"2\" /></Grid>",
        );
        assert_eq!(actions.len(), 2);
        assert_eq!(actions[0].code, "XA0601");
        assert_eq!(actions[1].code, "XA0602");
    }

    #[test]
    fn test_succinct_inline_syntax_counted() {
        let actions = analyze(
            "<Grid RowDefinitions=\"*,Auto,*\"><TextBlock Grid.Row=\"2\" /></Grid>",
        );
        assert!(actions.is_empty());
    }

    #[test]
    fn test_unassigned_grid_passes() {
        assert!(analyze("<Grid><TextBlock /></Grid>").is_empty());
    }
}
