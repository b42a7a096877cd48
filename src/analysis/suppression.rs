//! Finding suppression
//!
//! Ordered suppression records loaded from sidecar configuration by the
//! caller. A record with a code drops matching tags after analysis; a
//! record without a code suppresses the whole file, short-circuiting the
//! pass before any parsing cost is paid.

use std::path::Path;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Suppression {
    /// Tag code to suppress; `None` suppresses every finding
    pub code: Option<String>,
    /// File the record applies to (matched against the path's file name);
    /// `None` applies to every file
    pub file: Option<String>,
}

impl Suppression {
    pub fn code(code: impl Into<String>) -> Self {
        Suppression {
            code: Some(code.into()),
            file: None,
        }
    }

    pub fn code_in_file(code: impl Into<String>, file: impl Into<String>) -> Self {
        Suppression {
            code: Some(code.into()),
            file: Some(file.into()),
        }
    }

    pub fn whole_file(file: impl Into<String>) -> Self {
        Suppression {
            code: None,
            file: Some(file.into()),
        }
    }

    fn applies_to(&self, path: &Path) -> bool {
        match &self.file {
            None => true,
            Some(name) => path
                .file_name()
                .is_some_and(|f| f.eq_ignore_ascii_case(name.as_str())),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct SuppressionList {
    records: Vec<Suppression>,
}

impl SuppressionList {
    pub fn new(records: Vec<Suppression>) -> Self {
        SuppressionList { records }
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Whether every finding for this file is suppressed
    pub fn suppresses_file(&self, path: &Path) -> bool {
        self.records
            .iter()
            .any(|r| r.code.is_none() && r.applies_to(path))
    }

    /// Whether a tag with this code is suppressed for this file
    pub fn suppresses(&self, code: &str, path: &Path) -> bool {
        self.records.iter().any(|r| {
            r.applies_to(path) && r.code.as_deref().map_or(true, |c| c == code)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_code_suppression_applies_everywhere() {
        let list = SuppressionList::new(vec![Suppression::code("XA0401")]);
        let path = PathBuf::from("Views/MainPage.xaml");
        assert!(list.suppresses("XA0401", &path));
        assert!(!list.suppresses("XA0402", &path));
        assert!(!list.suppresses_file(&path));
    }

    #[test]
    fn test_whole_file_suppression() {
        let list = SuppressionList::new(vec![Suppression::whole_file("Generated.xaml")]);
        assert!(list.suppresses_file(Path::new("obj/Generated.xaml")));
        assert!(!list.suppresses_file(Path::new("MainPage.xaml")));
    }

    #[test]
    fn test_file_scoped_code() {
        let list =
            SuppressionList::new(vec![Suppression::code_in_file("XA0501", "Legacy.xaml")]);
        assert!(list.suppresses("XA0501", Path::new("Views/Legacy.xaml")));
        assert!(!list.suppresses("XA0501", Path::new("Views/Modern.xaml")));
    }
}
