use serde::{Deserialize, Serialize};
use tapestry_model::metadata::TableMetadataFormat;

/// Knobs for the editing operations, usually loaded from the host's JSON
/// configuration. Missing fields take their defaults.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EditorSettings {
    /// Tab and Shift+Tab indent and outdent list items.
    pub tab_indent_list: bool,
    /// Deepest list nesting indentation may create.
    pub max_list_depth: usize,
    /// Pixels added or removed per indentation step outside lists.
    pub indentation_step: f64,
    /// Format applied to tables created by the editor.
    pub default_table_format: TableMetadataFormat,
}

impl Default for EditorSettings {
    fn default() -> Self {
        Self {
            tab_indent_list: true,
            max_list_depth: 10,
            indentation_step: 40.0,
            default_table_format: TableMetadataFormat::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_json_keeps_defaults() {
        let settings: EditorSettings =
            serde_json::from_str(r#"{"maxListDepth": 3}"#).unwrap_or_default();
        assert_eq!(settings.max_list_depth, 3);
        assert!(settings.tab_indent_list);
        assert_eq!(settings.indentation_step, 40.0);
    }
}
