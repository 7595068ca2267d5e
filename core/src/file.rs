use serde::{Deserialize, Serialize};

use crate::TableSchema;

/// Contents of one schema file.
///
/// A file groups one or more [`TableSchema`] declarations and may carry
/// tags. The generator only reads tagged files when the caller asks for
/// specific tags.
///
/// # Examples
///
/// ```
/// use txkit_core::*;
///
/// let mut file = SchemaFile::default();
/// file.tags = vec!["sqlite".into(), "audit".into()];
/// file.tables.push(TableSchema::new("Alert", "alerts", "id"));
///
/// assert!(file.has_tags(&["sqlite".to_string()]));
/// assert!(!file.has_tags(&["postgres".to_string()]));
/// assert!(file.find_table("Alert").is_some());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SchemaFile {
    /// Free-form tags used to select files.
    #[serde(default)]
    pub tags: Vec<String>,
    /// Table declarations in this file.
    #[serde(default)]
    pub tables: Vec<TableSchema>,
}

impl SchemaFile {
    /// Returns `true` if every requested tag is present on this file.
    ///
    /// An empty request matches every file.
    pub fn has_tags(&self, wanted: &[String]) -> bool {
        wanted.iter().all(|tag| self.tags.contains(tag))
    }

    /// Finds a table declaration by its type name.
    pub fn find_table(&self, type_name: &str) -> Option<&TableSchema> {
        self.tables.iter().find(|t| t.type_name == type_name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ColumnType;

    #[test]
    fn test_schema_file_parses_yaml() {
        let yaml = r#"
tags: [sqlite]
tables:
  - type: Alert
    table: alerts
    key: id
    columns:
      - name: id
        type: integer
      - name: title
      - name: closed_at
        type: timestamp
        nullable: true
"#;
        let file: SchemaFile = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(file.tags, vec!["sqlite".to_string()]);

        let alert = file.find_table("Alert").unwrap();
        assert_eq!(alert.table, "alerts");
        assert_eq!(alert.columns.len(), 3);
        assert_eq!(alert.columns[1].column_type, ColumnType::Text);
        assert!(alert.columns[2].nullable);
    }

    #[test]
    fn test_has_tags_requires_all() {
        let file = SchemaFile {
            tags: vec!["a".into()],
            tables: Vec::new(),
        };
        assert!(file.has_tags(&[]));
        assert!(!file.has_tags(&["a".into(), "b".into()]));
    }
}
