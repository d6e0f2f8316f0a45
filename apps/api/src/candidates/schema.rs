use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Coercion rule applied to a CSV column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldType {
    /// Free text. A literal `yes`/`no` still becomes a boolean.
    Text,
    /// Parsed as a number, zero on failure.
    Number,
    /// `yes`/`no` flag. Anything else is kept as text.
    Flag,
    /// `;`-delimited list of strings.
    List,
}

/// A column of a loaded dataset together with its coercion rule.
#[derive(Debug, Clone, Serialize)]
pub struct ColumnInfo {
    pub name: String,
    #[serde(rename = "type")]
    pub field_type: FieldType,
}

/// Immutable mapping from column name to coercion rule.
///
/// Columns the schema does not name are treated as [`FieldType::Text`].
#[derive(Debug, Clone)]
pub struct CandidateSchema {
    types: HashMap<String, FieldType>,
}

const NUMBER_FIELDS: &[&str] = &[
    "years_experience",
    "availability_weeks",
    "notice_period_weeks",
    "desired_salary_usd",
    "remote_experience_years",
];

const LIST_FIELDS: &[&str] = &["skills", "languages", "tags"];

const FLAG_FIELDS: &[&str] = &["willing_to_relocate", "open_to_contract"];

/// Field read by the stats aggregator for average experience.
pub const EXPERIENCE_FIELD: &str = "years_experience";
/// Field read by the stats aggregator for skill frequencies.
pub const SKILLS_FIELD: &str = "skills";
pub const LOCATION_FIELD: &str = "location";
pub const TITLE_FIELD: &str = "title";
pub const ID_FIELD: &str = "id";

impl CandidateSchema {
    pub fn new<I, S>(fields: I) -> Self
    where
        I: IntoIterator<Item = (S, FieldType)>,
        S: Into<String>,
    {
        Self {
            types: fields.into_iter().map(|(n, t)| (n.into(), t)).collect(),
        }
    }

    pub fn field_type(&self, name: &str) -> FieldType {
        self.types.get(name).copied().unwrap_or(FieldType::Text)
    }

    /// Describes the columns of a loaded header in header order.
    pub fn describe(&self, header: &[String]) -> Vec<ColumnInfo> {
        header
            .iter()
            .map(|name| ColumnInfo {
                name: name.clone(),
                field_type: self.field_type(name),
            })
            .collect()
    }
}

impl Default for CandidateSchema {
    fn default() -> Self {
        let numbers = NUMBER_FIELDS.iter().map(|f| (*f, FieldType::Number));
        let lists = LIST_FIELDS.iter().map(|f| (*f, FieldType::List));
        let flags = FLAG_FIELDS.iter().map(|f| (*f, FieldType::Flag));
        Self::new(numbers.chain(lists).chain(flags))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_schema_types() {
        let schema = CandidateSchema::default();
        assert_eq!(schema.field_type("years_experience"), FieldType::Number);
        assert_eq!(schema.field_type("desired_salary_usd"), FieldType::Number);
        assert_eq!(schema.field_type("skills"), FieldType::List);
        assert_eq!(schema.field_type("tags"), FieldType::List);
        assert_eq!(schema.field_type("open_to_contract"), FieldType::Flag);
        assert_eq!(schema.field_type("summary"), FieldType::Text);
    }

    #[test]
    fn test_unknown_column_is_text() {
        let schema = CandidateSchema::default();
        assert_eq!(schema.field_type("favourite_colour"), FieldType::Text);
    }

    #[test]
    fn test_describe_keeps_header_order() {
        let schema = CandidateSchema::default();
        let header = vec!["id".to_string(), "skills".to_string(), "years_experience".to_string()];
        let cols = schema.describe(&header);
        assert_eq!(cols.len(), 3);
        assert_eq!(cols[0].name, "id");
        assert_eq!(cols[1].field_type, FieldType::List);
        assert_eq!(cols[2].field_type, FieldType::Number);
    }
}
