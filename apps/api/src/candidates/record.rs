use std::fmt;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::candidates::schema::{CandidateSchema, FieldType, ID_FIELD};

/// A single coerced cell.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Flag(bool),
    Number(f64),
    Text(String),
    List(Vec<String>),
}

impl FieldValue {
    /// Coerces a raw cell according to its column type.
    pub fn coerce(field_type: FieldType, raw: &str) -> Self {
        match field_type {
            FieldType::Number => FieldValue::Number(parse_number(raw)),
            FieldType::List => FieldValue::List(
                raw.split(';')
                    .filter(|item| !item.trim().is_empty())
                    .map(str::to_string)
                    .collect(),
            ),
            FieldType::Text | FieldType::Flag => {
                if raw.eq_ignore_ascii_case("yes") {
                    FieldValue::Flag(true)
                } else if raw.eq_ignore_ascii_case("no") {
                    FieldValue::Flag(false)
                } else {
                    FieldValue::Text(raw.to_string())
                }
            }
        }
    }

    /// String form used for substring matching and lexicographic ordering.
    pub fn render(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::Flag(b) => write!(f, "{b}"),
            FieldValue::Number(n) => write!(f, "{n}"),
            FieldValue::Text(s) => f.write_str(s),
            FieldValue::List(items) => f.write_str(&items.join(",")),
        }
    }
}

/// Blank and unparseable cells become zero.
fn parse_number(raw: &str) -> f64 {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return 0.0;
    }
    match trimmed.parse::<f64>() {
        Ok(n) if !n.is_nan() => n,
        _ => 0.0,
    }
}

/// One candidate row, keyed by column name in header order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CandidateRecord {
    fields: IndexMap<String, FieldValue>,
}

impl CandidateRecord {
    /// Builds a record from positional values. Missing trailing values are
    /// treated as empty cells; values past the last header are ignored.
    pub fn from_row(schema: &CandidateSchema, headers: &[String], values: &[String]) -> Self {
        let fields = headers
            .iter()
            .enumerate()
            .map(|(idx, name)| {
                let raw = values.get(idx).map(String::as_str).unwrap_or("");
                (name.clone(), FieldValue::coerce(schema.field_type(name), raw))
            })
            .collect();

        Self { fields }
    }

    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        self.fields.get(name)
    }

    pub fn has_field(&self, name: &str) -> bool {
        self.fields.contains_key(name)
    }

    pub fn field_names(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }

    pub fn text(&self, name: &str) -> Option<&str> {
        match self.fields.get(name) {
            Some(FieldValue::Text(s)) => Some(s),
            _ => None,
        }
    }

    pub fn number(&self, name: &str) -> Option<f64> {
        match self.fields.get(name) {
            Some(FieldValue::Number(n)) => Some(*n),
            _ => None,
        }
    }

    pub fn list(&self, name: &str) -> &[String] {
        match self.fields.get(name) {
            Some(FieldValue::List(items)) => items,
            _ => &[],
        }
    }

    pub fn id(&self) -> Option<&str> {
        self.text(ID_FIELD)
    }
}

#[cfg(test)]
impl FromIterator<(String, FieldValue)> for CandidateRecord {
    fn from_iter<T: IntoIterator<Item = (String, FieldValue)>>(iter: T) -> Self {
        Self {
            fields: iter.into_iter().collect(),
        }
    }
}
