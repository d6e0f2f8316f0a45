//! Rank evaluator: multi-key stable sort driven by a primary key and ordered
//! tie-breakers.

use std::cmp::Ordering;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;

use crate::candidates::diagnostics::{Diagnostic, DiagnosticKind, Diagnostics};
use crate::candidates::record::{CandidateRecord, FieldValue};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Direction {
    Ascending,
    /// Also what any unrecognised direction token means.
    #[default]
    Descending,
}

impl Direction {
    pub fn parse(token: &str) -> Self {
        match token.trim().to_ascii_lowercase().as_str() {
            "asc" | "ascending" => Direction::Ascending,
            _ => Direction::Descending,
        }
    }

    fn apply(self, ordering: Ordering) -> Ordering {
        match self {
            Direction::Ascending => ordering,
            Direction::Descending => ordering.reverse(),
        }
    }
}

impl Serialize for Direction {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(match self {
            Direction::Ascending => "asc",
            Direction::Descending => "desc",
        })
    }
}

impl<'de> Deserialize<'de> for Direction {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Ok(match Value::deserialize(deserializer)? {
            Value::String(s) => Direction::parse(&s),
            _ => Direction::default(),
        })
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SortKey {
    #[serde(default)]
    pub field: String,
    #[serde(default)]
    pub direction: Direction,
}

#[cfg(test)]
impl SortKey {
    pub fn new(field: impl Into<String>, direction: Direction) -> Self {
        Self {
            field: field.into(),
            direction,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RankPlan {
    #[serde(default, deserialize_with = "lenient_key")]
    pub primary: Option<SortKey>,
    #[serde(default, deserialize_with = "lenient_keys", skip_serializing_if = "Vec::is_empty")]
    pub tie_breakers: Vec<SortKey>,
}

#[cfg(test)]
impl RankPlan {
    pub fn by(field: impl Into<String>, direction: Direction) -> Self {
        Self {
            primary: Some(SortKey::new(field, direction)),
            tie_breakers: Vec::new(),
        }
    }

    pub fn then(mut self, field: impl Into<String>, direction: Direction) -> Self {
        self.tie_breakers.push(SortKey::new(field, direction));
        self
    }
}

fn sort_key_from(value: Value) -> Option<SortKey> {
    match value {
        Value::Object(_) => serde_json::from_value(value).ok(),
        _ => None,
    }
}

fn lenient_key<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<SortKey>, D::Error> {
    Ok(sort_key_from(Value::deserialize(deserializer)?))
}

fn lenient_keys<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<SortKey>, D::Error> {
    Ok(match Value::deserialize(deserializer)? {
        Value::Array(items) => items.into_iter().filter_map(sort_key_from).collect(),
        _ => Vec::new(),
    })
}

/// Orders `records` by the plan. Records comparing equal on every key keep
/// their input order.
///
/// A missing primary key, or one naming a field the records do not have,
/// leaves the order untouched. Unknown tie-breakers are skipped.
pub fn rank_candidates<'a>(
    records: &[&'a CandidateRecord],
    plan: &RankPlan,
    diagnostics: &mut Diagnostics,
) -> Vec<&'a CandidateRecord> {
    let Some(sample) = records.first() else {
        return Vec::new();
    };

    let primary = match &plan.primary {
        Some(key) if !key.field.is_empty() => key,
        _ => return records.to_vec(),
    };

    if !sample.has_field(&primary.field) {
        let available: Vec<&str> = sample.field_names().collect();
        diagnostics.record(
            Diagnostic::new(
                DiagnosticKind::UnknownRankField,
                format!(
                    "Cannot rank by '{}'; available fields: {}",
                    primary.field,
                    available.join(", ")
                ),
            )
            .for_field(primary.field.as_str()),
        );
        return records.to_vec();
    }

    let mut keys = vec![primary];
    for key in &plan.tie_breakers {
        if sample.has_field(&key.field) {
            keys.push(key);
        } else {
            diagnostics.record(
                Diagnostic::new(
                    DiagnosticKind::UnknownTieBreaker,
                    format!("Skipping tie-breaker '{}'", key.field),
                )
                .for_field(key.field.as_str()),
            );
        }
    }

    let mut ranked = records.to_vec();
    ranked.sort_by(|a, b| {
        keys.iter()
            .map(|key| compare_values(a.get(&key.field), b.get(&key.field), key.direction))
            .find(|ordering| ordering.is_ne())
            .unwrap_or(Ordering::Equal)
    });
    ranked
}

/// Compares two field values under a direction.
///
/// A missing value sorts first when ascending and last when descending.
/// Numbers compare numerically, flags as `false < true`, lists by length,
/// and everything else by its rendered text.
pub fn compare_values(
    a: Option<&FieldValue>,
    b: Option<&FieldValue>,
    direction: Direction,
) -> Ordering {
    let (a, b) = match (a, b) {
        (None, None) => return Ordering::Equal,
        (None, Some(_)) => return direction.apply(Ordering::Less),
        (Some(_), None) => return direction.apply(Ordering::Greater),
        (Some(a), Some(b)) => (a, b),
    };

    let ordering = match (a, b) {
        (FieldValue::Number(x), FieldValue::Number(y)) => {
            x.partial_cmp(y).unwrap_or(Ordering::Equal)
        }
        (FieldValue::Flag(x), FieldValue::Flag(y)) => x.cmp(y),
        (FieldValue::List(x), FieldValue::List(y)) => x.len().cmp(&y.len()),
        _ => compare_text(&a.render(), &b.render()),
    };
    direction.apply(ordering)
}

/// Case-folded comparison first so "alice" sorts next to "Alice", then exact.
fn compare_text(a: &str, b: &str) -> Ordering {
    a.to_lowercase()
        .cmp(&b.to_lowercase())
        .then_with(|| a.cmp(b))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn candidate(id: &str, years: f64, name: &str, relocate: bool) -> CandidateRecord {
        [
            ("id".to_string(), FieldValue::Text(id.to_string())),
            ("full_name".to_string(), FieldValue::Text(name.to_string())),
            ("years_experience".to_string(), FieldValue::Number(years)),
            ("willing_to_relocate".to_string(), FieldValue::Flag(relocate)),
        ]
        .into_iter()
        .collect()
    }

    fn ids(records: &[&CandidateRecord]) -> Vec<String> {
        records
            .iter()
            .filter_map(|r| r.id())
            .map(String::from)
            .collect()
    }

    fn rank(records: &[CandidateRecord], plan: &RankPlan) -> (Vec<String>, Diagnostics) {
        let refs: Vec<&CandidateRecord> = records.iter().collect();
        let mut diags = Diagnostics::new();
        let out = rank_candidates(&refs, plan, &mut diags);
        (ids(&out), diags)
    }

    #[test]
    fn test_numeric_descending_and_ascending() {
        let records = vec![candidate("5", 5.0, "B", false), candidate("12", 10.0, "A", false)];

        let (out, _) = rank(&records, &RankPlan::by("years_experience", Direction::Descending));
        assert_eq!(out, vec!["12", "5"]);

        let (out, _) = rank(&records, &RankPlan::by("years_experience", Direction::Ascending));
        assert_eq!(out, vec!["5", "12"]);
    }

    #[test]
    fn test_tie_breaker_applies_on_equal_primary() {
        let records = vec![
            candidate("1", 5.0, "Zoe", false),
            candidate("2", 5.0, "adam", false),
            candidate("3", 8.0, "Mia", false),
        ];
        let plan = RankPlan::by("years_experience", Direction::Descending)
            .then("full_name", Direction::Ascending);

        let (out, _) = rank(&records, &plan);
        assert_eq!(out, vec!["3", "2", "1"]);
    }

    #[test]
    fn test_equal_keys_keep_input_order() {
        let records: Vec<_> = (0..10)
            .map(|i| candidate(&i.to_string(), (i % 2) as f64, "same", true))
            .collect();
        let (out, _) = rank(&records, &RankPlan::by("years_experience", Direction::Ascending));
        assert_eq!(out, vec!["0", "2", "4", "6", "8", "1", "3", "5", "7", "9"]);
    }

    #[test]
    fn test_unknown_primary_leaves_order_unchanged() {
        let records = vec![
            candidate("1", 1.0, "A", false),
            candidate("2", 9.0, "B", false),
            candidate("3", 4.0, "C", false),
        ];
        let (out, diags) = rank(&records, &RankPlan::by("nonexistent_field", Direction::Ascending));
        assert_eq!(out, vec!["1", "2", "3"]);
        assert!(diags.has(DiagnosticKind::UnknownRankField));
    }

    #[test]
    fn test_missing_primary_leaves_order_unchanged() {
        let records = vec![candidate("2", 1.0, "A", false), candidate("1", 9.0, "B", false)];
        let (out, diags) = rank(&records, &RankPlan::default());
        assert_eq!(out, vec!["2", "1"]);
        assert!(diags.is_empty());

        let (out, _) = rank(&records, &RankPlan::by("", Direction::Ascending));
        assert_eq!(out, vec!["2", "1"]);
    }

    #[test]
    fn test_unknown_tie_breaker_is_skipped() {
        let records = vec![
            candidate("1", 3.0, "Bea", false),
            candidate("2", 3.0, "Al", false),
        ];
        let plan = RankPlan::by("years_experience", Direction::Descending)
            .then("shoe_size", Direction::Ascending)
            .then("full_name", Direction::Ascending);
        let (out, diags) = rank(&records, &plan);
        assert_eq!(out, vec!["2", "1"]);
        assert!(diags.has(DiagnosticKind::UnknownTieBreaker));
    }

    #[test]
    fn test_empty_input() {
        let (out, diags) = rank(&[], &RankPlan::by("years_experience", Direction::Ascending));
        assert!(out.is_empty());
        assert!(diags.is_empty());
    }

    #[test]
    fn test_flags_sort_false_before_true() {
        let records = vec![
            candidate("1", 0.0, "A", true),
            candidate("2", 0.0, "B", false),
        ];
        let (out, _) = rank(&records, &RankPlan::by("willing_to_relocate", Direction::Ascending));
        assert_eq!(out, vec!["2", "1"]);
    }

    #[test]
    fn test_compare_values_by_type() {
        use Direction::*;
        let list = |n: usize| FieldValue::List(vec!["x".to_string(); n]);

        assert_eq!(compare_values(None, None, Ascending), Ordering::Equal);
        assert_eq!(
            compare_values(None, Some(&FieldValue::Number(1.0)), Ascending),
            Ordering::Less
        );
        assert_eq!(
            compare_values(None, Some(&FieldValue::Number(1.0)), Descending),
            Ordering::Greater
        );
        assert_eq!(
            compare_values(Some(&list(3)), Some(&list(1)), Ascending),
            Ordering::Greater
        );
        assert_eq!(
            compare_values(
                Some(&FieldValue::Text("apple".into())),
                Some(&FieldValue::Text("Banana".into())),
                Ascending
            ),
            Ordering::Less
        );
        // mixed types fall back to rendered text: "10" < "9"
        assert_eq!(
            compare_values(
                Some(&FieldValue::Number(10.0)),
                Some(&FieldValue::Text("9".into())),
                Ascending
            ),
            Ordering::Less
        );
    }

    #[test]
    fn test_plan_deserialization_is_lenient() {
        let plan: RankPlan = serde_json::from_value(json!({
            "primary": {"field": "years_experience", "direction": "ascending"},
            "tie_breakers": [{"field": "full_name", "direction": "DESC"}, "junk", {"field": "id"}]
        }))
        .unwrap();
        assert_eq!(
            plan.primary,
            Some(SortKey::new("years_experience", Direction::Ascending))
        );
        assert_eq!(plan.tie_breakers.len(), 2);
        assert_eq!(plan.tie_breakers[0].direction, Direction::Descending);
        assert_eq!(plan.tie_breakers[1].direction, Direction::Descending);

        let plan: RankPlan = serde_json::from_value(json!({"primary": "years_experience"})).unwrap();
        assert_eq!(plan.primary, None);

        let plan: RankPlan = serde_json::from_value(json!({})).unwrap();
        assert_eq!(plan, RankPlan::default());
    }

    #[test]
    fn test_direction_serializes_short_tokens() {
        assert_eq!(serde_json::to_value(Direction::Ascending).unwrap(), json!("asc"));
        assert_eq!(serde_json::to_value(Direction::Descending).unwrap(), json!("desc"));
        assert_eq!(Direction::parse("Asc"), Direction::Ascending);
        assert_eq!(Direction::parse("sideways"), Direction::Descending);
    }
}
