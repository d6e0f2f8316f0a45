//! Filter evaluator: applies an include/exclude plan to the candidate set.
//!
//! Plans come from a language model and are frequently sloppy, so matching is
//! fuzzy (substring, delimited segment, or case-insensitive regex) and nothing
//! in a plan can make filtering fail.

use std::collections::HashMap;

use indexmap::IndexMap;
use regex::{Regex, RegexBuilder};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::candidates::diagnostics::{Diagnostic, DiagnosticKind, Diagnostics};
use crate::candidates::record::{CandidateRecord, FieldValue};
use crate::candidates::schema::{LOCATION_FIELD, TITLE_FIELD};

/// A single value a field is tested against.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Scalar {
    Flag(bool),
    Number(f64),
    Text(String),
}

impl Scalar {
    fn from_json(value: Value) -> Self {
        match value {
            Value::Bool(b) => Scalar::Flag(b),
            Value::Number(n) => match n.as_f64() {
                Some(f) => Scalar::Number(f),
                None => Scalar::Text(n.to_string()),
            },
            Value::String(s) => Scalar::Text(s),
            other => Scalar::Text(other.to_string()),
        }
    }

    pub fn render(&self) -> String {
        match self {
            Scalar::Flag(b) => b.to_string(),
            Scalar::Number(n) => n.to_string(),
            Scalar::Text(s) => s.clone(),
        }
    }
}

/// A scalar, or a list meaning "any of these".
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Criterion {
    One(Scalar),
    AnyOf(Vec<Scalar>),
}

impl Criterion {
    pub fn values(&self) -> &[Scalar] {
        match self {
            Criterion::One(s) => std::slice::from_ref(s),
            Criterion::AnyOf(items) => items,
        }
    }
}

impl From<Value> for Criterion {
    fn from(value: Value) -> Self {
        match value {
            Value::Array(items) => {
                Criterion::AnyOf(items.into_iter().map(Scalar::from_json).collect())
            }
            other => Criterion::One(Scalar::from_json(other)),
        }
    }
}

impl From<&str> for Criterion {
    fn from(s: &str) -> Self {
        Criterion::One(Scalar::Text(s.to_string()))
    }
}

impl<'de> Deserialize<'de> for Criterion {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Value::deserialize(deserializer).map(Criterion::from)
    }
}

/// Include/exclude criteria keyed by field name, in plan order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FilterPlan {
    #[serde(
        default,
        deserialize_with = "lenient_criteria",
        skip_serializing_if = "IndexMap::is_empty"
    )]
    pub include: IndexMap<String, Criterion>,
    #[serde(
        default,
        deserialize_with = "lenient_criteria",
        skip_serializing_if = "IndexMap::is_empty"
    )]
    pub exclude: IndexMap<String, Criterion>,
}

impl FilterPlan {
    pub fn is_empty(&self) -> bool {
        self.include.is_empty() && self.exclude.is_empty()
    }
}

/// Anything other than a JSON object is read as "no criteria".
fn lenient_criteria<'de, D>(deserializer: D) -> Result<IndexMap<String, Criterion>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Object(map) => map
            .into_iter()
            .map(|(field, criterion)| (field, Criterion::from(criterion)))
            .collect(),
        _ => IndexMap::new(),
    })
}

// ────────────────────────────────────────────────────────────────────────────
// Plan normalization
// ────────────────────────────────────────────────────────────────────────────

/// Removes location words that leaked into the title criterion, e.g.
/// "Backend Engineer South Africa" + location "South Africa".
///
/// Only applies when both `include.title` and `include.location` are single
/// strings. Can also strip a legitimate title word that happens to be a
/// location word; that is accepted behavior.
pub fn normalize_plan(plan: &FilterPlan) -> FilterPlan {
    let mut normalized = plan.clone();

    let cleaned = match (
        plan.include.get(TITLE_FIELD),
        plan.include.get(LOCATION_FIELD),
    ) {
        (
            Some(Criterion::One(Scalar::Text(title))),
            Some(Criterion::One(Scalar::Text(location))),
        ) => strip_location_words(title, location),
        _ => None,
    };

    if let Some(title) = cleaned {
        normalized
            .include
            .insert(TITLE_FIELD.to_string(), Criterion::One(Scalar::Text(title)));
    }
    normalized
}

/// Returns the title without any word (longer than two characters) that also
/// appears in `location`, or `None` if nothing was stripped.
pub fn strip_location_words(title: &str, location: &str) -> Option<String> {
    let terms: Vec<String> = location
        .split_whitespace()
        .filter(|term| term.chars().count() > 2)
        .map(str::to_lowercase)
        .collect();

    let cleaned = title
        .split_whitespace()
        .filter(|word| !terms.contains(&word.to_lowercase()))
        .collect::<Vec<_>>()
        .join(" ");

    (cleaned != title.trim()).then_some(cleaned)
}

// ────────────────────────────────────────────────────────────────────────────
// Evaluation
// ────────────────────────────────────────────────────────────────────────────

/// Returns the records that satisfy every `include` criterion and no
/// `exclude` criterion, in input order.
pub fn filter_candidates<'a>(
    records: &'a [CandidateRecord],
    plan: &FilterPlan,
    diagnostics: &mut Diagnostics,
) -> Vec<&'a CandidateRecord> {
    if plan.is_empty() {
        return records.iter().collect();
    }

    let plan = normalize_plan(plan);

    if let Some(sample) = records.first() {
        for field in plan.include.keys().chain(plan.exclude.keys()) {
            if !sample.has_field(field) {
                diagnostics.record(
                    Diagnostic::new(
                        DiagnosticKind::UnknownFilterField,
                        format!("Filter field '{field}' is not a dataset column"),
                    )
                    .for_field(field.as_str()),
                );
            }
        }
    }

    let mut matcher = Matcher::new(diagnostics);
    records
        .iter()
        .filter(|record| matcher.passes(record, &plan))
        .collect()
}

/// True if the trailing comma-separated segment of `location` contains any
/// criterion value.
pub fn country_matches(location: &str, criterion: &Criterion) -> bool {
    let country = location
        .rsplit(',')
        .next()
        .unwrap_or_default()
        .trim()
        .to_lowercase();
    criterion
        .values()
        .iter()
        .any(|c| country.contains(&c.render().to_lowercase()))
}

/// Evaluates criteria against records, caching compiled patterns for the
/// lifetime of one filter call.
struct Matcher<'d> {
    patterns: HashMap<String, Option<Regex>>,
    diagnostics: &'d mut Diagnostics,
}

impl<'d> Matcher<'d> {
    fn new(diagnostics: &'d mut Diagnostics) -> Self {
        Self {
            patterns: HashMap::new(),
            diagnostics,
        }
    }

    fn passes(&mut self, record: &CandidateRecord, plan: &FilterPlan) -> bool {
        plan.include
            .iter()
            .all(|(field, criterion)| self.field_matches(record, field, criterion))
            && !plan
                .exclude
                .iter()
                .any(|(field, criterion)| self.field_matches(record, field, criterion))
    }

    /// An absent field never matches.
    fn field_matches(&mut self, record: &CandidateRecord, field: &str, criterion: &Criterion) -> bool {
        let Some(value) = record.get(field) else {
            return false;
        };

        if field == LOCATION_FIELD {
            if let FieldValue::Text(location) = value {
                if location.contains(',') && country_matches(location, criterion) {
                    return true;
                }
            }
        }

        criterion
            .values()
            .iter()
            .any(|c| self.value_matches(value, c))
    }

    fn value_matches(&mut self, value: &FieldValue, criterion: &Scalar) -> bool {
        match (value, criterion) {
            (FieldValue::List(items), _) => {
                return items.iter().any(|item| self.text_matches(item, criterion));
            }
            (FieldValue::Flag(v), Scalar::Flag(c)) => return v == c,
            (FieldValue::Number(v), Scalar::Number(c)) => return v == c,
            (FieldValue::Number(v), Scalar::Text(c)) => {
                if let Some(n) = numeric_criterion(c) {
                    return *v == n;
                }
            }
            _ => {}
        }
        self.text_matches(&value.render(), criterion)
    }

    fn text_matches(&mut self, value: &str, criterion: &Scalar) -> bool {
        let value = value.trim().to_lowercase();
        let raw = criterion.render();
        let needle = raw.trim().to_lowercase();

        if value.contains(&needle) {
            return true;
        }

        if value.contains([',', ';'])
            && value
                .split([',', ';'])
                .map(str::trim)
                .any(|part| part.contains(&needle) || needle.contains(part))
        {
            return true;
        }

        match criterion {
            Scalar::Text(_) => self.pattern_matches(raw.trim(), &value),
            _ => false,
        }
    }

    fn pattern_matches(&mut self, pattern: &str, haystack: &str) -> bool {
        if !self.patterns.contains_key(pattern) {
            let compiled = match RegexBuilder::new(pattern).case_insensitive(true).build() {
                Ok(re) => Some(re),
                Err(e) => {
                    self.diagnostics.record(Diagnostic::new(
                        DiagnosticKind::InvalidPattern,
                        format!("Criterion '{pattern}' is not a valid pattern: {e}"),
                    ));
                    None
                }
            };
            self.patterns.insert(pattern.to_string(), compiled);
        }

        self.patterns
            .get(pattern)
            .and_then(Option::as_ref)
            .is_some_and(|re| re.is_match(haystack))
    }
}

/// A criterion string that looks like a number, e.g. `"5"` or `" 2.5 "`.
fn numeric_criterion(raw: &str) -> Option<f64> {
    let trimmed = raw.trim();
    if trimmed.is_empty()
        || !trimmed
            .bytes()
            .all(|b| b.is_ascii_digit() || matches!(b, b'.' | b'+' | b'-' | b'e' | b'E'))
    {
        return None;
    }
    trimmed.parse::<f64>().ok()
}
