use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::candidates::record::CandidateRecord;
use crate::candidates::schema::{EXPERIENCE_FIELD, SKILLS_FIELD};

const TOP_SKILLS_LIMIT: usize = 5;

/// Summary of a filtered candidate set, handed to the summarizer.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AggregateStats {
    pub count: usize,
    /// Mean years of experience, rounded to one decimal.
    pub avg_experience: f64,
    /// Most frequent skills, most common first. Ties keep first-seen order.
    pub top_skills: Vec<String>,
}

pub fn aggregate_stats(records: &[&CandidateRecord]) -> AggregateStats {
    if records.is_empty() {
        return AggregateStats::default();
    }

    let count = records.len();
    let total: f64 = records
        .iter()
        .map(|r| r.number(EXPERIENCE_FIELD).unwrap_or(0.0))
        .sum();

    let mut frequencies: IndexMap<&str, usize> = IndexMap::new();
    for record in records {
        for skill in record.list(SKILLS_FIELD) {
            *frequencies.entry(skill.as_str()).or_insert(0) += 1;
        }
    }

    let mut ranked: Vec<(&str, usize)> = frequencies.into_iter().collect();
    // stable: equal counts stay in insertion order
    ranked.sort_by(|a, b| b.1.cmp(&a.1));

    AggregateStats {
        count,
        avg_experience: round_one_decimal(total / count as f64),
        top_skills: ranked
            .into_iter()
            .take(TOP_SKILLS_LIMIT)
            .map(|(skill, _)| skill.to_string())
            .collect(),
    }
}

/// Half-up rounding to one decimal place.
fn round_one_decimal(value: f64) -> f64 {
    (value * 10.0 + 0.5).floor() / 10.0
}
