use std::path::Path;

use anyhow::{Context, Result};
use tracing::{info, warn};

use crate::candidates::diagnostics::Diagnostics;
use crate::candidates::parser::{parse_csv, split_header};
use crate::candidates::record::CandidateRecord;
use crate::candidates::schema::{CandidateSchema, ColumnInfo};

/// The candidate set, parsed once at startup and read-only afterwards.
#[derive(Debug, Clone)]
pub struct Dataset {
    pub schema: CandidateSchema,
    pub header: Vec<String>,
    pub records: Vec<CandidateRecord>,
    /// Warnings raised while parsing the source file.
    pub diagnostics: Diagnostics,
}

impl Dataset {
    pub fn from_csv(text: &str, schema: CandidateSchema) -> Self {
        let header = text
            .trim()
            .lines()
            .next()
            .map(split_header)
            .unwrap_or_default();

        let mut diagnostics = Diagnostics::new();
        let records = parse_csv(text, &schema, &mut diagnostics);

        Self {
            schema,
            header,
            records,
            diagnostics,
        }
    }

    pub fn load(path: impl AsRef<Path>, schema: CandidateSchema) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read candidate dataset '{}'", path.display()))?;

        let dataset = Self::from_csv(&text, schema);
        info!(
            "Loaded {} candidates ({} columns) from {}",
            dataset.records.len(),
            dataset.header.len(),
            path.display()
        );
        if !dataset.diagnostics.is_empty() {
            warn!(
                "{} warnings while parsing {}",
                dataset.diagnostics.len(),
                path.display()
            );
        }
        Ok(dataset)
    }

    /// Header line as the planner sees it.
    pub fn csv_header(&self) -> String {
        self.header.join(",")
    }

    pub fn columns(&self) -> Vec<ColumnInfo> {
        self.schema.describe(&self.header)
    }

    pub fn find(&self, id: &str) -> Option<&CandidateRecord> {
        self.records.iter().find(|r| r.id() == Some(id))
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[cfg(test)]
pub(crate) const SAMPLE_CSV: &str = include_str!("../../data/candidates.csv");

#[cfg(test)]
pub(crate) fn sample_dataset() -> Dataset {
    Dataset::from_csv(SAMPLE_CSV, CandidateSchema::default())
}
