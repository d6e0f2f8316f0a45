//! Summarizer: ranked candidates + stats → recruiter-facing prose.
//!
//! `LlmSummarizer` is the default. `TemplateSummarizer` is deterministic and
//! needs no network, selected with `SUMMARY_BACKEND=template`.

use async_trait::async_trait;

use crate::assistant::prompts::{NO_MATCHES_MESSAGE, SUMMARY_PROMPT_TEMPLATE, SUMMARY_SYSTEM};
use crate::candidates::record::CandidateRecord;
use crate::candidates::stats::AggregateStats;
use crate::errors::AppError;
use crate::llm_client::LlmClient;

#[async_trait]
pub trait Summarizer: Send + Sync {
    async fn summarize(
        &self,
        query: &str,
        top: &[&CandidateRecord],
        stats: &AggregateStats,
    ) -> Result<String, AppError>;

    /// "llm" | "template", reported back to clients.
    fn backend(&self) -> &'static str;
}

/// Summarizes, short-circuiting to a fixed message when nothing matched.
pub async fn summarize_results(
    summarizer: &dyn Summarizer,
    query: &str,
    top: &[&CandidateRecord],
    stats: &AggregateStats,
) -> Result<String, AppError> {
    if top.is_empty() {
        return Ok(NO_MATCHES_MESSAGE.to_string());
    }
    summarizer.summarize(query, top, stats).await
}

pub struct LlmSummarizer(pub LlmClient);

#[async_trait]
impl Summarizer for LlmSummarizer {
    async fn summarize(
        &self,
        query: &str,
        top: &[&CandidateRecord],
        stats: &AggregateStats,
    ) -> Result<String, AppError> {
        let candidates = top
            .iter()
            .map(|c| describe_candidate(c))
            .collect::<Vec<_>>()
            .join("\n---\n");

        let prompt = SUMMARY_PROMPT_TEMPLATE
            .replace("{query}", query.trim())
            .replace("{stats}", &describe_stats(stats))
            .replace("{candidates}", &candidates);

        self.0
            .call_text(&prompt, SUMMARY_SYSTEM)
            .await
            .map_err(|e| AppError::llm("Summary generation", e))
    }

    fn backend(&self) -> &'static str {
        "llm"
    }
}

pub struct TemplateSummarizer;

#[async_trait]
impl Summarizer for TemplateSummarizer {
    async fn summarize(
        &self,
        query: &str,
        top: &[&CandidateRecord],
        stats: &AggregateStats,
    ) -> Result<String, AppError> {
        let noun = if stats.count == 1 { "candidate" } else { "candidates" };
        let mut out = format!(
            "Found {} {noun} for \"{}\" with an average of {} years of experience.",
            stats.count,
            query.trim(),
            stats.avg_experience
        );
        if !stats.top_skills.is_empty() {
            out.push_str(&format!(
                " Most common skills: {}.",
                stats.top_skills.join(", ")
            ));
        }

        out.push_str("\n\nTop matches:");
        for (rank, candidate) in top.iter().enumerate() {
            out.push_str(&format!("\n{}. {}", rank + 1, headline(candidate)));
        }
        Ok(out)
    }

    fn backend(&self) -> &'static str {
        "template"
    }
}

fn field<'a>(candidate: &'a CandidateRecord, name: &str) -> &'a str {
    candidate.text(name).unwrap_or("unknown")
}

/// One line per candidate: name, title, location, experience.
fn headline(candidate: &CandidateRecord) -> String {
    format!(
        "{}, {} ({}), {} years",
        field(candidate, "full_name"),
        field(candidate, "title"),
        field(candidate, "location"),
        candidate.number("years_experience").unwrap_or(0.0)
    )
}

fn describe_candidate(candidate: &CandidateRecord) -> String {
    let mut lines = vec![
        format!("ID: {}", candidate.id().unwrap_or("unknown")),
        format!("Name: {}", field(candidate, "full_name")),
        format!("Title: {}", field(candidate, "title")),
        format!("Location: {}", field(candidate, "location")),
        format!(
            "Experience: {} years",
            candidate.number("years_experience").unwrap_or(0.0)
        ),
        format!("Skills: {}", candidate.list("skills").join(", ")),
        format!(
            "Education: {} in {}",
            field(candidate, "education_level"),
            field(candidate, "degree_major")
        ),
    ];
    if let Some(summary) = candidate.text("summary").filter(|s| !s.is_empty()) {
        lines.push(format!("Summary: {summary}"));
    }
    lines.join("\n")
}

fn describe_stats(stats: &AggregateStats) -> String {
    format!(
        "Total matches: {}\nAverage experience: {} years\nMost common skills: {}",
        stats.count,
        stats.avg_experience,
        stats.top_skills.join(", ")
    )
}
