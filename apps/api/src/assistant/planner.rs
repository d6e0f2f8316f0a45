//! Query planner: recruiter query → filter/rank plan.
//!
//! The plan is model output and may be partially wrong or malformed. Every
//! part of it deserializes leniently; a broken `filter` or `rank` section is
//! read as "no filtering" / "no ranking" rather than rejected.

use async_trait::async_trait;
use serde::{de::DeserializeOwned, Deserialize, Deserializer, Serialize};
use serde_json::Value;
use tracing::info;

use crate::assistant::prompts::{PLAN_PROMPT_TEMPLATE, PLAN_SYSTEM};
use crate::candidates::filter::FilterPlan;
use crate::candidates::rank::RankPlan;
use crate::candidates::schema::ColumnInfo;
use crate::errors::AppError;
use crate::llm_client::LlmClient;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ThinkResponse {
    #[serde(default, deserialize_with = "or_default")]
    pub filter: FilterPlan,
    #[serde(default, deserialize_with = "or_default")]
    pub rank: RankPlan,
}

fn or_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned + Default,
{
    let value = Value::deserialize(deserializer)?;
    Ok(serde_json::from_value(value).unwrap_or_default())
}

/// Turns a query into a plan. Carried in `AppState` as `Arc<dyn QueryPlanner>`.
#[async_trait]
pub trait QueryPlanner: Send + Sync {
    async fn plan(
        &self,
        query: &str,
        columns: &[ColumnInfo],
        csv_header: &str,
    ) -> Result<ThinkResponse, AppError>;
}

/// Plans via the hosted model.
pub struct LlmQueryPlanner(pub LlmClient);

#[async_trait]
impl QueryPlanner for LlmQueryPlanner {
    async fn plan(
        &self,
        query: &str,
        columns: &[ColumnInfo],
        csv_header: &str,
    ) -> Result<ThinkResponse, AppError> {
        let prompt = build_plan_prompt(query, columns, csv_header);
        let plan: ThinkResponse = self
            .0
            .call_json(&prompt, PLAN_SYSTEM)
            .await
            .map_err(|e| AppError::llm("Query planning", e))?;

        info!(
            include = plan.filter.include.len(),
            exclude = plan.filter.exclude.len(),
            primary = ?plan.rank.primary.as_ref().map(|k| k.field.as_str()),
            "Query planned"
        );
        Ok(plan)
    }
}

fn build_plan_prompt(query: &str, columns: &[ColumnInfo], csv_header: &str) -> String {
    let columns = columns
        .iter()
        .map(|c| {
            let kind = serde_json::to_value(c.field_type)
                .ok()
                .and_then(|v| v.as_str().map(str::to_string))
                .unwrap_or_default();
            format!("- {}: {}", c.name, kind)
        })
        .collect::<Vec<_>>()
        .join("\n");

    PLAN_PROMPT_TEMPLATE
        .replace("{columns}", &columns)
        .replace("{csv_header}", csv_header)
        .replace("{query}", query.trim())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::candidates::filter::Criterion;
    use crate::candidates::rank::{Direction, SortKey};
    use crate::candidates::schema::FieldType;
    use serde_json::json;

    #[test]
    fn test_think_response_full_deserializes() {
        let plan: ThinkResponse = serde_json::from_value(json!({
            "filter": {
                "include": {"skills": ["React", "Vue"], "location": "Cyprus"},
                "exclude": {"visa_status": "Requires Sponsorship"}
            },
            "rank": {
                "primary": {"field": "years_experience", "direction": "desc"},
                "tie_breakers": [{"field": "desired_salary_usd", "direction": "asc"}]
            }
        }))
        .unwrap();

        assert_eq!(plan.filter.include.len(), 2);
        assert_eq!(plan.filter.include["location"], Criterion::from("Cyprus"));
        assert_eq!(
            plan.rank.primary,
            Some(SortKey::new("years_experience", Direction::Descending))
        );
        assert_eq!(plan.rank.tie_breakers[0].direction, Direction::Ascending);
    }

    #[test]
    fn test_think_response_tolerates_broken_sections() {
        let plan: ThinkResponse =
            serde_json::from_value(json!({"filter": null, "rank": "by experience"})).unwrap();
        assert_eq!(plan, ThinkResponse::default());

        let plan: ThinkResponse = serde_json::from_value(json!({})).unwrap();
        assert!(plan.filter.is_empty());
        assert!(plan.rank.primary.is_none());
    }

    #[test]
    fn test_plan_prompt_lists_typed_columns() {
        let columns = vec![
            ColumnInfo {
                name: "skills".into(),
                field_type: FieldType::List,
            },
            ColumnInfo {
                name: "years_experience".into(),
                field_type: FieldType::Number,
            },
        ];
        let prompt = build_plan_prompt("  senior rust folks  ", &columns, "skills,years_experience");
        assert!(prompt.contains("- skills: list"));
        assert!(prompt.contains("- years_experience: number"));
        assert!(prompt.contains("CSV HEADER:\nskills,years_experience"));
        assert!(prompt.contains("QUERY:\nsenior rust folks\n"));
    }
}
