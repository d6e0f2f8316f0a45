// The two language-model collaborators around the candidate engine: a planner
// that turns a query into a filter/rank plan and a summarizer that turns
// ranked results into prose. All model calls go through llm_client.

pub mod handlers;
pub mod pipeline;
pub mod planner;
pub mod prompts;
pub mod summarizer;
