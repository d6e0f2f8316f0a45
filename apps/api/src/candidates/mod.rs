// Candidate engine: CSV parsing, plan-driven filtering and ranking, and
// summary statistics over an immutable in-memory dataset.

pub mod dataset;
pub mod diagnostics;
pub mod filter;
pub mod handlers;
pub mod parser;
pub mod rank;
pub mod record;
pub mod schema;
pub mod search;
pub mod stats;
