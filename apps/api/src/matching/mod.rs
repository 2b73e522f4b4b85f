// Matching & Enrichment Engine
// Implements: text similarity, compatibility scoring, rule-based fallback content,
// AI enrichment with deadline racing, match orchestration and storage seams.
// All text-generation calls go through llm_client; no direct API calls here.

pub mod compatibility;
pub mod enrichment;
pub mod fallback;
pub mod handlers;
pub mod orchestrator;
pub mod prompts;
pub mod similarity;
pub mod store;
