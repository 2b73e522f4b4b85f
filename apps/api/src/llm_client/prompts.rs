// Shared prompt fragments and prompt-building utilities.
// Each service that needs LLM calls defines its own prompts.rs alongside it.

/// Rendered in place of any profile attribute the user left empty.
/// Prompts always carry every slot so the service sees a fixed shape.
pub const NOT_SPECIFIED: &str = "Not specified";

/// Sampling temperature used for all enrichment prompts.
pub const ENRICHMENT_TEMPERATURE: f32 = 0.7;

/// Returns the attribute text, or the placeholder when it is absent or blank.
pub fn or_not_specified(field: &Option<String>) -> &str {
    field
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .unwrap_or(NOT_SPECIFIED)
}
