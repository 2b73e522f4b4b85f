// All LLM prompt constants for the Matching module.
// Reuses cross-cutting fragments from llm_client::prompts.

use crate::llm_client::prompts::or_not_specified;
use crate::models::profile::Profile;

/// Output budget for a one-or-two sentence activity.
pub const ACTIVITY_MAX_TOKENS: u32 = 100;
/// Output budget for a numbered list of up to five questions.
pub const STARTERS_MAX_TOKENS: u32 = 200;

/// Activity prompt. Replace `{person_1}` and `{person_2}` before sending.
pub const ACTIVITY_PROMPT_TEMPLATE: &str = "Based on these two people's profiles, suggest ONE \
specific, meaningful activity they could do together to build their connection. Keep it \
practical, engaging, and tailored to their interests and backgrounds.

{person_1}

{person_2}

Suggest one creative, specific activity that would help them connect meaningfully. Keep it to \
1-2 sentences. Focus on shared interests or complementary strengths.";

/// Conversation starter prompt. Replace `{person_1}` and `{person_2}` before sending.
pub const STARTERS_PROMPT_TEMPLATE: &str = "Based on these two people's profiles, create 3-5 \
thoughtful conversation starter questions that would help them connect on a deeper level. The \
questions should be open-ended, meaningful, and tailored to their shared interests, values, or \
backgrounds.

{person_1}

{person_2}

Generate 3-5 conversation starter questions. Each question should be engaging and help them \
explore shared interests or values. Return them as a numbered list.";

/// Renders one person's block. Every slot is always present, so the prompt
/// shape never depends on how complete a profile is.
pub fn render_person(label: &str, profile: &Profile) -> String {
    let slots: [(&str, &Option<String>); 12] = [
        ("Connection type", &profile.relationship_goals),
        ("Values", &profile.keystone_values),
        ("Interests", &profile.interests),
        ("Current focus", &profile.current_focus),
        ("Current obsession", &profile.current_obsession),
        ("Endless topic", &profile.endless_topic),
        ("Curious thoughts", &profile.curious_thoughts),
        ("Energizing conversations", &profile.energizing_conversations),
        ("Conversation comfort", &profile.conversation_comfort),
        ("Presence triggers", &profile.presence_triggers),
        ("Growth areas", &profile.growth_through_challenge),
        ("Build/explore/create", &profile.build_explore_create),
    ];

    let mut block = format!("{label} ({}):", profile.name);
    for (name, value) in slots {
        block.push_str(&format!("\n- {name}: {}", or_not_specified(value)));
    }
    block
}

pub fn build_activity_prompt(a: &Profile, b: &Profile) -> String {
    fill(ACTIVITY_PROMPT_TEMPLATE, a, b)
}

pub fn build_starters_prompt(a: &Profile, b: &Profile) -> String {
    fill(STARTERS_PROMPT_TEMPLATE, a, b)
}

fn fill(template: &str, a: &Profile, b: &Profile) -> String {
    template
        .replace("{person_1}", &render_person("Person 1", a))
        .replace("{person_2}", &render_person("Person 2", b))
}
