use serde::{Deserialize, Serialize};
use serde_json::Value;
use sqlx::FromRow;
use uuid::Uuid;

/// Column list shared by every profile query. Keeps private columns (email, timestamps)
/// out of the matching engine.
pub const PROFILE_COLUMNS: &str = "id, name, age, location, career, industry, interests, \
    keystone_values, favorite_books, favorite_authors, cultural_upbringing, life_philosophy, \
    what_im_looking_for, hobbies, relationship_goals, preferred_communication_style, \
    current_focus, current_obsession, endless_topic, curious_thoughts, \
    energizing_conversations, conversation_comfort, presence_triggers, \
    growth_through_challenge, build_explore_create, is_active";

/// A user's self-description as read by the matching engine.
/// Owned by the profile-management service; never written here.
#[derive(Debug, Clone, Default, Serialize, Deserialize, FromRow)]
pub struct Profile {
    pub id: Uuid,
    pub name: String,
    pub age: Option<i32>,
    pub location: Option<Value>,
    pub career: Option<String>,
    pub industry: Option<String>,
    pub interests: Option<String>,
    pub keystone_values: Option<String>,
    pub favorite_books: Option<String>,
    pub favorite_authors: Option<String>,
    pub cultural_upbringing: Option<String>,
    pub life_philosophy: Option<String>,
    pub what_im_looking_for: Option<String>,
    pub hobbies: Option<String>,
    pub relationship_goals: Option<String>,
    pub preferred_communication_style: Option<String>,

    // Conversation-oriented prompts (fed to the generation service only)
    pub current_focus: Option<String>,
    pub current_obsession: Option<String>,
    pub endless_topic: Option<String>,
    pub curious_thoughts: Option<String>,
    pub energizing_conversations: Option<String>,
    pub conversation_comfort: Option<String>,
    pub presence_triggers: Option<String>,
    pub growth_through_challenge: Option<String>,
    pub build_explore_create: Option<String>,

    #[serde(default)]
    pub is_active: bool,
}

/// Returns the attribute text when it is non-empty. Whitespace-only answers
/// still count as answered.
pub fn populated(field: &Option<String>) -> Option<&str> {
    field.as_deref().filter(|s| !s.is_empty())
}

pub fn is_populated(field: &Option<String>) -> bool {
    populated(field).is_some()
}
