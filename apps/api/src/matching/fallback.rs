//! Rule-based enrichment content. Deterministic and side-effect free.
//!
//! Used directly whenever AI generation fails or misses its deadline, so every
//! pair always gets an activity and at least one conversation starter.
//! Rules are evaluated top to bottom; their order is part of the contract.

use crate::models::profile::{is_populated, Profile};

/// Most conversation starters a pair ever receives.
pub const MAX_CONVERSATION_STARTERS: usize = 5;

pub const DEFAULT_ACTIVITY: &str =
    "Have a meaningful conversation about your shared interests and values";

pub const DEFAULT_CONVERSATION_STARTERS: [&str; 3] = [
    "What's a question that's been on your mind lately?",
    "What experience has shaped who you are today?",
    "What are you most curious about exploring?",
];

/// A content rule: when `applies` holds for the pair, `text` is produced.
pub struct Rule {
    pub applies: fn(&Profile, &Profile) -> bool,
    pub text: &'static str,
}

fn either(a: &Profile, b: &Profile, field: fn(&Profile) -> &Option<String>) -> bool {
    is_populated(field(a)) || is_populated(field(b))
}

/// First match wins.
pub const ACTIVITY_RULES: [Rule; 4] = [
    Rule {
        applies: |a, b| either(a, b, |p| &p.favorite_books),
        text: "Read a book together and discuss its key themes and insights",
    },
    Rule {
        applies: |a, b| either(a, b, |p| &p.career),
        text: "Collaborate on a small project or share professional insights",
    },
    Rule {
        applies: |a, b| either(a, b, |p| &p.life_philosophy),
        text: "Have a deep conversation about life philosophy and worldviews",
    },
    Rule {
        applies: |a, b| either(a, b, |p| &p.hobbies),
        text: "Explore a shared hobby or try something new together",
    },
];

/// Every match contributes one question.
pub const CONVERSATION_RULES: [Rule; 5] = [
    Rule {
        applies: |a, b| is_populated(&a.keystone_values) && is_populated(&b.keystone_values),
        text: "What's a core value that has shaped how you navigate challenges?",
    },
    Rule {
        applies: |a, b| either(a, b, |p| &p.interests),
        text: "What's something you've been curious about or exploring lately?",
    },
    Rule {
        applies: |a, b| either(a, b, |p| &p.life_philosophy),
        text: "What's a perspective or idea that changed how you see the world?",
    },
    Rule {
        applies: |a, b| either(a, b, |p| &p.relationship_goals),
        text: "What does a meaningful connection look like to you?",
    },
    Rule {
        applies: |a, b| either(a, b, |p| &p.favorite_books) || either(a, b, |p| &p.favorite_authors),
        text: "What's a book or idea that has deeply influenced your thinking?",
    },
];

/// Exactly one activity: the first rule that applies, else the generic suggestion.
pub fn fallback_activity(a: &Profile, b: &Profile) -> String {
    ACTIVITY_RULES
        .iter()
        .find(|rule| (rule.applies)(a, b))
        .map(|rule| rule.text)
        .unwrap_or(DEFAULT_ACTIVITY)
        .to_string()
}

/// One question per applicable rule, capped at five; three generic questions when none apply.
pub fn fallback_conversation_starters(a: &Profile, b: &Profile) -> Vec<String> {
    let questions: Vec<String> = CONVERSATION_RULES
        .iter()
        .filter(|rule| (rule.applies)(a, b))
        .take(MAX_CONVERSATION_STARTERS)
        .map(|rule| rule.text.to_string())
        .collect();

    if questions.is_empty() {
        return default_conversation_starters();
    }
    questions
}

pub fn default_conversation_starters() -> Vec<String> {
    DEFAULT_CONVERSATION_STARTERS
        .iter()
        .map(|q| q.to_string())
        .collect()
}
