use mindease_persist::UserProfile;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::templates::{
    CHAT_CLOSING, CHAT_PREAMBLE, JOURNAL_CLOSING, JOURNAL_PREAMBLE, NOT_PROVIDED, NOT_SPECIFIED,
    PROFILE_HEADER, WELCOME_ANONYMOUS,
};

/// The slice of a profile the model is allowed to see.
///
/// Every field is optional; an empty string, a zero age or an empty list all
/// count as "not set".
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileProjection {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub age: Option<u32>,
    #[serde(default)]
    pub fears: Vec<String>,
    #[serde(default)]
    pub stress_factors: Vec<String>,
    #[serde(default)]
    pub hobbies: Vec<String>,
}

impl ProfileProjection {
    /// Best-effort read of client-supplied profile JSON.
    ///
    /// Fields with the wrong shape are dropped instead of failing the whole
    /// projection, so a half-filled profile form still yields a prompt.
    pub fn from_value(value: &Value) -> Self {
        let strings = |key: &str| -> Vec<String> {
            value
                .get(key)
                .and_then(Value::as_array)
                .map(|items| {
                    items
                        .iter()
                        .filter_map(Value::as_str)
                        .map(str::to_string)
                        .collect()
                })
                .unwrap_or_default()
        };

        let age = match value.get("age") {
            Some(Value::Number(n)) => n.as_u64().and_then(|n| u32::try_from(n).ok()),
            Some(Value::String(s)) => s.trim().parse().ok(),
            _ => None,
        };

        Self {
            name: value.get("name").and_then(Value::as_str).map(str::to_string),
            age,
            fears: strings("fears"),
            stress_factors: strings("stressFactors"),
            hobbies: strings("hobbies"),
        }
    }

    fn display_name(&self) -> Option<&str> {
        self.name.as_deref().map(str::trim).filter(|n| !n.is_empty())
    }
}

impl From<&UserProfile> for ProfileProjection {
    fn from(profile: &UserProfile) -> Self {
        Self {
            name: Some(profile.name.clone()).filter(|n| !n.is_empty()),
            age: Some(profile.age).filter(|age| *age > 0),
            fears: profile.fears.clone(),
            stress_factors: profile.stress_factors.clone(),
            hobbies: profile.hobbies.clone(),
        }
    }
}

/// System prompt for the conversational companion
pub fn compose_chat_prompt(profile: Option<&ProfileProjection>) -> String {
    let profile = profile.cloned().unwrap_or_default();
    let lines = [
        name_line(&profile),
        age_line(&profile),
        list_line("Fears/Anxieties", "Fears", &profile.fears),
        list_line("Stress Factors", "Stress Factors", &profile.stress_factors),
        list_line("Hobbies/Interests", "Hobbies", &profile.hobbies),
    ];

    format!(
        "{}\n\n{}\n{}\n\n{}",
        CHAT_PREAMBLE,
        PROFILE_HEADER,
        lines.join("\n"),
        CHAT_CLOSING
    )
}

/// System prompt for single-shot journal prompt generation (age is not used)
pub fn compose_journal_prompt(profile: Option<&ProfileProjection>) -> String {
    let profile = profile.cloned().unwrap_or_default();
    let lines = [
        name_line(&profile),
        list_line("Fears/Anxieties", "Fears", &profile.fears),
        list_line("Stress Factors", "Stress Factors", &profile.stress_factors),
        list_line("Hobbies/Interests", "Hobbies", &profile.hobbies),
    ];

    format!(
        "{}\n\n{}\n{}\n\n{}",
        JOURNAL_PREAMBLE,
        PROFILE_HEADER,
        lines.join("\n"),
        JOURNAL_CLOSING
    )
}

/// Greeting that seeds every new conversation
pub fn welcome_message(name: Option<&str>) -> String {
    match name.map(str::trim).filter(|n| !n.is_empty()) {
        Some(name) => format!(
            "Hello {}! I'm here to listen and support you on your mental wellness journey. How are you feeling today?",
            name
        ),
        None => WELCOME_ANONYMOUS.to_string(),
    }
}

fn name_line(profile: &ProfileProjection) -> String {
    format!("Name: {}", profile.display_name().unwrap_or(NOT_PROVIDED))
}

fn age_line(profile: &ProfileProjection) -> String {
    match profile.age.filter(|age| *age > 0) {
        Some(age) => format!("Age: {}", age),
        None => format!("Age: {}", NOT_PROVIDED),
    }
}

fn list_line(label: &str, empty_label: &str, items: &[String]) -> String {
    let items: Vec<&str> = items
        .iter()
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .collect();

    if items.is_empty() {
        format!("{}: {}", empty_label, NOT_SPECIFIED)
    } else {
        format!("{}: {}", label, items.join(", "))
    }
}
