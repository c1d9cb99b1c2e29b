use serde::{Deserialize, Serialize};

const POSITIVE_WORDS: [&str; 7] = ["happy", "grateful", "good", "excited", "love", "joy", "hope"];
const NEGATIVE_WORDS: [&str; 8] = [
    "sad", "angry", "anxious", "bad", "depressed", "tired", "hopeless", "stress",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sentiment {
    Positive,
    Neutral,
    Negative,
}

impl Sentiment {
    pub fn suggestion(&self) -> &'static str {
        match self {
            Sentiment::Positive => {
                "Keep up the positive mindset! Consider sharing your joy with someone or setting a new goal."
            }
            Sentiment::Negative => {
                "It seems you're having a tough time. Try a short mindfulness exercise, talk to a friend, or take a walk. Remember, it's okay to ask for help."
            }
            Sentiment::Neutral => {
                "Reflect on your day and consider what small thing could make tomorrow better."
            }
        }
    }
}

/// Keyword tally: +1 per positive word present, -1 per negative word.
///
/// Substring match, so "hopeless" also counts "hope".
pub fn analyze_sentiment(text: &str) -> Sentiment {
    let lower = text.to_lowercase();
    let hits = |words: &[&str]| words.iter().filter(|w| lower.contains(*w)).count() as i32;

    match hits(&POSITIVE_WORDS) - hits(&NEGATIVE_WORDS) {
        score if score > 0 => Sentiment::Positive,
        score if score < 0 => Sentiment::Negative,
        _ => Sentiment::Neutral,
    }
}

/// Tip based on the average of recent mood scores
pub fn mood_suggestion(moods: &[u8]) -> &'static str {
    if moods.is_empty() {
        return "Track your mood daily to get personalized tips!";
    }

    let average = moods.iter().map(|m| f64::from(*m)).sum::<f64>() / moods.len() as f64;
    if average <= 4.0 {
        "It looks like you've been feeling down. Try some self-care, talk to a friend, or take a walk outside."
    } else if average <= 7.0 {
        "Your mood has been average. Consider doing something you enjoy or practicing mindfulness."
    } else {
        "Great mood! Keep up the positive habits and spread your joy!"
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MoodLevel {
    pub value: u8,
    pub label: &'static str,
}

pub const MOOD_SCALE: [MoodLevel; 5] = [
    MoodLevel { value: 2, label: "Very Sad" },
    MoodLevel { value: 4, label: "Sad" },
    MoodLevel { value: 6, label: "Neutral" },
    MoodLevel { value: 8, label: "Happy" },
    MoodLevel { value: 10, label: "Very Happy" },
];

impl MoodLevel {
    pub fn lookup(value: u8) -> Option<MoodLevel> {
        MOOD_SCALE.iter().copied().find(|level| level.value == value)
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Therapist {
    pub id: u32,
    pub name: &'static str,
    pub specialty: &'static str,
    pub availability: &'static str,
    pub rating: f32,
    pub experience: &'static str,
    pub location: &'static str,
    pub price: &'static str,
}

pub fn therapists() -> Vec<Therapist> {
    vec![
        Therapist {
            id: 1,
            name: "Dr. Asha Verma",
            specialty: "Anxiety & Depression",
            availability: "Mon-Wed",
            rating: 4.9,
            experience: "8 years",
            location: "Online Sessions",
            price: "$120/session",
        },
        Therapist {
            id: 2,
            name: "Dr. Michael Chen",
            specialty: "Trauma & PTSD",
            availability: "Tue-Thu",
            rating: 4.8,
            experience: "12 years",
            location: "Online Sessions",
            price: "$140/session",
        },
        Therapist {
            id: 3,
            name: "Dr. Sarah Johnson",
            specialty: "Relationship Counseling",
            availability: "Wed-Fri",
            rating: 4.9,
            experience: "10 years",
            location: "Online Sessions",
            price: "$130/session",
        },
    ]
}
