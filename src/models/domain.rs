use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// Roommate profile as stored in the `users` collection
///
/// Only `budget`, `neighborhoods` and `roommate_preferences` take part in
/// scoring. Everything else is carried through for display, including
/// attributes this struct does not name (kept in `extra`). Display fields
/// hold raw JSON so that an odd value never rejects the whole profile.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RoommateProfile {
    #[serde(rename = "userId", default, deserialize_with = "lenient_id")]
    pub user_id: String,
    #[serde(default, deserialize_with = "raw_value", skip_serializing_if = "Option::is_none")]
    pub name: Option<Value>,
    #[serde(default, deserialize_with = "raw_value", skip_serializing_if = "Option::is_none")]
    pub age: Option<Value>,
    #[serde(default, deserialize_with = "raw_value", skip_serializing_if = "Option::is_none")]
    pub gender: Option<Value>,
    #[serde(default, deserialize_with = "raw_value", skip_serializing_if = "Option::is_none")]
    pub bio: Option<Value>,
    /// Raw budget value; may be a number, a numeric string or garbage
    #[serde(default, deserialize_with = "raw_value", skip_serializing_if = "Option::is_none")]
    pub budget: Option<Value>,
    #[serde(default, deserialize_with = "lenient_labels")]
    pub neighborhoods: Vec<String>,
    #[serde(rename = "roommatePreferences", default, deserialize_with = "lenient_labels")]
    pub roommate_preferences: Vec<String>,
    /// Inline-encoded images, opaque to this service
    #[serde(default, deserialize_with = "raw_value", skip_serializing_if = "Option::is_none")]
    pub photos: Option<Value>,
    #[serde(
        rename = "hasHouse",
        default,
        deserialize_with = "raw_value",
        skip_serializing_if = "Option::is_none"
    )]
    pub has_house: Option<Value>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl RoommateProfile {
    /// Budget as a usable amount, `None` when absent, zero or not a number
    pub fn budget_amount(&self) -> Option<f64> {
        self.budget.as_ref().and_then(crate::core::normalize::parse_budget)
    }
}

/// Keep a present value as-is, explicit `null` included
fn raw_value<'de, D>(deserializer: D) -> Result<Option<Value>, D::Error>
where
    D: Deserializer<'de>,
{
    Value::deserialize(deserializer).map(Some)
}

/// Strings are taken as-is and numbers are rendered; anything else is empty
fn lenient_id<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) => s,
        Value::Number(n) => n.to_string(),
        _ => String::new(),
    })
}

/// Accept any JSON for a label list: arrays keep their string elements,
/// everything else becomes an empty list.
fn lenient_labels<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(match value {
        Value::Array(items) => items
            .into_iter()
            .filter_map(|item| match item {
                Value::String(s) => Some(s),
                _ => None,
            })
            .collect(),
        _ => Vec::new(),
    })
}

/// A candidate paired with its compatibility score for one viewer
///
/// Never persisted; recomputed on every ranking call.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScoredCandidate {
    #[serde(flatten)]
    pub profile: RoommateProfile,
    #[serde(rename = "matchScore")]
    pub match_score: u8,
}

/// Per-category contributions behind a match score
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoreBreakdown {
    pub budget: f64,
    pub neighborhoods: f64,
    #[serde(rename = "roommatePreferences")]
    pub roommate_preferences: f64,
}

impl ScoreBreakdown {
    /// Rounded and clamped total
    pub fn total(&self) -> u8 {
        let sum = self.budget + self.neighborhoods + self.roommate_preferences;
        sum.round().clamp(0.0, 100.0) as u8
    }
}

/// Weight and fallback value of one scoring category
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CategoryWeight {
    pub weight: f64,
    pub neutral: f64,
}

/// Scoring weights
///
/// The neutral values are independent per category and do not sum to any
/// particular baseline.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScoringWeights {
    pub budget: CategoryWeight,
    pub neighborhoods: CategoryWeight,
    pub roommate_preferences: CategoryWeight,
}

impl Default for ScoringWeights {
    fn default() -> Self {
        Self {
            budget: CategoryWeight { weight: 40.0, neutral: 20.0 },
            neighborhoods: CategoryWeight { weight: 35.0, neutral: 18.0 },
            roommate_preferences: CategoryWeight { weight: 25.0, neutral: 12.0 },
        }
    }
}

/// A "like" from one user toward another
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Like {
    pub id: uuid::Uuid,
    #[serde(rename = "userId")]
    pub user_id: String,
    #[serde(rename = "targetUserId")]
    pub target_user_id: String,
    #[serde(rename = "createdAt")]
    pub created_at: chrono::DateTime<chrono::Utc>,
}

impl Like {
    pub fn new(user_id: &str, target_user_id: &str) -> Self {
        Self {
            id: uuid::Uuid::new_v4(),
            user_id: user_id.to_string(),
            target_user_id: target_user_id.to_string(),
            created_at: chrono::Utc::now(),
        }
    }
}

/// One message in a one-to-one chat
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub id: String,
    #[serde(rename = "chatId")]
    pub chat_id: String,
    #[serde(rename = "senderId")]
    pub sender_id: String,
    pub text: String,
    #[serde(rename = "createdAt")]
    pub created_at: chrono::DateTime<chrono::Utc>,
}

impl ChatMessage {
    pub fn new(chat_id: String, sender_id: &str, text: String) -> Self {
        Self {
            id: uuid::Uuid::new_v4().simple().to_string(),
            chat_id,
            sender_id: sender_id.to_string(),
            text,
            created_at: chrono::Utc::now(),
        }
    }
}

/// Authenticated caller, as asserted by the identity service
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Identity {
    pub user_id: String,
    pub email: String,
    pub email_verified: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_profile_keeps_unknown_fields() {
        let profile: RoommateProfile = serde_json::from_value(json!({
            "userId": "u1",
            "name": "Deniz",
            "budget": 2000,
            "neighborhoods": ["Kolej"],
            "department": "Physics"
        }))
        .unwrap();

        assert_eq!(profile.extra.get("department"), Some(&json!("Physics")));

        let back = serde_json::to_value(&profile).unwrap();
        assert_eq!(back["department"], "Physics");
        assert_eq!(back["budget"], 2000);
    }

    #[test]
    fn test_label_lists_are_lenient() {
        let profile: RoommateProfile = serde_json::from_value(json!({
            "neighborhoods": "Kolej",
            "roommatePreferences": ["tidy", 3, null, "quiet"]
        }))
        .unwrap();

        assert!(profile.neighborhoods.is_empty());
        assert_eq!(profile.roommate_preferences, vec!["tidy", "quiet"]);
    }

    #[test]
    fn test_display_fields_accept_any_json() {
        let doc = json!({
            "userId": 42,
            "name": 7,
            "age": "21",
            "hasHouse": "yes",
            "photos": null,
            "bio": { "short": "hi" }
        });

        let profile: RoommateProfile = serde_json::from_value(doc).unwrap();

        assert_eq!(profile.user_id, "42");
        assert_eq!(profile.age, Some(json!("21")));
        assert_eq!(profile.photos, Some(Value::Null));

        let back = serde_json::to_value(&profile).unwrap();
        assert_eq!(back["name"], 7);
        assert_eq!(back["hasHouse"], "yes");
        assert_eq!(back["bio"]["short"], "hi");
        assert!(back.as_object().unwrap().contains_key("photos"));
        assert!(!back.as_object().unwrap().contains_key("gender"));
    }

    #[test]
    fn test_scored_candidate_serializes_flat() {
        let candidate = ScoredCandidate {
            profile: RoommateProfile {
                user_id: "u2".to_string(),
                ..Default::default()
            },
            match_score: 73,
        };

        let value = serde_json::to_value(&candidate).unwrap();
        assert_eq!(value["userId"], "u2");
        assert_eq!(value["matchScore"], 73);
    }

    #[test]
    fn test_default_weights() {
        let weights = ScoringWeights::default();
        assert_eq!(weights.budget.weight, 40.0);
        assert_eq!(weights.budget.neutral, 20.0);
        assert_eq!(weights.neighborhoods.weight, 35.0);
        assert_eq!(weights.neighborhoods.neutral, 18.0);
        assert_eq!(weights.roommate_preferences.weight, 25.0);
        assert_eq!(weights.roommate_preferences.neutral, 12.0);
    }
}
