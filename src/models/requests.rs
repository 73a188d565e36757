use serde::{Deserialize, Serialize};
use validator::Validate;
use crate::models::domain::RoommateProfile;

/// Query parameters for the ranked candidate list
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct CandidatesQuery {
    #[validate(range(min = 1, max = 500))]
    #[serde(default)]
    pub limit: Option<u16>,
}

/// Request to score one pair of profiles without touching storage
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoreRequest {
    pub viewer: RoommateProfile,
    pub candidate: RoommateProfile,
}

/// Request to like another user
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct LikeRequest {
    #[validate(length(min = 1))]
    #[serde(alias = "target_user_id", rename = "targetUserId")]
    pub target_user_id: String,
}

/// Request to post a chat message
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct SendMessageRequest {
    #[validate(length(min = 1, max = 2000))]
    pub text: String,
}

/// Query parameters for reading a chat
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MessagesQuery {
    #[serde(default)]
    pub after: Option<chrono::DateTime<chrono::Utc>>,
    #[serde(default)]
    pub wait: bool,
    #[serde(default)]
    pub limit: Option<u16>,
}
