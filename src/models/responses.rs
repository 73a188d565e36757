use serde::{Deserialize, Serialize};
use crate::models::domain::{ChatMessage, RoommateProfile, ScoreBreakdown, ScoredCandidate};

/// Response for the ranked candidates endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CandidatesResponse {
    pub candidates: Vec<ScoredCandidate>,
    #[serde(rename = "totalResults")]
    pub total_results: usize,
}

/// Response for the stateless scoring endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoreResponse {
    #[serde(rename = "matchScore")]
    pub match_score: u8,
    pub breakdown: ScoreBreakdown,
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub timestamp: chrono::DateTime<chrono::Utc>,
}

/// Error response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
    #[serde(rename = "statusCode")]
    pub status_code: u16,
}

/// Like response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LikeResponse {
    pub success: bool,
    #[serde(rename = "likeId")]
    pub like_id: String,
    #[serde(rename = "isMutual")]
    pub is_mutual: bool,
}

/// One mutual match, with the profile when it could be loaded
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MutualMatch {
    #[serde(rename = "userId")]
    pub user_id: String,
    #[serde(rename = "chatId")]
    pub chat_id: String,
    pub profile: Option<RoommateProfile>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MutualMatchesResponse {
    pub matches: Vec<MutualMatch>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessagesResponse {
    #[serde(rename = "chatId")]
    pub chat_id: String,
    pub messages: Vec<ChatMessage>,
}
