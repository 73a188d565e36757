// Model exports
pub mod domain;
pub mod requests;
pub mod responses;

pub use domain::{RoommateProfile, ScoredCandidate, ScoreBreakdown, CategoryWeight, ScoringWeights, Like, ChatMessage, Identity};
pub use requests::{CandidatesQuery, ScoreRequest, LikeRequest, SendMessageRequest, MessagesQuery};
pub use responses::{CandidatesResponse, ScoreResponse, HealthResponse, ErrorResponse, LikeResponse, MutualMatch, MutualMatchesResponse, MessagesResponse};
