//! Roomie Match - roommate matching service
//!
//! This library provides the compatibility scorer and ranker behind the
//! swipe flow, plus the services around it: likes and mutual matches,
//! one-to-one chat, and university-email gated access.

pub mod config;
pub mod core;
pub mod models;
pub mod routes;
pub mod services;

// Re-export commonly used types
pub use crate::core::{rank, score, Ranker, chat_id, mutual_matches};
pub use crate::models::{RoommateProfile, ScoredCandidate, ScoringWeights, ScoreBreakdown};
