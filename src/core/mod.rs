// Core algorithm exports
pub mod chat;
pub mod email;
pub mod mutual;
pub mod normalize;
pub mod ranker;
pub mod scoring;

pub use chat::{chat_id, ChatHub};
pub use email::is_university_email;
pub use mutual::mutual_matches;
pub use normalize::{normalize_label, normalize_labels, parse_budget};
pub use ranker::{rank, Ranker};
pub use scoring::{score, score_with_weights, breakdown, budget_score, overlap_score};
