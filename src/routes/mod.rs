// Route exports
pub mod chats;
pub mod error;
pub mod matches;
pub mod profiles;

use actix_web::{dev::Payload, http::header, web, FromRequest, HttpRequest};
use crate::core::{ChatHub, Ranker};
use crate::models::Identity;
use crate::services::{AppwriteClient, CacheManager, IdentityVerifier, PostgresClient};
use std::future::{ready, Ready};
use std::sync::Arc;
use std::time::Duration;

pub use error::{handle_json_payload_error, handle_query_payload_error, ApiError};

/// Application state shared across all handlers
#[derive(Clone)]
pub struct AppState {
    pub appwrite: Arc<AppwriteClient>,
    pub cache: Arc<CacheManager>,
    pub postgres: Arc<PostgresClient>,
    pub identity: Arc<IdentityVerifier>,
    pub ranker: Ranker,
    pub chat_hub: ChatHub,
    pub limits: Limits,
}

/// Request-size and wait limits
#[derive(Debug, Clone, Copy)]
pub struct Limits {
    /// Profiles loaded from the store per ranking request
    pub candidate_pool: usize,
    /// Largest `limit` a client may ask for
    pub max_page: u16,
    pub long_poll: Duration,
}

impl Default for Limits {
    fn default() -> Self {
        Self {
            candidate_pool: 5000,
            max_page: 500,
            long_poll: Duration::from_secs(25),
        }
    }
}

/// The verified caller of a request
#[derive(Debug, Clone)]
pub struct AuthenticatedUser(pub Identity);

impl FromRequest for AuthenticatedUser {
    type Error = ApiError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let Some(state) = req.app_data::<web::Data<AppState>>() else {
            return ready(Err(ApiError::Unauthorized("Identity service unavailable".into())));
        };

        let header = req
            .headers()
            .get(header::AUTHORIZATION)
            .and_then(|value| value.to_str().ok());

        ready(
            state
                .identity
                .verify_header(header)
                .map(AuthenticatedUser)
                .map_err(|e| {
                    tracing::debug!("Rejected request to {}: {}", req.path(), e);
                    ApiError::from(e)
                }),
        )
    }
}

pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api/v1")
            .configure(matches::configure)
            .configure(profiles::configure)
            .configure(chats::configure),
    );
}
