use actix_web::{web, HttpResponse};
use validator::Validate;
use crate::core::{breakdown, chat_id, mutual_matches};
use crate::models::{
    CandidatesQuery, CandidatesResponse, HealthResponse, Like, LikeRequest, LikeResponse,
    MutualMatch, MutualMatchesResponse, RoommateProfile, ScoreRequest, ScoreResponse,
};
use crate::routes::{ApiError, AppState, AuthenticatedUser};
use crate::services::CacheKey;

/// Configure all match-related routes
pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg
        .route("/health", web::get().to(health_check))
        .route("/matches/candidates", web::get().to(ranked_candidates))
        .route("/matches/score", web::post().to(score_pair))
        .route("/matches/mutual", web::get().to(mutual))
        .route("/likes", web::post().to(like));
}

/// Health check endpoint
async fn health_check(state: web::Data<AppState>) -> HttpResponse {
    let pg_healthy = state.postgres.health_check().await.unwrap_or(false);

    let status = if pg_healthy { "healthy" } else { "degraded" };

    HttpResponse::Ok().json(HealthResponse {
        status: status.to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        timestamp: chrono::Utc::now(),
    })
}

/// Load the profile pool, through the snapshot cache
///
/// The pool still contains the viewer.
pub(crate) async fn candidate_pool(state: &AppState) -> Result<Vec<RoommateProfile>, ApiError> {
    let key = CacheKey::candidate_pool();

    if let Ok(pool) = state.cache.get::<Vec<RoommateProfile>>(&key).await {
        return Ok(pool);
    }

    let pool = state.appwrite.list_profiles(state.limits.candidate_pool).await?;

    if let Err(e) = state.cache.set(&key, &pool).await {
        tracing::warn!("Failed to cache candidate pool: {}", e);
    }

    Ok(pool)
}

/// Ranked candidates for the caller
///
/// GET /api/v1/matches/candidates?limit=20
///
/// Every other profile is scored against the caller's own profile and
/// returned best first. `limit` trims the response after ranking.
async fn ranked_candidates(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
    query: web::Query<CandidatesQuery>,
) -> Result<HttpResponse, ApiError> {
    query.validate()?;

    let user_id = &user.0.user_id;

    let viewer = state.appwrite.get_profile(user_id).await.map_err(|e| {
        tracing::info!("No profile for {}: {}", user_id, e);
        ApiError::from(e)
    })?;

    let mut pool = candidate_pool(&state).await?;
    pool.retain(|p| p.user_id != *user_id);

    tracing::debug!("Ranking {} candidates for {}", pool.len(), user_id);

    let mut candidates = state.ranker.rank(&viewer, pool);
    let total_results = candidates.len();

    if let Some(limit) = query.limit {
        candidates.truncate(limit.min(state.limits.max_page) as usize);
    }

    tracing::info!(
        "Returning {} candidates for user {} (from {})",
        candidates.len(),
        user_id,
        total_results
    );

    Ok(HttpResponse::Ok().json(CandidatesResponse {
        candidates,
        total_results,
    }))
}

/// Score one pair of profiles supplied by the client
///
/// POST /api/v1/matches/score
async fn score_pair(
    state: web::Data<AppState>,
    _user: AuthenticatedUser,
    req: web::Json<ScoreRequest>,
) -> HttpResponse {
    let breakdown = breakdown(&req.viewer, &req.candidate, state.ranker.weights());

    HttpResponse::Ok().json(ScoreResponse {
        match_score: breakdown.total(),
        breakdown,
    })
}

/// Record a like
///
/// POST /api/v1/likes
///
/// Request body:
/// ```json
/// { "targetUserId": "string" }
/// ```
async fn like(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
    req: web::Json<LikeRequest>,
) -> Result<HttpResponse, ApiError> {
    req.validate()?;

    let user_id = &user.0.user_id;
    if req.target_user_id == *user_id {
        return Err(ApiError::BadRequest("Users cannot like themselves".into()));
    }

    let like = Like::new(user_id, &req.target_user_id);

    // The ledger is the source of truth
    state.postgres.record_like(&like).await?;

    // Mirror into the document store (best-effort)
    if let Err(e) = state.appwrite.record_like(&like).await {
        tracing::warn!("Like recorded in PostgreSQL but Appwrite mirror failed: {}", e);
    }

    let is_mutual = state.postgres.has_liked(&req.target_user_id, user_id).await?;

    if is_mutual {
        tracing::info!("Mutual match: {} <-> {}", user_id, req.target_user_id);
    }

    Ok(HttpResponse::Ok().json(LikeResponse {
        success: true,
        like_id: like.id.to_string(),
        is_mutual,
    }))
}

/// Profile of a user, through the snapshot cache
async fn cached_profile(state: &AppState, user_id: &str) -> Option<RoommateProfile> {
    let key = CacheKey::profile(user_id);
    if let Ok(profile) = state.cache.get::<RoommateProfile>(&key).await {
        return Some(profile);
    }

    match state.appwrite.get_profile(user_id).await {
        Ok(profile) => {
            if let Err(e) = state.cache.set(&key, &profile).await {
                tracing::warn!("Failed to cache profile {}: {}", user_id, e);
            }
            Some(profile)
        }
        Err(e) => {
            tracing::warn!("Could not load profile of match {}: {}", user_id, e);
            None
        }
    }
}

/// Mutual matches of the caller
///
/// GET /api/v1/matches/mutual
async fn mutual(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
) -> Result<HttpResponse, ApiError> {
    let user_id = &user.0.user_id;

    let liked = state.postgres.liked_by(user_id).await?;
    let liked_me = state.postgres.likers_of(user_id).await?;

    let mut matches = Vec::new();
    for other in mutual_matches(&liked, &liked_me) {
        let profile = cached_profile(&state, &other).await;
        matches.push(MutualMatch {
            chat_id: chat_id(user_id, &other),
            user_id: other,
            profile,
        });
    }

    tracing::debug!("User {} has {} mutual matches", user_id, matches.len());

    Ok(HttpResponse::Ok().json(MutualMatchesResponse { matches }))
}
