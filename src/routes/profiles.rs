use actix_web::{web, HttpResponse};
use crate::models::RoommateProfile;
use crate::routes::{ApiError, AppState, AuthenticatedUser};
use crate::services::CacheKey;

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg
        .route("/profiles/me", web::get().to(get_own_profile))
        .route("/profiles/me", web::put().to(put_own_profile));
}

/// GET /api/v1/profiles/me
async fn get_own_profile(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
) -> Result<HttpResponse, ApiError> {
    let profile = state.appwrite.get_profile(&user.0.user_id).await?;
    Ok(HttpResponse::Ok().json(profile))
}

/// PUT /api/v1/profiles/me
///
/// Creates or replaces the caller's profile. The `userId` in the body is
/// ignored in favour of the authenticated identity.
async fn put_own_profile(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
    body: web::Json<RoommateProfile>,
) -> Result<HttpResponse, ApiError> {
    let user_id = &user.0.user_id;

    let mut profile = body.into_inner();
    profile.user_id = user_id.clone();
    profile.extra.remove("matchScore");

    let saved = state.appwrite.upsert_profile(user_id, &profile).await?;

    // The shared pool now holds a stale copy of this profile
    for key in [CacheKey::profile(user_id), CacheKey::candidate_pool()] {
        if let Err(e) = state.cache.delete(&key).await {
            tracing::warn!("Failed to invalidate cache key {}: {}", key, e);
        }
    }

    tracing::info!("Profile saved for user {}", user_id);

    Ok(HttpResponse::Ok().json(saved))
}
