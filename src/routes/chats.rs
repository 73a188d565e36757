use actix_web::{web, HttpResponse};
use validator::Validate;
use crate::core::{chat_id, ChatHub};
use crate::models::{ChatMessage, MessagesQuery, MessagesResponse, SendMessageRequest};
use crate::routes::{ApiError, AppState, AuthenticatedUser};

const DEFAULT_PAGE: u16 = 100;

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg
        .route("/chats/{peer_id}/messages", web::get().to(list_messages))
        .route("/chats/{peer_id}/messages", web::post().to(send_message));
}

/// Only mutually matched users may chat
async fn ensure_mutual(state: &AppState, user_id: &str, peer_id: &str) -> Result<(), ApiError> {
    if user_id == peer_id {
        return Err(ApiError::BadRequest("Cannot chat with yourself".into()));
    }
    if !state.postgres.is_mutual(user_id, peer_id).await? {
        return Err(ApiError::Forbidden(format!("No mutual match with {}", peer_id)));
    }
    Ok(())
}

/// Read a chat
///
/// GET /api/v1/chats/{peerId}/messages?after=2024-01-01T00:00:00Z&wait=true
///
/// With `wait=true` and nothing newer than `after`, the request is held
/// open until a message arrives or the long-poll timeout passes.
async fn list_messages(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
    path: web::Path<String>,
    query: web::Query<MessagesQuery>,
) -> Result<HttpResponse, ApiError> {
    let user_id = &user.0.user_id;
    let peer_id = path.into_inner();
    ensure_mutual(&state, user_id, &peer_id).await?;

    let chat_id = chat_id(user_id, &peer_id);
    let limit = query.limit.unwrap_or(DEFAULT_PAGE).min(state.limits.max_page).max(1) as usize;

    // Subscribe before reading so nothing slips in between
    let mut receiver = query.wait.then(|| state.chat_hub.subscribe(&chat_id));

    let mut messages = state
        .appwrite
        .list_messages(&chat_id, query.after, limit)
        .await?;

    if messages.is_empty() {
        if let Some(receiver) = receiver.as_mut() {
            tracing::debug!("Waiting for messages in chat {}", chat_id);
            if let Some(message) = ChatHub::next_message(receiver, state.limits.long_poll).await {
                if query.after.map_or(true, |after| message.created_at > after) {
                    messages.push(message);
                }
            }
        }
    }

    Ok(HttpResponse::Ok().json(MessagesResponse { chat_id, messages }))
}

/// Post a message
///
/// POST /api/v1/chats/{peerId}/messages
///
/// Request body:
/// ```json
/// { "text": "string" }
/// ```
async fn send_message(
    state: web::Data<AppState>,
    user: AuthenticatedUser,
    path: web::Path<String>,
    req: web::Json<SendMessageRequest>,
) -> Result<HttpResponse, ApiError> {
    req.validate()?;

    let text = req.text.trim();
    if text.is_empty() {
        return Err(ApiError::BadRequest("Message text is empty".into()));
    }

    let user_id = &user.0.user_id;
    let peer_id = path.into_inner();
    ensure_mutual(&state, user_id, &peer_id).await?;

    let message = ChatMessage::new(chat_id(user_id, &peer_id), user_id, text.to_string());

    state.appwrite.append_message(&message).await?;
    let delivered = state.chat_hub.publish(&message);

    tracing::debug!(
        "Message {} stored in chat {} ({} live subscribers)",
        message.id,
        message.chat_id,
        delivered
    );

    Ok(HttpResponse::Created().json(message))
}
