use crate::models::{ChatMessage, Like, RoommateProfile};
use reqwest::{Client, RequestBuilder, StatusCode};
use serde_json::{json, Map, Value};
use std::time::Duration;
use thiserror::Error;

/// Errors that can occur when interacting with Appwrite
#[derive(Debug, Error)]
pub enum AppwriteError {
    #[error("HTTP request failed: {0}")]
    RequestError(#[from] reqwest::Error),

    #[error("API returned error: {0}")]
    ApiError(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Unauthorized: invalid API key or token")]
    Unauthorized,

    #[error("Invalid response format: {0}")]
    InvalidResponse(String),
}

/// Appwrite API client
///
/// Handles all document store traffic:
/// - Reading and writing roommate profiles
/// - Mirroring likes
/// - Storing and listing chat messages
pub struct AppwriteClient {
    base_url: String,
    api_key: String,
    project_id: String,
    database_id: String,
    client: Client,
    collections: AppwriteCollections,
}

/// Collection IDs in Appwrite
#[derive(Debug, Clone)]
pub struct AppwriteCollections {
    pub users: String,
    pub likes: String,
    pub messages: String,
}

/// A single Appwrite query, serialized in the JSON query syntax
fn query(method: &str, attribute: Option<&str>, values: Vec<Value>) -> String {
    let mut q = Map::new();
    q.insert("method".to_string(), Value::String(method.to_string()));
    if let Some(attribute) = attribute {
        q.insert("attribute".to_string(), Value::String(attribute.to_string()));
    }
    if !values.is_empty() {
        q.insert("values".to_string(), Value::Array(values));
    }
    Value::Object(q).to_string()
}

fn encode_queries(queries: &[String]) -> String {
    queries
        .iter()
        .map(|q| format!("queries[]={}", urlencoding::encode(q)))
        .collect::<Vec<_>>()
        .join("&")
}

/// Unwrap the attribute map of a document, dropping Appwrite system fields
///
/// `$id` becomes `userId` unless the document already carries one. A stored
/// `matchScore` is dropped.
pub fn profile_from_document(doc: &Value) -> Result<RoommateProfile, AppwriteError> {
    let data = doc.get("data").unwrap_or(doc);
    let object = data
        .as_object()
        .ok_or_else(|| AppwriteError::InvalidResponse("Document is not an object".into()))?;

    let mut attributes: Map<String, Value> = object
        .iter()
        .filter(|(key, _)| !key.starts_with('$') && key.as_str() != "matchScore")
        .map(|(key, value)| (key.clone(), value.clone()))
        .collect();

    if !attributes.contains_key("userId") {
        if let Some(id) = doc.get("$id").cloned() {
            attributes.insert("userId".to_string(), id);
        }
    }

    serde_json::from_value(Value::Object(attributes))
        .map_err(|e| AppwriteError::InvalidResponse(format!("Failed to parse profile: {}", e)))
}

fn message_from_document(doc: &Value) -> Result<ChatMessage, AppwriteError> {
    let mut data = doc.get("data").unwrap_or(doc).clone();
    if let (Some(obj), Some(id)) = (data.as_object_mut(), doc.get("$id")) {
        obj.entry("id").or_insert_with(|| id.clone());
    }

    serde_json::from_value(data)
        .map_err(|e| AppwriteError::InvalidResponse(format!("Failed to parse message: {}", e)))
}

fn documents_of(json: &Value) -> Result<&Vec<Value>, AppwriteError> {
    json.get("documents")
        .and_then(|d| d.as_array())
        .ok_or_else(|| AppwriteError::InvalidResponse("Missing documents array".into()))
}

impl AppwriteClient {
    /// Create a new Appwrite client
    pub fn new(
        base_url: String,
        api_key: String,
        project_id: String,
        database_id: String,
        collections: AppwriteCollections,
    ) -> Result<Self, AppwriteError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()?;

        Ok(Self {
            base_url,
            api_key,
            project_id,
            database_id,
            client,
            collections,
        })
    }

    fn documents_url(&self, collection: &str) -> String {
        format!(
            "{}/databases/{}/collections/{}/documents",
            self.base_url.trim_end_matches('/'),
            self.database_id,
            collection
        )
    }

    fn authorized(&self, builder: RequestBuilder) -> RequestBuilder {
        builder
            .header("X-Appwrite-Key", &self.api_key)
            .header("X-Appwrite-Project", &self.project_id)
    }

    async fn check_status(
        response: reqwest::Response,
        what: &str,
    ) -> Result<reqwest::Response, AppwriteError> {
        match response.status() {
            s if s.is_success() => Ok(response),
            StatusCode::NOT_FOUND => Err(AppwriteError::NotFound(what.to_string())),
            StatusCode::UNAUTHORIZED => Err(AppwriteError::Unauthorized),
            status => {
                let body = response
                    .text()
                    .await
                    .unwrap_or_else(|_| "Unable to read body".to_string());
                tracing::error!("Appwrite request failed ({}): {} - {}", what, status, body);
                Err(AppwriteError::ApiError(format!("{}: {}", what, status)))
            }
        }
    }

    /// Get a single profile by user ID
    pub async fn get_profile(&self, user_id: &str) -> Result<RoommateProfile, AppwriteError> {
        let url = format!(
            "{}/{}",
            self.documents_url(&self.collections.users),
            urlencoding::encode(user_id)
        );

        tracing::debug!("Fetching profile for user: {}", user_id);

        let response = self.authorized(self.client.get(&url)).send().await?;
        let response =
            Self::check_status(response, &format!("Profile not found for user {}", user_id)).await?;

        let json: Value = response.json().await?;
        profile_from_document(&json)
    }

    /// List up to `limit` profiles
    ///
    /// The list is shared by every viewer, so callers drop the viewer
    /// themselves. Documents that are not objects are skipped.
    pub async fn list_profiles(&self, limit: usize) -> Result<Vec<RoommateProfile>, AppwriteError> {
        let queries = vec![query("limit", None, vec![json!(limit)])];

        let url = format!(
            "{}?{}",
            self.documents_url(&self.collections.users),
            encode_queries(&queries)
        );

        let response = self.authorized(self.client.get(&url)).send().await?;
        let response = Self::check_status(response, "Failed to list profiles").await?;

        let json: Value = response.json().await?;
        let total = json.get("total").and_then(|t| t.as_u64()).unwrap_or(0);

        let profiles: Vec<RoommateProfile> = documents_of(&json)?
            .iter()
            .filter_map(|doc| match profile_from_document(doc) {
                Ok(profile) => Some(profile),
                Err(e) => {
                    tracing::warn!("Skipping unreadable profile document: {}", e);
                    None
                }
            })
            .collect();

        tracing::debug!("Listed {} profiles (total: {})", profiles.len(), total);

        Ok(profiles)
    }

    /// Create or update the profile document of `user_id`
    pub async fn upsert_profile(
        &self,
        user_id: &str,
        profile: &RoommateProfile,
    ) -> Result<RoommateProfile, AppwriteError> {
        let mut data = serde_json::to_value(profile)
            .map_err(|e| AppwriteError::InvalidResponse(e.to_string()))?;
        if let Some(obj) = data.as_object_mut() {
            obj.insert("userId".to_string(), Value::String(user_id.to_string()));
        }

        let url = format!(
            "{}/{}",
            self.documents_url(&self.collections.users),
            urlencoding::encode(user_id)
        );

        let response = self
            .authorized(self.client.patch(&url))
            .json(&json!({ "data": data }))
            .send()
            .await?;

        let response = if response.status() == StatusCode::NOT_FOUND {
            tracing::debug!("Profile {} does not exist yet, creating it", user_id);
            let created = self
                .authorized(self.client.post(self.documents_url(&self.collections.users)))
                .json(&json!({ "documentId": user_id, "data": data }))
                .send()
                .await?;
            Self::check_status(created, "Failed to create profile").await?
        } else {
            Self::check_status(response, "Failed to update profile").await?
        };

        let json: Value = response.json().await?;
        profile_from_document(&json)
    }

    /// Mirror a like into the `likes` collection
    pub async fn record_like(&self, like: &Like) -> Result<(), AppwriteError> {
        let payload = json!({
            "documentId": like.id.simple().to_string(),
            "data": {
                "userId": like.user_id,
                "targetUserId": like.target_user_id,
                "createdAt": like.created_at,
            }
        });

        let response = self
            .authorized(self.client.post(self.documents_url(&self.collections.likes)))
            .json(&payload)
            .send()
            .await?;
        Self::check_status(response, "Failed to record like").await?;

        tracing::debug!("Mirrored like: {} -> {}", like.user_id, like.target_user_id);

        Ok(())
    }

    /// Append a message to the `messages` collection
    pub async fn append_message(&self, message: &ChatMessage) -> Result<(), AppwriteError> {
        let payload = json!({
            "documentId": message.id,
            "data": {
                "chatId": message.chat_id,
                "senderId": message.sender_id,
                "text": message.text,
                "createdAt": message.created_at,
            }
        });

        let response = self
            .authorized(self.client.post(self.documents_url(&self.collections.messages)))
            .json(&payload)
            .send()
            .await?;
        Self::check_status(response, "Failed to store message").await?;

        Ok(())
    }

    /// Messages of a chat in creation order, optionally only those after `after`
    pub async fn list_messages(
        &self,
        chat_id: &str,
        after: Option<chrono::DateTime<chrono::Utc>>,
        limit: usize,
    ) -> Result<Vec<ChatMessage>, AppwriteError> {
        let mut queries = vec![
            query("equal", Some("chatId"), vec![json!(chat_id)]),
            query("orderAsc", Some("createdAt"), vec![]),
            query("limit", None, vec![json!(limit)]),
        ];
        if let Some(after) = after {
            queries.push(query("greaterThan", Some("createdAt"), vec![json!(after)]));
        }

        let url = format!(
            "{}?{}",
            self.documents_url(&self.collections.messages),
            encode_queries(&queries)
        );

        let response = self.authorized(self.client.get(&url)).send().await?;
        let response = Self::check_status(response, "Failed to list messages").await?;

        let json: Value = response.json().await?;
        let mut messages = documents_of(&json)?
            .iter()
            .map(message_from_document)
            .collect::<Result<Vec<_>, _>>()?;

        if let Some(after) = after {
            messages.retain(|m| m.created_at > after);
        }

        Ok(messages)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn collections() -> AppwriteCollections {
        AppwriteCollections {
            users: "users".to_string(),
            likes: "likes".to_string(),
            messages: "messages".to_string(),
        }
    }

    #[test]
    fn test_appwrite_client_creation() {
        let client = AppwriteClient::new(
            "https://appwrite.test/v1/".to_string(),
            "test_key".to_string(),
            "test_project".to_string(),
            "test_db".to_string(),
            collections(),
        )
        .unwrap();

        assert_eq!(client.api_key, "test_key");
        assert_eq!(
            client.documents_url("users"),
            "https://appwrite.test/v1/databases/test_db/collections/users/documents"
        );
    }

    #[test]
    fn test_profile_from_document_strips_system_fields() {
        let doc = json!({
            "$id": "u1",
            "$createdAt": "2024-01-01T00:00:00.000+00:00",
            "$permissions": [],
            "name": "Ece",
            "budget": "2500",
            "neighborhoods": ["Kolej"]
        });

        let profile = profile_from_document(&doc).unwrap();

        assert_eq!(profile.user_id, "u1");
        assert_eq!(profile.budget_amount(), Some(2500.0));
        assert!(profile.extra.keys().all(|k| !k.starts_with('$')));
    }

    #[test]
    fn test_profile_from_document_drops_stored_score() {
        let doc = json!({ "$id": "c1", "budget": 2000, "matchScore": 12 });

        let profile = profile_from_document(&doc).unwrap();
        let candidate = crate::models::ScoredCandidate {
            profile,
            match_score: 90,
        };

        let text = serde_json::to_string(&candidate).unwrap();
        assert_eq!(text.matches("matchScore").count(), 1);
        assert_eq!(serde_json::from_str::<Value>(&text).unwrap()["matchScore"], 90);
    }

    #[test]
    fn test_query_serialization() {
        let q = query("equal", Some("chatId"), vec![json!("ab")]);
        let parsed: Value = serde_json::from_str(&q).unwrap();

        assert_eq!(parsed["method"], "equal");
        assert_eq!(parsed["attribute"], "chatId");
        assert_eq!(parsed["values"][0], "ab");
    }
}
