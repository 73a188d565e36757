use crate::models::ChatMessage;
use std::time::Duration;
use tokio::sync::broadcast;

/// Canonical identifier of the chat between two users
///
/// The lexicographically smaller id comes first, so both participants
/// derive the same value.
pub fn chat_id(a: &str, b: &str) -> String {
    if a <= b {
        format!("{}{}", a, b)
    } else {
        format!("{}{}", b, a)
    }
}

/// In-process publish/subscribe hub for chat messages
///
/// One broadcast channel per chat, created on first use and dropped after
/// the chat has been idle for `idle_timeout`.
#[derive(Clone)]
pub struct ChatHub {
    channels: moka::sync::Cache<String, broadcast::Sender<ChatMessage>>,
    capacity: usize,
}

impl ChatHub {
    pub fn new(capacity: usize, idle_timeout: Duration) -> Self {
        let channels = moka::sync::Cache::builder()
            .time_to_idle(idle_timeout)
            .build();

        Self {
            channels,
            capacity: capacity.max(1),
        }
    }

    fn sender(&self, chat_id: &str) -> broadcast::Sender<ChatMessage> {
        let capacity = self.capacity;
        self.channels
            .get_with(chat_id.to_string(), || broadcast::channel(capacity).0)
    }

    /// Subscribe to new messages of a chat
    pub fn subscribe(&self, chat_id: &str) -> broadcast::Receiver<ChatMessage> {
        self.sender(chat_id).subscribe()
    }

    /// Publish a message to current subscribers
    ///
    /// Returns the number of subscribers reached.
    pub fn publish(&self, message: &ChatMessage) -> usize {
        match self.channels.get(&message.chat_id) {
            Some(sender) => sender.send(message.clone()).unwrap_or(0),
            None => 0,
        }
    }

    /// Wait for the next message of a chat, up to `timeout`
    pub async fn next_message(
        receiver: &mut broadcast::Receiver<ChatMessage>,
        timeout: Duration,
    ) -> Option<ChatMessage> {
        let deadline = tokio::time::Instant::now() + timeout;
        loop {
            match tokio::time::timeout_at(deadline, receiver.recv()).await {
                Ok(Ok(message)) => return Some(message),
                Ok(Err(broadcast::error::RecvError::Lagged(skipped))) => {
                    tracing::debug!("Chat subscriber lagged, skipped {} messages", skipped);
                }
                Ok(Err(broadcast::error::RecvError::Closed)) | Err(_) => return None,
            }
        }
    }
}

impl std::fmt::Debug for ChatHub {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChatHub")
            .field("channels", &self.channels.entry_count())
            .field("capacity", &self.capacity)
            .finish()
    }
}
