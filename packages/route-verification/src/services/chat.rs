use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

use crate::models::chat::{merge_messages, ChatMessage, OfficialContact, OutgoingMessage};

#[derive(Debug, thiserror::Error)]
pub enum ChatError {
    #[error("Message is empty")]
    EmptyMessage,

    #[error("Chat request failed: {0}")]
    Request(String),

    #[error("Chat server returned HTTP {0}")]
    Status(u16),
}

impl From<reqwest::Error> for ChatError {
    fn from(e: reqwest::Error) -> Self {
        ChatError::Request(e.to_string())
    }
}

/// Backend for the official/contractor discussion channel
#[async_trait]
pub trait ChatSource: Send + Sync {
    async fn history(&self, user1: &str, user2: &str) -> Result<Vec<ChatMessage>, ChatError>;

    async fn send(&self, message: OutgoingMessage) -> Result<ChatMessage, ChatError>;

    async fn officials(&self) -> Result<Vec<OfficialContact>, ChatError>;
}

/// Send `content` unless it is blank
pub async fn send_message(
    source: &dyn ChatSource,
    sender_id: &str,
    receiver_id: &str,
    content: &str,
) -> Result<ChatMessage, ChatError> {
    let content = content.trim();
    if content.is_empty() {
        return Err(ChatError::EmptyMessage);
    }

    source
        .send(OutgoingMessage {
            sender_id: sender_id.to_string(),
            receiver_id: receiver_id.to_string(),
            content: content.to_string(),
        })
        .await
}

/// Chat endpoints of the platform REST API
pub struct HttpChatSource {
    client: reqwest::Client,
    api_base: String,
}

impl HttpChatSource {
    pub fn new(api_base: &str, timeout: Duration) -> Result<Self, ChatError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            api_base: api_base.trim_end_matches('/').to_string(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.api_base, path)
    }

    async fn check(response: reqwest::Response) -> Result<reqwest::Response, ChatError> {
        if response.status().is_success() {
            Ok(response)
        } else {
            Err(ChatError::Status(response.status().as_u16()))
        }
    }
}

#[async_trait]
impl ChatSource for HttpChatSource {
    async fn history(&self, user1: &str, user2: &str) -> Result<Vec<ChatMessage>, ChatError> {
        let response = self
            .client
            .get(self.url("/official-contractor-chat/history"))
            .query(&[("user1", user1), ("user2", user2)])
            .send()
            .await?;
        Ok(Self::check(response).await?.json().await?)
    }

    async fn send(&self, message: OutgoingMessage) -> Result<ChatMessage, ChatError> {
        let response = self
            .client
            .post(self.url("/official-contractor-chat/send"))
            .json(&message)
            .send()
            .await?;
        Ok(Self::check(response).await?.json().await?)
    }

    async fn officials(&self) -> Result<Vec<OfficialContact>, ChatError> {
        let response = self.client.get(self.url("/users/officials")).send().await?;
        Ok(Self::check(response).await?.json().await?)
    }
}

/// Fixed-interval fetch-and-merge of one conversation.
///
/// History is fetched immediately and then every `interval`; subscribers see
/// the merged history through a watch channel and are only woken when it
/// changed. Fetch errors are logged and the next tick tries again. Dropping
/// the poller stops the background task.
pub struct ChatPoller {
    handle: JoinHandle<()>,
    receiver: watch::Receiver<Vec<ChatMessage>>,
}

impl ChatPoller {
    pub fn spawn(
        source: Arc<dyn ChatSource>,
        user_id: String,
        partner_id: String,
        interval: Duration,
    ) -> Self {
        let (sender, receiver) = watch::channel(Vec::new());

        let handle = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                ticker.tick().await;
                if sender.is_closed() {
                    break;
                }

                match source.history(&user_id, &partner_id).await {
                    Ok(fetched) => {
                        sender.send_if_modified(|current| {
                            let merged = merge_messages(current, fetched);
                            if merged == *current {
                                false
                            } else {
                                *current = merged;
                                true
                            }
                        });
                    }
                    Err(e) => {
                        tracing::warn!("Chat poll {} <-> {} failed: {}", user_id, partner_id, e)
                    }
                }
            }
        });

        Self { handle, receiver }
    }

    pub fn subscribe(&self) -> watch::Receiver<Vec<ChatMessage>> {
        self.receiver.clone()
    }

    pub fn latest(&self) -> Vec<ChatMessage> {
        self.receiver.borrow().clone()
    }
}

impl Drop for ChatPoller {
    fn drop(&mut self) {
        self.handle.abort();
    }
}
