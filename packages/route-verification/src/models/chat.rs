use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::session::ChatIdentity;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub id: String,
    pub sender_id: String,
    pub receiver_id: String,
    pub content: String,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutgoingMessage {
    pub sender_id: String,
    pub receiver_id: String,
    pub content: String,
}

/// Official as listed by `/users/officials`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OfficialContact {
    pub id: String,
    pub name: String,
    pub village_name: String,
}

/// Entry selected in the conversation list
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChatItem {
    /// Officials pick a contractor directly
    Contractor { id: String, name: String },
    /// Contractors pick one of their projects
    Project {
        id: String,
        name: String,
        village_name: String,
    },
}

/// Who a conversation is with, once discovered
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatTarget {
    pub receiver_id: String,
    pub receiver_name: String,
}

/// Work out the other side of the conversation for the selected item.
///
/// A contractor talks to the official of the project's village; when no
/// such official exists there is nobody to talk to.
pub fn resolve_chat_target(
    viewer: &ChatIdentity,
    item: &ChatItem,
    officials: &[OfficialContact],
) -> Option<ChatTarget> {
    match (viewer, item) {
        (ChatIdentity::Official { .. }, ChatItem::Contractor { id, name }) => Some(ChatTarget {
            receiver_id: id.clone(),
            receiver_name: name.clone(),
        }),
        (ChatIdentity::Contractor { .. }, ChatItem::Project { village_name, .. }) => officials
            .iter()
            .find(|o| &o.village_name == village_name)
            .map(|o| ChatTarget {
                receiver_id: o.id.clone(),
                receiver_name: o.name.clone(),
            }),
        _ => None,
    }
}

/// Union of `existing` and `fetched` by message id, oldest first.
///
/// Merging the same batch twice changes nothing.
pub fn merge_messages(existing: &[ChatMessage], fetched: Vec<ChatMessage>) -> Vec<ChatMessage> {
    let mut merged = existing.to_vec();
    for message in fetched {
        match merged.iter_mut().find(|m| m.id == message.id) {
            Some(slot) => *slot = message,
            None => merged.push(message),
        }
    }
    merged.sort_by(|a, b| a.timestamp.cmp(&b.timestamp).then_with(|| a.id.cmp(&b.id)));
    merged
}
