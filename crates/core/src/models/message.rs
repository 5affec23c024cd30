//! Chat message model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageType {
    Chat,
    System,
}

/// An entry in the room's append-only chat log
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatMessage {
    pub id: String,
    /// `None` for messages produced by the engine
    pub sender_id: Option<String>,
    pub sender_name: String,
    pub recipient_id: Option<String>,
    pub content: String,
    pub is_private: bool,
    #[serde(rename = "type")]
    pub message_type: MessageType,
    pub timestamp: DateTime<Utc>,
}

impl ChatMessage {
    /// A player message; private when addressed to a recipient
    pub fn chat(
        sender_id: String,
        sender_name: String,
        content: String,
        recipient_id: Option<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            sender_id: Some(sender_id),
            sender_name,
            is_private: recipient_id.is_some(),
            recipient_id,
            content,
            message_type: MessageType::Chat,
            timestamp: Utc::now(),
        }
    }

    /// A public announcement from the engine
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            sender_id: None,
            sender_name: "System".to_string(),
            recipient_id: None,
            content: content.into(),
            is_private: false,
            message_type: MessageType::System,
            timestamp: Utc::now(),
        }
    }

    /// Whether a non-storyteller viewer may read this message
    pub fn visible_to(&self, viewer_id: &str) -> bool {
        if !self.is_private {
            return true;
        }
        self.sender_id.as_deref() == Some(viewer_id)
            || self.recipient_id.as_deref() == Some(viewer_id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_private_flag_follows_recipient() {
        let public = ChatMessage::chat("u1".into(), "Ann".into(), "hi".into(), None);
        assert!(!public.is_private);

        let private = ChatMessage::chat("u1".into(), "Ann".into(), "psst".into(), Some("u2".into()));
        assert!(private.is_private);
        assert!(private.visible_to("u1"));
        assert!(private.visible_to("u2"));
        assert!(!private.visible_to("u3"));
    }

    #[test]
    fn test_type_field_name() {
        let msg = ChatMessage::system("Night falls");
        let json = serde_json::to_value(&msg).unwrap();
        assert_eq!(json["type"], "system");
        assert_eq!(json["isPrivate"], false);
    }
}
