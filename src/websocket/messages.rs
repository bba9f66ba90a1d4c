//! Notification Envelope
//!
//! Defines the JSON envelope broadcast to every connected client.
//! Publishers (post/comment services) build an [`Envelope`], serialize it,
//! and hand the payload to the hub; clients receive it verbatim.

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

/// Kind of notification, serialized as the envelope's `type` tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum EventKind {
    /// A new post was created
    NewPost,
    /// A new comment was added to a post
    NewComment,
    /// A post's like count changed
    UpdatedLikes,
}

/// Outbound notification envelope.
///
/// Wire format:
///
/// ```json
/// { "type": "newComment",
///   "message": "New comment created.",
///   "content": { "postId": 7 } }
/// ```
///
/// `content` is optional structured data and is omitted entirely when absent.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Envelope {
    /// Event type tag
    #[serde(rename = "type")]
    pub kind: EventKind,
    /// Human-readable description
    pub message: String,
    /// Optional structured payload
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<Value>,
}

impl Envelope {
    /// Build an envelope with arbitrary content
    pub fn new(kind: EventKind, message: impl Into<String>, content: Option<Value>) -> Self {
        Self {
            kind,
            message: message.into(),
            content,
        }
    }

    /// Notification for a freshly created post
    pub fn new_post() -> Self {
        Self::new(EventKind::NewPost, "New Post was created", None)
    }

    /// Notification for a new comment on `post_id`
    pub fn new_comment(post_id: i64) -> Self {
        Self::new(
            EventKind::NewComment,
            "New comment created.",
            Some(json!({ "postId": post_id })),
        )
    }

    /// Notification that `post_id`'s like count changed
    pub fn likes_updated(post_id: i64) -> Self {
        Self::new(
            EventKind::UpdatedLikes,
            "Likes Updated",
            Some(json!({ "postId": post_id })),
        )
    }

    /// Serialize to the JSON wire format
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_post_wire_format() {
        let json = Envelope::new_post().to_json().unwrap();
        assert_eq!(
            json,
            r#"{"type":"newPost","message":"New Post was created"}"#
        );
    }

    #[test]
    fn test_new_comment_wire_format() {
        let json = Envelope::new_comment(7).to_json().unwrap();
        assert_eq!(
            json,
            r#"{"type":"newComment","message":"New comment created.","content":{"postId":7}}"#
        );
    }

    #[test]
    fn test_likes_updated_wire_format() {
        let json = Envelope::likes_updated(42).to_json().unwrap();
        assert_eq!(
            json,
            r#"{"type":"updatedLikes","message":"Likes Updated","content":{"postId":42}}"#
        );
    }

    #[test]
    fn test_content_omitted_when_absent() {
        let json = Envelope::new(EventKind::UpdatedLikes, "x", None)
            .to_json()
            .unwrap();
        assert!(!json.contains("content"));
    }

    #[test]
    fn test_envelope_deserialize() {
        let json =
            r#"{"type":"newComment","message":"New comment created.","content":{"postId":3}}"#;
        let envelope: Envelope = serde_json::from_str(json).unwrap();
        assert_eq!(envelope.kind, EventKind::NewComment);
        assert_eq!(envelope.message, "New comment created.");
        assert_eq!(envelope.content.unwrap()["postId"], 3);
    }
}
