use serde::{Deserialize, Serialize};

pub type CommentId = u64;

/// Display timestamp stamped onto nodes created in this session. The remote
/// document stores display strings ("1 month ago"), not machine timestamps.
pub const CREATED_TODAY: &str = "Today";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserImage {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub png: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub webp: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    pub image: UserImage,
    pub username: String,
}

/// A top-level comment. Owns its replies; the tree is exactly two levels deep.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    pub id: CommentId,
    pub content: String,
    pub created_at: String,
    pub score: i64,
    pub user: UserProfile,
    // The remote store drops the field entirely when the list is empty.
    #[serde(default)]
    pub replies: Vec<Reply>,
}

/// A reply attached to exactly one top-level comment. Cannot own replies.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Reply {
    pub id: CommentId,
    pub content: String,
    pub created_at: String,
    pub score: i64,
    pub replying_to: String,
    pub user: UserProfile,
}

/// The document root held by the remote store.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ThreadDocument {
    pub current_user: UserProfile,
    #[serde(default)]
    pub comments: Vec<Comment>,
}

#[derive(Deserialize)]
pub struct PostCommentRequest {
    pub content: String,
}

#[derive(Deserialize)]
pub struct ReplyRequest {
    pub content: String,
    pub replying_to: String,
}

#[derive(Deserialize)]
pub struct EditCommentRequest {
    pub content: String,
}

#[derive(Deserialize)]
pub struct ScoreRequest {
    pub score: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RemovalDecision {
    Delete,
    Cancel,
}

#[derive(Deserialize)]
pub struct ResolveRemovalRequest {
    pub action: RemovalDecision,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn nodes_serialize_with_the_store_field_names() {
        let reply = Reply {
            id: 3,
            content: "I couldn't agree more.".to_string(),
            created_at: "1 week ago".to_string(),
            score: 2,
            replying_to: "maxblagun".to_string(),
            user: UserProfile {
                image: UserImage {
                    png: Some("./images/avatars/image-juliusomo.png".to_string()),
                    webp: None,
                },
                username: "juliusomo".to_string(),
            },
        };

        let value = serde_json::to_value(&reply).unwrap();
        assert_eq!(value["createdAt"], json!("1 week ago"));
        assert_eq!(value["replyingTo"], json!("maxblagun"));
        assert_eq!(value["user"]["username"], json!("juliusomo"));
    }

    #[test]
    fn comments_without_a_replies_field_deserialize_empty() {
        let raw = json!({
            "id": 1,
            "content": "Impressive!",
            "createdAt": "1 month ago",
            "score": 12,
            "user": { "image": { "png": "./images/avatars/image-amyrobson.png" }, "username": "amyrobson" }
        });

        let comment: Comment = serde_json::from_value(raw).unwrap();
        assert!(comment.replies.is_empty());
    }
}
