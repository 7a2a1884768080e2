use crate::thread::model::{CREATED_TODAY, Comment, CommentId, Reply, UserProfile};
use crate::utils::error::CustomError;

/// A single user action against the comment tree.
#[derive(Debug, Clone)]
pub enum Mutation {
    Score {
        target: CommentId,
        score: i64,
    },
    Post {
        content: String,
    },
    Reply {
        target: CommentId,
        content: String,
        replying_to: String,
    },
    Edit {
        target: CommentId,
        content: String,
    },
    Delete {
        target: CommentId,
    },
}

/// Result of applying a mutation: the rebuilt collection, plus the ID of the
/// node the mutation created when it created one.
#[derive(Debug)]
pub struct Applied {
    pub comments: Vec<Comment>,
    pub created: Option<CommentId>,
}

/// Flatten every ID in the tree into one sequence: collection order, each
/// comment followed by its direct replies. Top-level comments and replies
/// share a single ID space.
pub fn collect_ids(comments: &[Comment]) -> Vec<CommentId> {
    let mut ids = Vec::new();
    for comment in comments {
        ids.push(comment.id);
        ids.extend(comment.replies.iter().map(|reply| reply.id));
    }
    ids
}

/// Mint an ID one past the highest known one. An empty tree starts at 1.
pub fn allocate_id(ids: &[CommentId]) -> CommentId {
    ids.iter().copied().max().map_or(1, |max| max + 1)
}

/// Resolve which top-level comment structurally contains `target`: the
/// target's own ID when it is top-level, the owning comment's ID when it is a
/// reply, `None` when the ID is nowhere in the tree. Comments are scanned in
/// collection order.
pub fn find_parent_id(comments: &[Comment], target: CommentId) -> Option<CommentId> {
    comments.iter().find_map(|comment| {
        if comment.id == target || comment.replies.iter().any(|reply| reply.id == target) {
            Some(comment.id)
        } else {
            None
        }
    })
}

/// Apply one mutation and build the next collection. The input collection is
/// never touched; callers keep it when the result is an error.
pub fn apply(
    comments: &[Comment],
    known_ids: &[CommentId],
    author: &UserProfile,
    mutation: Mutation,
) -> Result<Applied, CustomError> {
    match mutation {
        Mutation::Score { target, score } => {
            let parent = resolve_parent(comments, target)?;
            let next = comments
                .iter()
                .map(|comment| {
                    if comment.id != parent {
                        return comment.clone();
                    }
                    if parent == target {
                        return Comment {
                            score,
                            ..comment.clone()
                        };
                    }
                    Comment {
                        replies: comment
                            .replies
                            .iter()
                            .map(|reply| {
                                if reply.id == target {
                                    Reply {
                                        score,
                                        ..reply.clone()
                                    }
                                } else {
                                    reply.clone()
                                }
                            })
                            .collect(),
                        ..comment.clone()
                    }
                })
                .collect();

            Ok(Applied {
                comments: next,
                created: None,
            })
        }

        Mutation::Post { content } => {
            if content.trim().is_empty() {
                return Err(CustomError::ValidationError(
                    "Comment content cannot be empty".to_string(),
                ));
            }

            let id = allocate_id(known_ids);
            let mut next = comments.to_vec();
            next.push(Comment {
                id,
                content,
                created_at: CREATED_TODAY.to_string(),
                score: 0,
                user: author.clone(),
                replies: Vec::new(),
            });

            Ok(Applied {
                comments: next,
                created: Some(id),
            })
        }

        Mutation::Reply {
            target,
            content,
            replying_to,
        } => {
            let parent = resolve_parent(comments, target)?;
            let id = allocate_id(known_ids);
            let next = comments
                .iter()
                .map(|comment| {
                    if comment.id != parent {
                        return comment.clone();
                    }
                    let mut replies = comment.replies.clone();
                    replies.push(Reply {
                        id,
                        content: content.clone(),
                        created_at: CREATED_TODAY.to_string(),
                        score: 0,
                        replying_to: replying_to.clone(),
                        user: author.clone(),
                    });
                    Comment {
                        replies,
                        ..comment.clone()
                    }
                })
                .collect();

            Ok(Applied {
                comments: next,
                created: Some(id),
            })
        }

        Mutation::Edit { target, content } => {
            let parent = resolve_parent(comments, target)?;
            let next = comments
                .iter()
                .map(|comment| {
                    if comment.id != parent {
                        return comment.clone();
                    }
                    if parent == target {
                        return Comment {
                            content: content.clone(),
                            ..comment.clone()
                        };
                    }
                    Comment {
                        replies: comment
                            .replies
                            .iter()
                            .map(|reply| {
                                if reply.id == target {
                                    Reply {
                                        content: content.clone(),
                                        ..reply.clone()
                                    }
                                } else {
                                    reply.clone()
                                }
                            })
                            .collect(),
                        ..comment.clone()
                    }
                })
                .collect();

            Ok(Applied {
                comments: next,
                created: None,
            })
        }

        Mutation::Delete { target } => {
            let parent = resolve_parent(comments, target)?;
            let next = comments
                .iter()
                .filter_map(|comment| {
                    if comment.id != parent {
                        return Some(comment.clone());
                    }
                    if parent == target {
                        return None;
                    }
                    Some(Comment {
                        replies: comment
                            .replies
                            .iter()
                            .filter(|reply| reply.id != target)
                            .cloned()
                            .collect(),
                        ..comment.clone()
                    })
                })
                .collect();

            Ok(Applied {
                comments: next,
                created: None,
            })
        }
    }
}

fn resolve_parent(comments: &[Comment], target: CommentId) -> Result<CommentId, CustomError> {
    find_parent_id(comments, target).ok_or_else(|| {
        CustomError::NotFoundError(format!("No comment or reply with id {}", target))
    })
}
