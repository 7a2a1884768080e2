use std::sync::Arc;

use chrono::{DateTime, Utc};
use log::error;
use serde::Serialize;
use tokio::sync::{Mutex, watch};

use crate::remote::store::RemoteStore;
use crate::thread::model::{Comment, CommentId, RemovalDecision, ThreadDocument, UserProfile};
use crate::thread::mutate::{self, Applied, Mutation};
use crate::utils::error::CustomError;

/// Outcome of the most recent fire-and-forget save.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum SaveState {
    Idle,
    InFlight,
    Completed { finished_at: DateTime<Utc> },
    Failed { error: String, finished_at: DateTime<Utc> },
}

/// Everything the session mutates, in one place: the acting user, the
/// canonical tree, the flattened ID set the allocator consults, and the ID
/// staged for deletion while confirmation is outstanding.
#[derive(Debug)]
struct ThreadState {
    current_user: UserProfile,
    comments: Vec<Comment>,
    known_ids: Vec<CommentId>,
    pending_removal: Option<CommentId>,
}

pub struct ThreadService {
    // One mutation in flight at a time, so the allocator never races itself.
    state: Mutex<ThreadState>,
    remote: Arc<RemoteStore>,
    save_tx: Arc<watch::Sender<SaveState>>,
    save_rx: watch::Receiver<SaveState>,
}

impl ThreadService {
    pub fn new(document: ThreadDocument, remote: RemoteStore) -> Self {
        let known_ids = mutate::collect_ids(&document.comments);
        let (save_tx, save_rx) = watch::channel(SaveState::Idle);

        ThreadService {
            state: Mutex::new(ThreadState {
                current_user: document.current_user,
                comments: document.comments,
                known_ids,
                pending_removal: None,
            }),
            remote: Arc::new(remote),
            save_tx: Arc::new(save_tx),
            save_rx,
        }
    }

    /// Current user plus the full tree, for the read path.
    pub async fn snapshot(&self) -> ThreadDocument {
        let state = self.state.lock().await;
        ThreadDocument {
            current_user: state.current_user.clone(),
            comments: state.comments.clone(),
        }
    }

    /// Subscribe to save outcomes. Saves never block or roll back a
    /// mutation; this channel is how their failures become visible.
    pub fn save_state(&self) -> watch::Receiver<SaveState> {
        self.save_rx.clone()
    }

    /// Append a top-level comment authored by the current user.
    pub async fn post_comment(&self, content: String) -> Result<CommentId, CustomError> {
        let created = self.dispatch(Mutation::Post { content }).await?;
        created.ok_or_else(|| {
            CustomError::InternalServerError("Post did not produce a comment id".to_string())
        })
    }

    /// Append a reply under the comment that structurally contains `target`.
    pub async fn reply_to(
        &self,
        target: CommentId,
        content: String,
        replying_to: String,
    ) -> Result<CommentId, CustomError> {
        let created = self
            .dispatch(Mutation::Reply {
                target,
                content,
                replying_to,
            })
            .await?;
        created.ok_or_else(|| {
            CustomError::InternalServerError("Reply did not produce a comment id".to_string())
        })
    }

    /// Replace the content of a comment or reply.
    pub async fn edit_comment(
        &self,
        target: CommentId,
        content: String,
    ) -> Result<(), CustomError> {
        self.dispatch(Mutation::Edit { target, content })
            .await
            .map(|_| ())
    }

    /// Replace the score of a comment or reply.
    pub async fn rescore(&self, target: CommentId, score: i64) -> Result<(), CustomError> {
        self.dispatch(Mutation::Score { target, score })
            .await
            .map(|_| ())
    }

    /// Stage a comment or reply for deletion. The tree is untouched until
    /// the caller confirms through `resolve_removal`.
    pub async fn request_removal(&self, target: CommentId) -> Result<CommentId, CustomError> {
        let mut state = self.state.lock().await;
        if mutate::find_parent_id(&state.comments, target).is_none() {
            return Err(CustomError::NotFoundError(format!(
                "No comment or reply with id {}",
                target
            )));
        }
        state.pending_removal = Some(target);
        Ok(target)
    }

    /// Resolve the staged deletion. Confirming runs the delete mutation;
    /// cancelling only clears the staged ID and performs no save.
    pub async fn resolve_removal(
        &self,
        decision: RemovalDecision,
    ) -> Result<Option<CommentId>, CustomError> {
        let target = {
            let mut state = self.state.lock().await;
            match state.pending_removal.take() {
                Some(target) => target,
                None => {
                    return Err(CustomError::BadRequestError(
                        "No removal is pending".to_string(),
                    ));
                }
            }
        };

        match decision {
            RemovalDecision::Cancel => Ok(None),
            RemovalDecision::Delete => {
                self.dispatch(Mutation::Delete { target }).await?;
                Ok(Some(target))
            }
        }
    }

    /// Apply one mutation under the state lock, then hand the new snapshot to
    /// the persistence task. A failed mutation leaves the state untouched.
    async fn dispatch(&self, mutation: Mutation) -> Result<Option<CommentId>, CustomError> {
        let (snapshot, created) = {
            let mut state = self.state.lock().await;
            let Applied { comments, created } = mutate::apply(
                &state.comments,
                &state.known_ids,
                &state.current_user,
                mutation,
            )?;

            state.comments = comments;
            if let Some(id) = created {
                state.known_ids.push(id);
            }

            (state.comments.clone(), created)
        };

        self.schedule_save(snapshot);
        Ok(created)
    }

    /// Fire-and-forget: push the full collection to the remote store and
    /// publish the outcome on the watch channel.
    fn schedule_save(&self, comments: Vec<Comment>) {
        let remote = Arc::clone(&self.remote);
        let save_tx = Arc::clone(&self.save_tx);
        save_tx.send_replace(SaveState::InFlight);

        tokio::spawn(async move {
            match remote.put_comments(&comments).await {
                Ok(()) => {
                    save_tx.send_replace(SaveState::Completed {
                        finished_at: Utc::now(),
                    });
                }
                Err(e) => {
                    error!("Persisting comments failed: {}", e);
                    save_tx.send_replace(SaveState::Failed {
                        error: e.to_string(),
                        finished_at: Utc::now(),
                    });
                }
            }
        });
    }
}
