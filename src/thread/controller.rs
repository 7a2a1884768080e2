use crate::thread::model::{
    CommentId, EditCommentRequest, PostCommentRequest, ReplyRequest, ResolveRemovalRequest,
    ScoreRequest,
};
use crate::thread::service::ThreadService;
use crate::utils::error::CustomError;
use actix_web::{HttpResponse, web};
use serde_json::json;

/// Get the current user and the full comment tree
/// GET /comments
pub async fn get_thread(
    thread_service: web::Data<ThreadService>,
) -> Result<HttpResponse, CustomError> {
    let document = thread_service.snapshot().await;

    Ok(HttpResponse::Ok().json(json!({
        "success": true,
        "message": "Comments retrieved successfully",
        "httpStatusCode": 200,
        "count": document.comments.len(),
        "data": document
    })))
}

/// Post a new top-level comment as the current user
/// POST /comments
pub async fn post_comment(
    thread_service: web::Data<ThreadService>,
    body: web::Json<PostCommentRequest>,
) -> Result<HttpResponse, CustomError> {
    let comment_id = thread_service
        .post_comment(body.into_inner().content)
        .await?;

    Ok(HttpResponse::Created().json(json!({
        "success": true,
        "message": "Comment posted successfully",
        "httpStatusCode": 201,
        "comment_id": comment_id
    })))
}

/// Reply to a comment or to one of its replies
/// POST /comments/{comment_id}/replies
pub async fn reply_to_comment(
    thread_service: web::Data<ThreadService>,
    path: web::Path<CommentId>,
    body: web::Json<ReplyRequest>,
) -> Result<HttpResponse, CustomError> {
    let ReplyRequest {
        content,
        replying_to,
    } = body.into_inner();

    let reply_id = thread_service
        .reply_to(path.into_inner(), content, replying_to)
        .await?;

    Ok(HttpResponse::Created().json(json!({
        "success": true,
        "message": "Reply posted successfully",
        "httpStatusCode": 201,
        "comment_id": reply_id
    })))
}

/// Edit the content of a comment or reply
/// PUT /comments/{comment_id}
pub async fn edit_comment(
    thread_service: web::Data<ThreadService>,
    path: web::Path<CommentId>,
    body: web::Json<EditCommentRequest>,
) -> Result<HttpResponse, CustomError> {
    thread_service
        .edit_comment(path.into_inner(), body.into_inner().content)
        .await?;

    Ok(HttpResponse::Ok().json(json!({
        "success": true,
        "message": "Comment updated successfully",
        "httpStatusCode": 200
    })))
}

/// Set the score of a comment or reply
/// PUT /comments/{comment_id}/score
pub async fn score_comment(
    thread_service: web::Data<ThreadService>,
    path: web::Path<CommentId>,
    body: web::Json<ScoreRequest>,
) -> Result<HttpResponse, CustomError> {
    thread_service
        .rescore(path.into_inner(), body.into_inner().score)
        .await?;

    Ok(HttpResponse::Ok().json(json!({
        "success": true,
        "message": "Score updated successfully",
        "httpStatusCode": 200
    })))
}

/// Stage a comment or reply for deletion, pending confirmation
/// DELETE /comments/{comment_id}
pub async fn request_removal(
    thread_service: web::Data<ThreadService>,
    path: web::Path<CommentId>,
) -> Result<HttpResponse, CustomError> {
    let pending = thread_service.request_removal(path.into_inner()).await?;

    Ok(HttpResponse::Ok().json(json!({
        "success": true,
        "message": "Deletion pending confirmation",
        "httpStatusCode": 200,
        "pending_removal": pending
    })))
}

/// Confirm or cancel the staged deletion
/// POST /comments/removal
pub async fn resolve_removal(
    thread_service: web::Data<ThreadService>,
    body: web::Json<ResolveRemovalRequest>,
) -> Result<HttpResponse, CustomError> {
    let removed = thread_service
        .resolve_removal(body.into_inner().action)
        .await?;

    let message = match removed {
        Some(_) => "Comment deleted successfully",
        None => "Deletion cancelled",
    };

    Ok(HttpResponse::Ok().json(json!({
        "success": true,
        "message": message,
        "httpStatusCode": 200,
        "removed_id": removed
    })))
}

/// Report the outcome of the most recent persistence attempt
/// GET /comments/sync
pub async fn sync_status(
    thread_service: web::Data<ThreadService>,
) -> Result<HttpResponse, CustomError> {
    let state = thread_service.save_state().borrow().clone();

    Ok(HttpResponse::Ok().json(json!({
        "success": true,
        "message": "Sync status retrieved successfully",
        "httpStatusCode": 200,
        "data": state
    })))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::remote::store::RemoteStore;
    use crate::thread::index::thread_routes;
    use crate::thread::model::{Comment, ThreadDocument, UserImage, UserProfile};
    use actix_web::http::StatusCode;
    use actix_web::{App, test};

    fn seeded_service() -> web::Data<ThreadService> {
        let document = ThreadDocument {
            current_user: UserProfile {
                image: UserImage {
                    png: Some("./images/avatars/image-juliusomo.png".to_string()),
                    webp: None,
                },
                username: "juliusomo".to_string(),
            },
            comments: vec![Comment {
                id: 1,
                content: "Impressive!".to_string(),
                created_at: "1 month ago".to_string(),
                score: 12,
                user: UserProfile {
                    image: UserImage { png: None, webp: None },
                    username: "amyrobson".to_string(),
                },
                replies: vec![],
            }],
        };

        web::Data::new(ThreadService::new(
            document,
            RemoteStore::with_base_url("http://127.0.0.1:9/commentItems"),
        ))
    }

    #[actix_web::test]
    async fn blank_posts_are_rejected_with_bad_request() {
        let app = test::init_service(
            App::new()
                .app_data(seeded_service())
                .configure(thread_routes),
        )
        .await;

        let req = test::TestRequest::post()
            .uri("/comments")
            .set_json(json!({ "content": "   " }))
            .to_request();
        let res = test::call_service(&app, req).await;

        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    }

    #[actix_web::test]
    async fn posting_then_fetching_shows_the_new_comment() {
        let app = test::init_service(
            App::new()
                .app_data(seeded_service())
                .configure(thread_routes),
        )
        .await;

        let post = test::TestRequest::post()
            .uri("/comments")
            .set_json(json!({ "content": "Great write-up." }))
            .to_request();
        let res = test::call_service(&app, post).await;
        assert_eq!(res.status(), StatusCode::CREATED);

        let body: serde_json::Value = test::read_body_json(res).await;
        assert_eq!(body["comment_id"], json!(2));

        let get = test::TestRequest::get().uri("/comments").to_request();
        let res = test::call_service(&app, get).await;
        assert_eq!(res.status(), StatusCode::OK);

        let body: serde_json::Value = test::read_body_json(res).await;
        assert_eq!(body["count"], json!(2));
        assert_eq!(body["data"]["currentUser"]["username"], json!("juliusomo"));
        assert_eq!(body["data"]["comments"][1]["content"], json!("Great write-up."));
        assert_eq!(body["data"]["comments"][1]["score"], json!(0));
    }

    #[actix_web::test]
    async fn mutating_an_unknown_target_is_not_found() {
        let app = test::init_service(
            App::new()
                .app_data(seeded_service())
                .configure(thread_routes),
        )
        .await;

        let req = test::TestRequest::put()
            .uri("/comments/99")
            .set_json(json!({ "content": "edited" }))
            .to_request();
        let res = test::call_service(&app, req).await;

        assert_eq!(res.status(), StatusCode::NOT_FOUND);
    }

    #[actix_web::test]
    async fn staged_deletion_requires_resolution() {
        let app = test::init_service(
            App::new()
                .app_data(seeded_service())
                .configure(thread_routes),
        )
        .await;

        let stage = test::TestRequest::delete().uri("/comments/1").to_request();
        let res = test::call_service(&app, stage).await;
        assert_eq!(res.status(), StatusCode::OK);

        // Still there until confirmed.
        let get = test::TestRequest::get().uri("/comments").to_request();
        let res = test::call_service(&app, get).await;
        let body: serde_json::Value = test::read_body_json(res).await;
        assert_eq!(body["count"], json!(1));

        let confirm = test::TestRequest::post()
            .uri("/comments/removal")
            .set_json(json!({ "action": "delete" }))
            .to_request();
        let res = test::call_service(&app, confirm).await;
        assert_eq!(res.status(), StatusCode::OK);

        let get = test::TestRequest::get().uri("/comments").to_request();
        let res = test::call_service(&app, get).await;
        let body: serde_json::Value = test::read_body_json(res).await;
        assert_eq!(body["count"], json!(0));
    }
}
