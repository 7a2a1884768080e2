use super::controller::{
    edit_comment, get_thread, post_comment, reply_to_comment, request_removal, resolve_removal,
    score_comment, sync_status,
};
use actix_web::web;

pub fn thread_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/comments")
            .route("", web::get().to(get_thread))
            .route("", web::post().to(post_comment))
            .route("/sync", web::get().to(sync_status))
            .route("/removal", web::post().to(resolve_removal))
            .route("/{comment_id}/replies", web::post().to(reply_to_comment))
            .route("/{comment_id}/score", web::put().to(score_comment))
            .route("/{comment_id}", web::put().to(edit_comment))
            .route("/{comment_id}", web::delete().to(request_removal)),
    );
}
