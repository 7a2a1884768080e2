use crate::thread::index::thread_routes;
use actix_web::web;

pub fn routes(cfg: &mut web::ServiceConfig) {
    cfg.configure(thread_routes);
}
