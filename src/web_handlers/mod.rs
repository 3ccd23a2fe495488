pub mod interfaces;
pub mod subscribe;

use actix_web::web;

/// Register the management API and the catch-all subscription endpoint
pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("/api/subscribe")
            .route(web::get().to(subscribe::list_subscribe))
            .route(web::post().to(subscribe::add_subscribe))
            .route(web::delete().to(subscribe::remove_subscribe)),
    )
    .route("/{tail:.*}", web::get().to(interfaces::sub_handler));
}
