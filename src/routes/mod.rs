pub mod auth;
pub mod health;
pub mod tasks;

use actix_web::web;

/// Wires the versionless API surface under whatever scope the caller
/// mounts it on (`/api` in production and in the integration tests).
pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/auth")
            .service(auth::signup)
            .service(auth::signin),
    )
    .service(
        web::scope("/tasks")
            .service(tasks::get_tasks)
            .service(tasks::create_task)
            .service(tasks::update_task)
            .service(tasks::delete_task),
    );
}
