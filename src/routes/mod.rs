pub mod auth;
pub mod health;
pub mod planner;
pub mod trips;
pub mod user;

use actix_web::web;

use crate::middleware::auth::AuthMiddleware;

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api")
            // Public routes
            .service(
                web::scope("/auth")
                    .route("/register", web::post().to(auth::register))
                    .route("/login", web::post().to(auth::login)),
            )
            // Protected routes
            .service(
                web::scope("/user")
                    .wrap(AuthMiddleware)
                    .route("/profile", web::get().to(user::profile))
                    .route("/password", web::put().to(user::update_password))
                    .route("/account", web::delete().to(user::delete_account)),
            )
            .service(
                web::scope("/trips")
                    .wrap(AuthMiddleware)
                    .route("", web::post().to(trips::create_trip))
                    .route("", web::get().to(trips::list_trips))
                    .route("/{id}", web::get().to(trips::get_trip)),
            )
            .service(
                web::scope("")
                    .wrap(AuthMiddleware)
                    .route(
                        "/create-agentic-plan",
                        web::post().to(planner::create_agentic_plan),
                    )
                    .route("/modify-plan", web::post().to(planner::modify_plan))
                    .route("/search-cities", web::post().to(planner::search_cities))
                    .route("/save-trip", web::post().to(trips::save_trip)),
            ),
    );
}
