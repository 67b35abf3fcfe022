use std::{sync::Arc, time::Duration};

use axum::{
    http::{
        header::{AUTHORIZATION, CONTENT_TYPE},
        Method,
    },
    routing::{get, post},
    Router,
};
use tower_http::cors::CorsLayer;

use crate::state::AppState;

pub mod auth;
pub mod error;
pub mod filters;
pub mod ingredients;
pub mod pagination;
pub mod payloads;
pub mod recipes;
pub mod tags;
pub mod users;

pub fn router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PATCH,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers([AUTHORIZATION, CONTENT_TYPE])
        .max_age(Duration::from_secs(60 * 60));

    Router::new()
        .route("/api/users", get(users::list))
        .route("/api/users/me", get(users::me))
        .route("/api/users/subscriptions", get(users::subscriptions))
        .route("/api/users/{id}", get(users::retrieve))
        .route(
            "/api/users/{id}/subscribe",
            post(users::subscribe).delete(users::unsubscribe),
        )
        .route("/api/tags", get(tags::list))
        .route("/api/tags/{id}", get(tags::retrieve))
        .route("/api/ingredients", get(ingredients::list))
        .route("/api/ingredients/{id}", get(ingredients::retrieve))
        .route("/api/recipes", get(recipes::list).post(recipes::create))
        .route(
            "/api/recipes/download_shopping_cart",
            get(recipes::download_shopping_cart),
        )
        .route(
            "/api/recipes/{id}",
            get(recipes::retrieve)
                .patch(recipes::update)
                .delete(recipes::destroy),
        )
        .route(
            "/api/recipes/{id}/favorite",
            post(recipes::favorite).delete(recipes::unfavorite),
        )
        .route(
            "/api/recipes/{id}/shopping_cart",
            post(recipes::add_to_cart).delete(recipes::remove_from_cart),
        )
        .layer(cors)
        .with_state(state)
}
