//! API routes for canteen-server

pub mod auth;
pub mod categories;
pub mod health;
pub mod loyalty;
pub mod menu;
pub mod ngo;
pub mod notifications;
pub mod orders;
pub mod payments;
pub mod reviews;
pub mod stats;
pub mod surplus;

use axum::routing::{get, post, put};
use axum::{middleware, Router};
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::auth::auth_middleware;
use crate::message::ws;
use crate::state::AppState;

/// Create the combined router
pub fn create_router(state: AppState) -> Router {
    // Browse endpoints and the WebSocket upgrade need no bearer token; the
    // socket authenticates in-band with an AUTH frame.
    let public = Router::new()
        .route("/health", get(health::health_check))
        .route("/ws", get(ws::handle_ws))
        .route("/api/auth/register", post(auth::register))
        .route("/api/auth/login", post(auth::login))
        .route("/api/categories", get(categories::list))
        .route("/api/menu", get(menu::list))
        .route("/api/menu/{id}", get(menu::get))
        .route("/api/menu/{id}/reviews", get(reviews::list_for_item))
        .route("/api/surplus", get(surplus::list))
        .route("/api/loyalty/rewards", get(loyalty::list_rewards))
        .route("/api/ngos", get(ngo::list))
        .route("/api/ngos/{id}", get(ngo::get));

    // Everything below requires a verified bearer token. Admin-only
    // management lives under /api/admin; handlers still check the role.
    let protected = Router::new()
        .route("/api/auth/me", get(auth::me))
        .route("/api/orders", post(orders::place).get(orders::list))
        .route("/api/orders/{id}", get(orders::get).put(orders::edit))
        .route("/api/orders/{id}/status", post(orders::update_status))
        .route("/api/orders/{id}/payment", post(payments::create_order))
        .route("/api/orders/{id}/payment/confirm", post(payments::confirm))
        .route("/api/reviews", post(reviews::create))
        .route("/api/loyalty/points", get(loyalty::points))
        .route("/api/loyalty/redeem", post(loyalty::redeem))
        .route("/api/loyalty/redemptions", get(loyalty::redemptions))
        .route("/api/notifications", get(notifications::list))
        .route("/api/notifications/{id}/read", post(notifications::mark_read))
        .route("/api/menu/{id}/surplus", post(surplus::mark))
        .route("/api/donations", post(surplus::create_donation))
        .route("/api/donations/{id}/status", post(surplus::update_donation_status))
        .route("/api/ngos/{id}/donations", get(surplus::donations_by_ngo))
        .route("/api/admin/categories", post(categories::create))
        .route("/api/admin/menu", post(menu::create))
        .route("/api/admin/menu/{id}", put(menu::update).delete(menu::remove))
        .route("/api/admin/rewards", post(loyalty::create_reward))
        .route("/api/admin/rewards/{id}", put(loyalty::update_reward))
        .route("/api/admin/ngos", post(ngo::create))
        .route("/api/admin/ngos/{id}", put(ngo::update))
        .route("/api/admin/stats", get(stats::dashboard))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ));

    Router::new()
        .merge(public)
        .merge(protected)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
