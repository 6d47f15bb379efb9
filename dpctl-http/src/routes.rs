//! API router.

use crate::handlers;
use crate::state::AppState;
use axum::routing::{delete, get, post, put};
use axum::Router;

/// Builds the `/v1` API router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/v1/version", get(handlers::info::version))
        .route("/v1/interfaces", get(handlers::interfaces::list))
        .route(
            "/v1/interfaces/loopback",
            post(handlers::interfaces::create_loopback),
        )
        .route(
            "/v1/interfaces/loopback/{sw_if_index}",
            delete(handlers::interfaces::delete_loopback),
        )
        .route(
            "/v1/interfaces/{sw_if_index}/state",
            put(handlers::interfaces::set_state),
        )
        .route(
            "/v1/interfaces/{sw_if_index}/addresses",
            post(handlers::interfaces::add_address)
                .delete(handlers::interfaces::remove_address),
        )
        .route(
            "/v1/routes",
            get(handlers::ip::list_routes)
                .post(handlers::ip::create_route)
                .delete(handlers::ip::delete_route),
        )
        .route("/v1/routes/lookup", post(handlers::ip::lookup_route))
        .route(
            "/v1/vrfs",
            get(handlers::ip::list_vrfs).post(handlers::ip::create_vrf),
        )
        .route("/v1/vrfs/{id}", delete(handlers::ip::delete_vrf))
        .route(
            "/v1/acls",
            get(handlers::acl::list).post(handlers::acl::create),
        )
        .route(
            "/v1/acls/{id}",
            put(handlers::acl::update).delete(handlers::acl::delete),
        )
        .with_state(state)
}
