//! Route and VRF handlers.

use crate::dto::{
    self, LookupRequest, RouteQuery, RouteRequest, RouteResponse, VrfCreateRequest, VrfResponse,
};
use crate::error::ApiError;
use crate::state::AppState;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;

pub async fn list_routes(
    State(state): State<AppState>,
    Query(query): Query<RouteQuery>,
) -> Result<Json<Vec<RouteResponse>>, ApiError> {
    let routes = state.ip.list_routes(query.vrf).await?;
    Ok(Json(routes.into_iter().map(Into::into).collect()))
}

pub async fn create_route(
    State(state): State<AppState>,
    Json(req): Json<RouteRequest>,
) -> Result<StatusCode, ApiError> {
    let route = req.to_domain()?;
    state.ip.add_route(&route).await?;
    Ok(StatusCode::CREATED)
}

pub async fn delete_route(
    State(state): State<AppState>,
    Json(req): Json<RouteRequest>,
) -> Result<StatusCode, ApiError> {
    let route = req.to_domain()?;
    state.ip.delete_route(&route).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn lookup_route(
    State(state): State<AppState>,
    Json(req): Json<LookupRequest>,
) -> Result<Json<RouteResponse>, ApiError> {
    let dst = dto::parse_destination(&req.dst)?;
    let route = state.ip.get_route(dst, req.vrf).await?;
    Ok(Json(route.into()))
}

pub async fn list_vrfs(State(state): State<AppState>) -> Result<Json<Vec<VrfResponse>>, ApiError> {
    let vrfs = state.ip.list_vrfs().await?;
    Ok(Json(vrfs.into_iter().map(Into::into).collect()))
}

pub async fn create_vrf(
    State(state): State<AppState>,
    Json(req): Json<VrfCreateRequest>,
) -> Result<StatusCode, ApiError> {
    state.ip.create_vrf(req.id, &req.name).await?;
    Ok(StatusCode::CREATED)
}

pub async fn delete_vrf(
    State(state): State<AppState>,
    Path(id): Path<u32>,
) -> Result<StatusCode, ApiError> {
    state.ip.delete_vrf(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
