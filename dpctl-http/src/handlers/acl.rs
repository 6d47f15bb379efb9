//! ACL handlers.

use crate::dto::{AclCreateRequest, AclCreateResponse, AclResponse, AclRuleDto, AclUpdateRequest};
use crate::error::ApiError;
use crate::state::AppState;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;

pub async fn list(State(state): State<AppState>) -> Result<Json<Vec<AclResponse>>, ApiError> {
    let acls = state.acl.list().await?;
    Ok(Json(acls.into_iter().map(Into::into).collect()))
}

pub async fn create(
    State(state): State<AppState>,
    Json(req): Json<AclCreateRequest>,
) -> Result<(StatusCode, Json<AclCreateResponse>), ApiError> {
    let rules = parse_rules(&req.rules)?;
    let id = state.acl.create(&req.name, &rules).await?;
    Ok((StatusCode::CREATED, Json(AclCreateResponse { id })))
}

pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<u32>,
    Json(req): Json<AclUpdateRequest>,
) -> Result<StatusCode, ApiError> {
    let rules = parse_rules(&req.rules)?;
    state.acl.update(id, &rules).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn delete(
    State(state): State<AppState>,
    Path(id): Path<u32>,
) -> Result<StatusCode, ApiError> {
    state.acl.delete(id).await?;
    Ok(StatusCode::NO_CONTENT)
}

fn parse_rules(rules: &[AclRuleDto]) -> Result<Vec<dpctl_core::domain::AclRule>, ApiError> {
    rules.iter().map(AclRuleDto::to_domain).collect()
}
