//! Interface handlers.

use crate::dto::{
    self, AddressRequest, CreateLoopbackResponse, InterfaceResponse, SetStateRequest,
};
use crate::error::ApiError;
use crate::state::AppState;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;

pub async fn list(State(state): State<AppState>) -> Result<Json<Vec<InterfaceResponse>>, ApiError> {
    let interfaces = state.interfaces.list().await?;
    Ok(Json(interfaces.into_iter().map(Into::into).collect()))
}

pub async fn create_loopback(
    State(state): State<AppState>,
) -> Result<(StatusCode, Json<CreateLoopbackResponse>), ApiError> {
    let sw_if_index = state.interfaces.create_loopback().await?;
    Ok((
        StatusCode::CREATED,
        Json(CreateLoopbackResponse { sw_if_index }),
    ))
}

pub async fn delete_loopback(
    State(state): State<AppState>,
    Path(sw_if_index): Path<u32>,
) -> Result<StatusCode, ApiError> {
    state.interfaces.delete_loopback(sw_if_index).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn set_state(
    State(state): State<AppState>,
    Path(sw_if_index): Path<u32>,
    Json(req): Json<SetStateRequest>,
) -> Result<StatusCode, ApiError> {
    state.interfaces.set_admin_state(sw_if_index, req.up).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn add_address(
    State(state): State<AppState>,
    Path(sw_if_index): Path<u32>,
    Json(req): Json<AddressRequest>,
) -> Result<StatusCode, ApiError> {
    let dst = dto::parse_destination(&req.address)?;
    state.interfaces.add_address(sw_if_index, dst).await?;
    Ok(StatusCode::CREATED)
}

pub async fn remove_address(
    State(state): State<AppState>,
    Path(sw_if_index): Path<u32>,
    Json(req): Json<AddressRequest>,
) -> Result<StatusCode, ApiError> {
    let dst = dto::parse_destination(&req.address)?;
    state.interfaces.remove_address(sw_if_index, dst).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use super::*;
    use dpctl_client::testing::{MockScript, MockTransport};
    use dpctl_client::Client;
    use dpctl_wire::interface::{CreateLoopbackReply, SwInterfaceAddDelAddressReply};
    use dpctl_wire::Status;
    use std::sync::Arc;

    fn state_for(mock: &MockTransport) -> AppState {
        AppState::new(Client::new(Arc::new(mock.clone())))
    }

    #[tokio::test]
    async fn test_create_loopback_returns_created() {
        let mock = MockTransport::new();
        mock.push_script(MockScript::new().reply(CreateLoopbackReply {
            retval: Status::OK,
            sw_if_index: 7,
        }));

        let (status, Json(resp)) = create_loopback(State(state_for(&mock))).await.unwrap();
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(resp.sw_if_index, 7);
    }

    #[tokio::test]
    async fn test_add_address_invalid_input_is_400() {
        let mock = MockTransport::new();
        let err = add_address(
            State(state_for(&mock)),
            Path(1),
            Json(AddressRequest {
                address: "not-a-prefix".into(),
            }),
        )
        .await
        .unwrap_err();
        assert_eq!(err.status(), StatusCode::BAD_REQUEST);
        assert_eq!(mock.opened(), 0);
    }

    #[tokio::test]
    async fn test_add_address_conflict_is_409() {
        let mock = MockTransport::new();
        mock.push_script(MockScript::new().reply(SwInterfaceAddDelAddressReply {
            retval: Status::ADDRESS_IN_USE,
        }));

        let err = add_address(
            State(state_for(&mock)),
            Path(1),
            Json(AddressRequest {
                address: "192.0.2.1/24".into(),
            }),
        )
        .await
        .unwrap_err();
        assert_eq!(err.status(), StatusCode::CONFLICT);
    }
}
