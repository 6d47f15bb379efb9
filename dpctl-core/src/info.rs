//! Dataplane version/info service.
//!
//! Uses the raw stream shape rather than a typed unary call, matching the
//! one-off exchange it performs.

use crate::domain::VersionInfo;
use crate::error::CoreError;
use dpctl_client::{recv_within, Client, ClientError, Stream};
use dpctl_wire::control::{ShowVersion, ShowVersionReply};
use dpctl_wire::TypedMessage;
use std::time::Duration;

pub struct InfoService {
    client: Client,
}

impl InfoService {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    pub async fn version(&self) -> Result<VersionInfo, CoreError> {
        let timeout = self.client.config().request_timeout;

        let info = self
            .client
            .with_stream(move |mut stream| async move {
                let result = fetch_version(stream.as_mut(), timeout).await;
                (stream, result)
            })
            .await?;

        Ok(info)
    }
}

async fn fetch_version(
    stream: &mut dyn Stream,
    timeout: Duration,
) -> Result<VersionInfo, ClientError> {
    stream
        .send(&ShowVersion {})
        .await
        .map_err(|source| ClientError::Send {
            message: <ShowVersion as TypedMessage>::NAME,
            source,
        })?;

    let msg = recv_within(stream, timeout).await?;
    let observed = msg.name();
    let reply = msg
        .into_any()
        .downcast::<ShowVersionReply>()
        .map_err(|_| ClientError::UnexpectedMessage {
            expected: <ShowVersionReply as TypedMessage>::NAME,
            observed,
        })?;

    if !reply.retval.is_ok() {
        return Err(ClientError::Remote {
            message: <ShowVersionReply as TypedMessage>::NAME,
            status: reply.retval,
        });
    }

    Ok(VersionInfo {
        program: reply.program,
        version: reply.version,
        build_date: reply.build_date,
        build_directory: reply.build_directory,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use dpctl_client::testing::{MockScript, MockTransport};
    use dpctl_wire::Status;
    use std::sync::Arc;

    #[tokio::test]
    async fn test_version() {
        let mock = MockTransport::new();
        mock.push_script(MockScript::new().reply(ShowVersionReply {
            retval: Status::OK,
            program: "dataplane".into(),
            version: "24.02-release".into(),
            build_date: "2026-02-01".into(),
            build_directory: "/w/build".into(),
        }));

        let service = InfoService::new(Client::new(Arc::new(mock.clone())));
        let info = service.version().await.unwrap();
        assert_eq!(info.version, "24.02-release");
        assert_eq!(mock.closed(), 1);
    }

    #[tokio::test]
    async fn test_version_unexpected_reply() {
        let mock = MockTransport::new();
        mock.push_script(
            MockScript::new().reply(dpctl_wire::control::ControlPingReply::default()),
        );

        let service = InfoService::new(Client::new(Arc::new(mock.clone())));
        let err = service.version().await.unwrap_err();
        assert!(matches!(
            err,
            CoreError::Dataplane(ClientError::UnexpectedMessage { .. })
        ));
        assert_eq!(mock.closed(), 1);
    }
}
