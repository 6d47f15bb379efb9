//! Request/reply correlation over per-call streams.
//!
//! Three call shapes cover the whole DCP surface:
//! - [`Client::call`]: one request, exactly one typed reply;
//! - [`Client::dump`]: one request, a variable-length detail stream bounded
//!   by a control-ping sentinel;
//! - [`Client::with_stream`]: raw stream access with caller-supplied
//!   termination logic.
//!
//! Every shape opens a dedicated stream, applies the configured deadlines,
//! and closes the stream on every exit path. The engine never retries;
//! retry policy belongs to callers.

use crate::error::ClientError;
use crate::transport::{Stream, Transport, TransportError};
use dpctl_wire::control::{ControlPing, ControlPingReply};
use dpctl_wire::{Message, TypedMessage};
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

/// Deadlines applied to every call.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Bound on stream acquisition.
    pub open_timeout: Duration,
    /// Bound on each receive while waiting for replies.
    pub request_timeout: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            open_timeout: Duration::from_secs(10),
            request_timeout: Duration::from_secs(30),
        }
    }
}

impl ClientConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_open_timeout(mut self, timeout: Duration) -> Self {
        self.open_timeout = timeout;
        self
    }

    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }
}

/// The correlation engine.
#[derive(Clone)]
pub struct Client {
    transport: Arc<dyn Transport>,
    config: ClientConfig,
}

impl Client {
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self::with_config(transport, ClientConfig::default())
    }

    pub fn with_config(transport: Arc<dyn Transport>, config: ClientConfig) -> Self {
        Self { transport, config }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Sends `req` and receives exactly one reply of type `Resp`.
    pub async fn call<Req, Resp>(&self, req: Req) -> Result<Resp, ClientError>
    where
        Req: TypedMessage,
        Resp: TypedMessage,
    {
        self.call_with_timeout(self.config.request_timeout, req)
            .await
    }

    /// [`Client::call`] with a per-call receive deadline.
    pub async fn call_with_timeout<Req, Resp>(
        &self,
        timeout: Duration,
        req: Req,
    ) -> Result<Resp, ClientError>
    where
        Req: TypedMessage,
        Resp: TypedMessage,
    {
        let mut stream = self
            .transport
            .open(self.config.open_timeout)
            .await
            .map_err(ClientError::Connection)?;
        let result = call_on(stream.as_mut(), timeout, req).await;
        stream.close().await;
        result
    }

    /// Sends `req`, then a control-ping probe on the same stream, and
    /// collects detail messages until the ping reply arrives.
    ///
    /// `convert` decodes one detail into an item or skips an unrelated
    /// interleaved message by returning `None`. Details carrying a nonzero
    /// status are recorded and reported together once the sentinel lands;
    /// they are never silently dropped.
    pub async fn dump<Req, T, F>(&self, req: Req, convert: F) -> Result<Vec<T>, ClientError>
    where
        Req: TypedMessage,
        F: FnMut(Box<dyn Message>) -> Option<T> + Send,
        T: Send,
    {
        self.dump_with_timeout(self.config.request_timeout, req, convert)
            .await
    }

    /// [`Client::dump`] with a per-receive deadline.
    pub async fn dump_with_timeout<Req, T, F>(
        &self,
        timeout: Duration,
        req: Req,
        convert: F,
    ) -> Result<Vec<T>, ClientError>
    where
        Req: TypedMessage,
        F: FnMut(Box<dyn Message>) -> Option<T> + Send,
        T: Send,
    {
        let mut stream = self
            .transport
            .open(self.config.open_timeout)
            .await
            .map_err(ClientError::Connection)?;
        let result = dump_on(stream.as_mut(), timeout, req, convert).await;
        stream.close().await;
        result
    }

    /// Opens a stream and hands it to `f` for caller-controlled exchanges.
    /// `f` returns the stream alongside its result; the engine closes it on
    /// success and failure alike.
    pub async fn with_stream<R, F, Fut>(&self, f: F) -> Result<R, ClientError>
    where
        F: FnOnce(Box<dyn Stream>) -> Fut + Send,
        Fut: Future<Output = (Box<dyn Stream>, Result<R, ClientError>)> + Send,
        R: Send,
    {
        let stream = self
            .transport
            .open(self.config.open_timeout)
            .await
            .map_err(ClientError::Connection)?;
        let (mut stream, result) = f(stream).await;
        stream.close().await;
        result
    }
}

/// Receives one message within `timeout`; elapsing counts as a receive
/// failure, per the transport deadline contract.
pub async fn recv_within(
    stream: &mut dyn Stream,
    timeout: Duration,
) -> Result<Box<dyn Message>, ClientError> {
    match tokio::time::timeout(timeout, stream.recv()).await {
        Ok(Ok(msg)) => Ok(msg),
        Ok(Err(source)) => Err(ClientError::Receive(source)),
        Err(_) => Err(ClientError::Receive(TransportError::Timeout(timeout))),
    }
}

async fn call_on<Req, Resp>(
    stream: &mut dyn Stream,
    timeout: Duration,
    req: Req,
) -> Result<Resp, ClientError>
where
    Req: TypedMessage,
    Resp: TypedMessage,
{
    stream
        .send(&req)
        .await
        .map_err(|source| ClientError::Send {
            message: Req::NAME,
            source,
        })?;

    let msg = recv_within(stream, timeout).await?;
    let observed = msg.name();
    let reply = match msg.into_any().downcast::<Resp>() {
        Ok(reply) => reply,
        Err(_) => {
            tracing::warn!(
                expected = Resp::NAME,
                observed,
                "unexpected reply type; possible dataplane version mismatch"
            );
            return Err(ClientError::UnexpectedMessage {
                expected: Resp::NAME,
                observed,
            });
        }
    };

    let status = reply.status();
    if !status.is_ok() {
        return Err(ClientError::Remote {
            message: Resp::NAME,
            status,
        });
    }

    Ok(*reply)
}

async fn dump_on<Req, T, F>(
    stream: &mut dyn Stream,
    timeout: Duration,
    req: Req,
    mut convert: F,
) -> Result<Vec<T>, ClientError>
where
    Req: TypedMessage,
    F: FnMut(Box<dyn Message>) -> Option<T> + Send,
{
    stream
        .send(&req)
        .await
        .map_err(|source| ClientError::Send {
            message: Req::NAME,
            source,
        })?;

    // The probe bounds the otherwise-unbounded detail stream: the sentinel
    // reply arrives after the last detail message.
    stream
        .send(&ControlPing {})
        .await
        .map_err(|source| ClientError::Send {
            message: <ControlPing as TypedMessage>::NAME,
            source,
        })?;

    let mut items = Vec::new();
    let mut errors = Vec::new();

    loop {
        let msg = recv_within(stream, timeout).await?;

        if msg.as_any().is::<ControlPingReply>() {
            if errors.is_empty() {
                return Ok(items);
            }
            return Err(ClientError::Aggregate { errors });
        }

        let status = msg.status();
        if !status.is_ok() {
            tracing::debug!(message = msg.name(), %status, "dump item failed");
            errors.push(ClientError::Remote {
                message: msg.name(),
                status,
            });
            continue;
        }

        if let Some(item) = convert(msg) {
            items.push(item);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{MockScript, MockTransport};
    use dpctl_wire::control::{ShowVersion, ShowVersionReply};
    use dpctl_wire::ip::{IpRoute, IpRouteDetails, IpTableAddDelReply, Prefix};
    use dpctl_wire::Status;

    fn route_details(table_id: u32) -> IpRouteDetails {
        IpRouteDetails {
            retval: Status::OK,
            route: IpRoute {
                table_id,
                prefix: Prefix {
                    address: "10.0.0.0".parse().unwrap(),
                    len: 24,
                },
                paths: vec![],
            },
        }
    }

    fn client_for(mock: &MockTransport) -> Client {
        Client::new(Arc::new(mock.clone()))
    }

    #[tokio::test]
    async fn test_call_returns_typed_reply() {
        let mock = MockTransport::new();
        mock.push_script(MockScript::new().reply(ShowVersionReply {
            retval: Status::OK,
            program: "dataplane".into(),
            version: "24.02".into(),
            build_date: String::new(),
            build_directory: String::new(),
        }));

        let client = client_for(&mock);
        let reply: ShowVersionReply = client.call(ShowVersion {}).await.unwrap();
        assert_eq!(reply.version, "24.02");
        assert_eq!(mock.opened(), 1);
        assert_eq!(mock.closed(), 1);
    }

    #[tokio::test]
    async fn test_call_wrong_reply_type_closes_stream_once() {
        let mock = MockTransport::new();
        mock.push_script(MockScript::new().reply(IpTableAddDelReply::default()));

        let client = client_for(&mock);
        let err = client
            .call::<_, ShowVersionReply>(ShowVersion {})
            .await
            .unwrap_err();

        match err {
            ClientError::UnexpectedMessage { expected, observed } => {
                assert_eq!(expected, "show_version_reply");
                assert_eq!(observed, "ip_table_add_del_reply");
            }
            other => panic!("expected UnexpectedMessage, got {other:?}"),
        }
        assert_eq!(mock.closed(), 1);
    }

    #[tokio::test]
    async fn test_call_nonzero_status_maps_to_remote() {
        let mock = MockTransport::new();
        mock.push_script(MockScript::new().reply(IpTableAddDelReply {
            retval: Status::NO_SUCH_FIB,
        }));

        let client = client_for(&mock);
        let err = client
            .call::<_, IpTableAddDelReply>(ShowVersion {})
            .await
            .unwrap_err();
        assert_eq!(err.remote_status(), Some(Status::NO_SUCH_FIB));
        assert_eq!(mock.closed(), 1);
    }

    #[tokio::test]
    async fn test_call_connection_failure() {
        let mock = MockTransport::new();
        mock.push_script(MockScript::new().fail_open());

        let client = client_for(&mock);
        let err = client
            .call::<_, ShowVersionReply>(ShowVersion {})
            .await
            .unwrap_err();
        assert!(matches!(err, ClientError::Connection(_)));
        // No stream existed, so nothing to close.
        assert_eq!(mock.closed(), 0);
    }

    #[tokio::test]
    async fn test_call_send_failure_closes_stream() {
        let mock = MockTransport::new();
        mock.push_script(MockScript::new().fail_send());

        let client = client_for(&mock);
        let err = client
            .call::<_, ShowVersionReply>(ShowVersion {})
            .await
            .unwrap_err();
        assert!(matches!(err, ClientError::Send { .. }));
        assert_eq!(mock.closed(), 1);
    }

    #[tokio::test]
    async fn test_call_receive_timeout() {
        let mock = MockTransport::new();
        mock.push_script(MockScript::new().hang());

        let client = Client::with_config(
            Arc::new(mock.clone()),
            ClientConfig::new().with_request_timeout(Duration::from_millis(20)),
        );
        let err = client
            .call::<_, ShowVersionReply>(ShowVersion {})
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            ClientError::Receive(TransportError::Timeout(_))
        ));
        assert_eq!(mock.closed(), 1);
    }

    #[tokio::test]
    async fn test_dump_collects_in_receive_order() {
        let mock = MockTransport::new();
        mock.push_script(
            MockScript::new()
                .reply(route_details(3))
                .reply(route_details(1))
                .reply(route_details(2))
                .reply(ControlPingReply::default()),
        );

        let client = client_for(&mock);
        let tables: Vec<u32> = client
            .dump(
                dpctl_wire::ip::IpRouteDump {
                    table: Default::default(),
                },
                |msg| {
                    msg.into_any()
                        .downcast::<IpRouteDetails>()
                        .ok()
                        .map(|d| d.route.table_id)
                },
            )
            .await
            .unwrap();

        assert_eq!(tables, vec![3, 1, 2]);
        // Request plus sentinel probe on the same stream.
        let sent = mock.sent();
        assert_eq!(sent[0].0, "ip_route_dump");
        assert_eq!(sent[1].0, "control_ping");
        assert_eq!(mock.closed(), 1);
    }

    #[tokio::test]
    async fn test_dump_empty_when_sentinel_first() {
        let mock = MockTransport::new();
        mock.push_script(MockScript::new().reply(ControlPingReply::default()));

        let client = client_for(&mock);
        let items: Vec<u32> = client
            .dump(ShowVersion {}, |_| Some(0u32))
            .await
            .unwrap();
        assert!(items.is_empty());
    }

    #[tokio::test]
    async fn test_dump_skips_unrelated_messages() {
        let mock = MockTransport::new();
        mock.push_script(
            MockScript::new()
                .reply(route_details(1))
                .reply(ShowVersionReply::default())
                .reply(route_details(2))
                .reply(ControlPingReply::default()),
        );

        let client = client_for(&mock);
        let tables: Vec<u32> = client
            .dump(ShowVersion {}, |msg| {
                msg.into_any()
                    .downcast::<IpRouteDetails>()
                    .ok()
                    .map(|d| d.route.table_id)
            })
            .await
            .unwrap();
        assert_eq!(tables, vec![1, 2]);
    }

    #[tokio::test]
    async fn test_dump_aggregates_item_errors() {
        let mut bad = route_details(1);
        bad.retval = Status::UNSPECIFIED;
        let mut also_bad = route_details(2);
        also_bad.retval = Status::INVALID_VALUE;

        let mock = MockTransport::new();
        mock.push_script(
            MockScript::new()
                .reply(route_details(9))
                .reply(bad)
                .reply(also_bad)
                .reply(ControlPingReply::default()),
        );

        let client = client_for(&mock);
        let err = client
            .dump::<_, u32, _>(ShowVersion {}, |msg| {
                msg.into_any()
                    .downcast::<IpRouteDetails>()
                    .ok()
                    .map(|d| d.route.table_id)
            })
            .await
            .unwrap_err();

        match err {
            ClientError::Aggregate { errors } => {
                assert_eq!(errors.len(), 2);
                assert_eq!(errors[0].remote_status(), Some(Status::UNSPECIFIED));
                assert_eq!(errors[1].remote_status(), Some(Status::INVALID_VALUE));
            }
            other => panic!("expected Aggregate, got {other:?}"),
        }
        assert_eq!(mock.closed(), 1);
    }

    #[tokio::test]
    async fn test_dump_receive_failure_discards_partials() {
        let mock = MockTransport::new();
        mock.push_script(
            MockScript::new()
                .reply(route_details(1))
                .reply_closed(),
        );

        let client = client_for(&mock);
        let err = client
            .dump::<_, u32, _>(ShowVersion {}, |msg| {
                msg.into_any()
                    .downcast::<IpRouteDetails>()
                    .ok()
                    .map(|d| d.route.table_id)
            })
            .await
            .unwrap_err();
        assert!(matches!(err, ClientError::Receive(_)));
        assert_eq!(mock.closed(), 1);
    }

    async fn fetch_reply_name(
        stream: &mut dyn crate::transport::Stream,
    ) -> Result<&'static str, ClientError> {
        stream
            .send(&ShowVersion {})
            .await
            .map_err(|source| ClientError::Send {
                message: "show_version",
                source,
            })?;
        let msg = recv_within(stream, Duration::from_secs(1)).await?;
        Ok(msg.name())
    }

    #[tokio::test]
    async fn test_with_stream_closes_on_exit() {
        let mock = MockTransport::new();
        mock.push_script(MockScript::new().reply(ShowVersionReply::default()));

        let client = client_for(&mock);
        let name = client
            .with_stream(|mut stream| async move {
                let result = fetch_reply_name(stream.as_mut()).await;
                (stream, result)
            })
            .await
            .unwrap();

        assert_eq!(name, "show_version_reply");
        assert_eq!(mock.closed(), 1);
    }
}
