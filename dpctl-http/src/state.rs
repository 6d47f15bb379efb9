//! Shared handler state.

use dpctl_client::Client;
use dpctl_core::{AclService, InfoService, InterfaceService, IpService};
use std::sync::Arc;

/// Service handles shared by all request handlers.
#[derive(Clone)]
pub struct AppState {
    pub ip: Arc<IpService>,
    pub interfaces: Arc<InterfaceService>,
    pub acl: Arc<AclService>,
    pub info: Arc<InfoService>,
}

impl AppState {
    /// Builds the service stack over one correlation engine client.
    pub fn new(client: Client) -> Self {
        Self {
            ip: Arc::new(IpService::new(client.clone())),
            interfaces: Arc::new(InterfaceService::new(client.clone())),
            acl: Arc::new(AclService::new(client.clone())),
            info: Arc::new(InfoService::new(client)),
        }
    }
}
