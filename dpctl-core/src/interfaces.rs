//! Interface service.

use crate::convert;
use crate::domain::{Destination, Interface};
use crate::error::{map_remote, CoreError};
use dpctl_client::Client;
use dpctl_wire::interface::{
    CreateLoopback, CreateLoopbackReply, DeleteLoopback, DeleteLoopbackReply, SwInterfaceAddDelAddress,
    SwInterfaceAddDelAddressReply, SwInterfaceDetails, SwInterfaceDump, SwInterfaceSetFlags,
    SwInterfaceSetFlagsReply,
};

pub struct InterfaceService {
    client: Client,
}

impl InterfaceService {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// Creates a loopback interface and returns its index.
    pub async fn create_loopback(&self) -> Result<u32, CoreError> {
        let reply: CreateLoopbackReply = self
            .client
            .call(CreateLoopback {})
            .await
            .map_err(CoreError::Dataplane)?;
        tracing::info!(sw_if_index = reply.sw_if_index, "loopback created");
        Ok(reply.sw_if_index)
    }

    pub async fn delete_loopback(&self, sw_if_index: u32) -> Result<(), CoreError> {
        self.client
            .call::<_, DeleteLoopbackReply>(DeleteLoopback { sw_if_index })
            .await
            .map_err(|err| map_remote(format!("interface {sw_if_index}"), err))?;
        tracing::info!(sw_if_index, "loopback deleted");
        Ok(())
    }

    pub async fn set_admin_state(&self, sw_if_index: u32, up: bool) -> Result<(), CoreError> {
        self.client
            .call::<_, SwInterfaceSetFlagsReply>(SwInterfaceSetFlags {
                sw_if_index,
                admin_up: up,
            })
            .await
            .map_err(|err| map_remote(format!("interface {sw_if_index}"), err))?;
        tracing::info!(sw_if_index, up, "interface admin state set");
        Ok(())
    }

    /// Adds an address to an interface. A duplicate address maps to
    /// `AlreadyExists`, an unknown interface to `NotFound`.
    pub async fn add_address(&self, sw_if_index: u32, dst: Destination) -> Result<(), CoreError> {
        self.client
            .call::<_, SwInterfaceAddDelAddressReply>(SwInterfaceAddDelAddress {
                sw_if_index,
                is_add: true,
                prefix: convert::prefix_from_destination(&dst),
            })
            .await
            .map_err(|err| map_remote(format!("address {dst} on interface {sw_if_index}"), err))?;
        tracing::info!(sw_if_index, %dst, "interface address added");
        Ok(())
    }

    pub async fn remove_address(&self, sw_if_index: u32, dst: Destination) -> Result<(), CoreError> {
        self.client
            .call::<_, SwInterfaceAddDelAddressReply>(SwInterfaceAddDelAddress {
                sw_if_index,
                is_add: false,
                prefix: convert::prefix_from_destination(&dst),
            })
            .await
            .map_err(|err| map_remote(format!("address {dst} on interface {sw_if_index}"), err))?;
        tracing::info!(sw_if_index, %dst, "interface address removed");
        Ok(())
    }

    pub async fn list(&self) -> Result<Vec<Interface>, CoreError> {
        let interfaces = self
            .client
            .dump(SwInterfaceDump::default(), |msg| {
                let details = msg.into_any().downcast::<SwInterfaceDetails>().ok()?;
                Some(Interface {
                    sw_if_index: details.sw_if_index,
                    name: details.name,
                    admin_up: details.admin_up,
                    link_up: details.link_up,
                    mtu: details.mtu,
                })
            })
            .await?;
        Ok(interfaces)
    }
}
