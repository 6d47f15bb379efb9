//! Interface management messages.

use crate::error::Status;
use crate::ip::Prefix;
use serde::{Deserialize, Serialize};

/// Interface index wildcard used by [`SwInterfaceDump`] to request every
/// interface.
pub const ANY_INTERFACE: u32 = u32::MAX;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CreateLoopback {}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CreateLoopbackReply {
    pub retval: Status,
    pub sw_if_index: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeleteLoopback {
    pub sw_if_index: u32,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DeleteLoopbackReply {
    pub retval: Status,
}

/// Sets the administrative state of an interface.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SwInterfaceSetFlags {
    pub sw_if_index: u32,
    pub admin_up: bool,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SwInterfaceSetFlagsReply {
    pub retval: Status,
}

/// Adds or removes an address on an interface.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SwInterfaceAddDelAddress {
    pub sw_if_index: u32,
    pub is_add: bool,
    pub prefix: Prefix,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SwInterfaceAddDelAddressReply {
    pub retval: Status,
}

/// Dumps interfaces; `sw_if_index == ANY_INTERFACE` requests all of them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SwInterfaceDump {
    pub sw_if_index: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name_filter: Option<String>,
}

impl Default for SwInterfaceDump {
    fn default() -> Self {
        Self {
            sw_if_index: ANY_INTERFACE,
            name_filter: None,
        }
    }
}

/// One interface in a [`SwInterfaceDump`] reply stream.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SwInterfaceDetails {
    pub sw_if_index: u32,
    pub name: String,
    pub admin_up: bool,
    pub link_up: bool,
    pub mtu: u32,
}
