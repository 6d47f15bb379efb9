//! IP FIB messages: tables (VRFs), routes, forwarding paths.

use crate::error::Status;
use serde::{Deserialize, Serialize};
use std::net::IpAddr;

/// Table id wildcard: dump requests with this id cover every table of the
/// requested address family.
pub const ANY_TABLE: u32 = u32::MAX;

/// An IP prefix on the wire.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Prefix {
    pub address: IpAddr,
    pub len: u8,
}

/// A FIB table identity. One logical VRF id owns two table objects, one per
/// address family.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IpTable {
    pub table_id: u32,
    pub is_ip6: bool,
    #[serde(default)]
    pub name: String,
}

/// Forwarding-path type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FibPathType {
    Normal,
    Drop,
    Local,
    Receive,
}

/// Next-hop protocol of a forwarding path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FibPathProto {
    Ip4,
    Ip6,
}

/// One forwarding path of a route. Routes with several paths of equal
/// preference form an ECMP group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FibPath {
    pub sw_if_index: u32,
    pub weight: u8,
    #[serde(rename = "type")]
    pub path_type: FibPathType,
    pub proto: FibPathProto,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_hop: Option<IpAddr>,
}

/// A route entry as carried in add/del requests and dump details.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IpRoute {
    pub table_id: u32,
    pub prefix: Prefix,
    pub paths: Vec<FibPath>,
}

/// Creates or deletes one address family's table object for a VRF id.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IpTableAddDel {
    pub is_add: bool,
    pub table: IpTable,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct IpTableAddDelReply {
    pub retval: Status,
}

/// Dumps every table object known to the dataplane (both families).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct IpTableDump {}

/// One table object in an [`IpTableDump`] reply stream.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IpTableDetails {
    pub table: IpTable,
}

/// Installs or removes a route.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IpRouteAddDel {
    pub is_add: bool,
    pub is_multipath: bool,
    pub route: IpRoute,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct IpRouteAddDelReply {
    pub retval: Status,
    #[serde(default)]
    pub stats_index: u32,
}

/// Dumps the routes of one table, or of every table of the address family
/// when `table.table_id` is [`ANY_TABLE`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IpRouteDump {
    pub table: IpTable,
}

/// One route in an [`IpRouteDump`] reply stream.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IpRouteDetails {
    #[serde(default)]
    pub retval: Status,
    pub route: IpRoute,
}

/// Looks up a single route by destination prefix.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IpRouteLookup {
    pub table_id: u32,
    pub exact: bool,
    pub prefix: Prefix,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IpRouteLookupReply {
    pub retval: Status,
    pub route: IpRoute,
}
