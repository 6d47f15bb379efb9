//! Access-control list messages.

use crate::error::Status;
use crate::ip::Prefix;
use serde::{Deserialize, Serialize};

/// ACL index wildcard: create-new in [`AclAddReplace`], dump-all in
/// [`AclDump`].
pub const ANY_ACL: u32 = u32::MAX;

/// One match/action rule of an ACL, in wire form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AclRule {
    /// 0 = deny, 1 = permit.
    pub is_permit: u8,
    pub src_prefix: Prefix,
    pub dst_prefix: Prefix,
    pub proto: u8,
    pub srcport_or_icmptype_first: u16,
    pub srcport_or_icmptype_last: u16,
    pub dstport_or_icmpcode_first: u16,
    pub dstport_or_icmpcode_last: u16,
    pub tcp_flags_mask: u8,
    pub tcp_flags_value: u8,
}

/// Creates (index [`ANY_ACL`]) or replaces an ACL wholesale.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AclAddReplace {
    pub acl_index: u32,
    pub tag: String,
    pub rules: Vec<AclRule>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AclAddReplaceReply {
    pub retval: Status,
    pub acl_index: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AclDel {
    pub acl_index: u32,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AclDelReply {
    pub retval: Status,
}

/// Dumps one ACL, or all of them when `acl_index == ANY_ACL`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AclDump {
    pub acl_index: u32,
}

impl Default for AclDump {
    fn default() -> Self {
        Self { acl_index: ANY_ACL }
    }
}

/// One ACL in an [`AclDump`] reply stream.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AclDetails {
    #[serde(default)]
    pub retval: Status,
    pub acl_index: u32,
    pub tag: String,
    pub rules: Vec<AclRule>,
}
