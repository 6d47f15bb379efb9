//! The type-erased message trait and the wire-name registry.
//!
//! Every DCP message type is registered here with its stable wire name.
//! Reply types carry a `retval` status field and surface it through
//! [`Message::status`]; request and plain detail types report success.

use crate::error::{Status, WireError};
use serde_json::Value;
use std::any::Any;
use std::fmt;

/// A typed unit of wire data, usable through a trait object.
pub trait Message: Any + Send + Sync + fmt::Debug {
    /// Stable wire name of this message type.
    fn name(&self) -> &'static str;

    /// Embedded status code; messages without one report success.
    fn status(&self) -> Status {
        Status::OK
    }

    fn as_any(&self) -> &dyn Any;

    fn into_any(self: Box<Self>) -> Box<dyn Any + Send>;

    /// Serializes the message body for the frame envelope.
    fn body(&self) -> Result<Value, WireError>;
}

/// Compile-time message identity, used by the correlation engine to name
/// the expected reply type in error reports.
pub trait TypedMessage: Message + serde::Serialize + serde::de::DeserializeOwned {
    const NAME: &'static str;
}

macro_rules! wire_message {
    (request $ty:ty => $name:literal) => {
        impl Message for $ty {
            fn name(&self) -> &'static str {
                $name
            }
            fn as_any(&self) -> &dyn Any {
                self
            }
            fn into_any(self: Box<Self>) -> Box<dyn Any + Send> {
                self
            }
            fn body(&self) -> Result<Value, WireError> {
                Ok(serde_json::to_value(self)?)
            }
        }
        impl TypedMessage for $ty {
            const NAME: &'static str = $name;
        }
    };
    (reply $ty:ty => $name:literal) => {
        impl Message for $ty {
            fn name(&self) -> &'static str {
                $name
            }
            fn status(&self) -> Status {
                self.retval
            }
            fn as_any(&self) -> &dyn Any {
                self
            }
            fn into_any(self: Box<Self>) -> Box<dyn Any + Send> {
                self
            }
            fn body(&self) -> Result<Value, WireError> {
                Ok(serde_json::to_value(self)?)
            }
        }
        impl TypedMessage for $ty {
            const NAME: &'static str = $name;
        }
    };
}

macro_rules! registry {
    ( $( $kind:ident $ty:ty => $name:literal, )+ ) => {
        $( wire_message!($kind $ty => $name); )+

        /// Decodes a message body by wire name.
        pub fn decode_body(name: &str, body: Value) -> Result<Box<dyn Message>, WireError> {
            match name {
                $( $name => Ok(Box::new(serde_json::from_value::<$ty>(body)?)), )+
                _ => Err(WireError::UnknownMessage(name.to_string())),
            }
        }
    };
}

registry! {
    request crate::control::ControlPing => "control_ping",
    reply   crate::control::ControlPingReply => "control_ping_reply",
    request crate::control::ShowVersion => "show_version",
    reply   crate::control::ShowVersionReply => "show_version_reply",

    request crate::ip::IpTableAddDel => "ip_table_add_del",
    reply   crate::ip::IpTableAddDelReply => "ip_table_add_del_reply",
    request crate::ip::IpTableDump => "ip_table_dump",
    request crate::ip::IpTableDetails => "ip_table_details",
    request crate::ip::IpRouteAddDel => "ip_route_add_del",
    reply   crate::ip::IpRouteAddDelReply => "ip_route_add_del_reply",
    request crate::ip::IpRouteDump => "ip_route_dump",
    reply   crate::ip::IpRouteDetails => "ip_route_details",
    request crate::ip::IpRouteLookup => "ip_route_lookup",
    reply   crate::ip::IpRouteLookupReply => "ip_route_lookup_reply",

    request crate::interface::CreateLoopback => "create_loopback",
    reply   crate::interface::CreateLoopbackReply => "create_loopback_reply",
    request crate::interface::DeleteLoopback => "delete_loopback",
    reply   crate::interface::DeleteLoopbackReply => "delete_loopback_reply",
    request crate::interface::SwInterfaceSetFlags => "sw_interface_set_flags",
    reply   crate::interface::SwInterfaceSetFlagsReply => "sw_interface_set_flags_reply",
    request crate::interface::SwInterfaceAddDelAddress => "sw_interface_add_del_address",
    reply   crate::interface::SwInterfaceAddDelAddressReply => "sw_interface_add_del_address_reply",
    request crate::interface::SwInterfaceDump => "sw_interface_dump",
    request crate::interface::SwInterfaceDetails => "sw_interface_details",

    request crate::acl::AclAddReplace => "acl_add_replace",
    reply   crate::acl::AclAddReplaceReply => "acl_add_replace_reply",
    request crate::acl::AclDel => "acl_del",
    reply   crate::acl::AclDelReply => "acl_del_reply",
    request crate::acl::AclDump => "acl_dump",
    reply   crate::acl::AclDetails => "acl_details",
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::control::{ControlPing, ControlPingReply};
    use crate::ip::IpRouteAddDelReply;

    #[test]
    fn test_request_status_defaults_to_ok() {
        let ping = ControlPing {};
        assert_eq!(ping.status(), Status::OK);
        assert_eq!(ping.name(), "control_ping");
    }

    #[test]
    fn test_reply_status_from_retval() {
        let reply = IpRouteAddDelReply {
            retval: Status::NO_SUCH_FIB,
            stats_index: 0,
        };
        assert_eq!(reply.status(), Status::NO_SUCH_FIB);
    }

    #[test]
    fn test_decode_body_dispatches_on_name() {
        let body = serde_json::json!({ "retval": 0 });
        let msg = decode_body("control_ping_reply", body).unwrap();
        assert_eq!(msg.name(), "control_ping_reply");
        assert!(msg.as_any().is::<ControlPingReply>());
    }

    #[test]
    fn test_decode_body_unknown_name() {
        let err = decode_body("no_such_message", serde_json::json!({})).unwrap_err();
        assert!(matches!(err, WireError::UnknownMessage(_)));
    }

    #[test]
    fn test_into_any_downcast() {
        let boxed: Box<dyn Message> = Box::new(ControlPingReply::default());
        let concrete = boxed.into_any().downcast::<ControlPingReply>().unwrap();
        assert_eq!(concrete.retval, Status::OK);
    }

    #[test]
    fn test_typed_message_names_match_instance_names() {
        assert_eq!(
            <ControlPingReply as TypedMessage>::NAME,
            ControlPingReply::default().name()
        );
    }
}
