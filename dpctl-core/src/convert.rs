//! Pure converters between the domain model and wire messages.
//!
//! Stateless and total except for the documented validation failures.

use crate::domain::{AclAction, AclRule, Destination, NextHop, Route};
use dpctl_wire::acl as wire_acl;
use dpctl_wire::ip::{FibPath, FibPathProto, FibPathType, IpRoute, Prefix};
use std::net::IpAddr;
use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConvertError {
    #[error("next hop has no address")]
    MissingNextHopAddress,

    #[error("unsupported path type: {0:?}")]
    UnsupportedPathType(FibPathType),
}

pub fn prefix_from_destination(dst: &Destination) -> Prefix {
    Prefix {
        address: dst.address,
        len: dst.prefix_len,
    }
}

pub fn destination_from_prefix(prefix: &Prefix) -> Destination {
    Destination {
        address: prefix.address,
        prefix_len: prefix.len,
    }
}

/// Builds the wire forwarding path for one next hop.
pub fn fib_path_from_next_hop(nh: &NextHop) -> Result<FibPath, ConvertError> {
    if nh.drop {
        return Ok(FibPath {
            sw_if_index: 0,
            weight: nh.weight,
            path_type: FibPathType::Drop,
            proto: FibPathProto::Ip4,
            next_hop: None,
        });
    }

    let address = nh.address.ok_or(ConvertError::MissingNextHopAddress)?;
    let proto = match address {
        IpAddr::V4(_) => FibPathProto::Ip4,
        IpAddr::V6(_) => FibPathProto::Ip6,
    };

    Ok(FibPath {
        sw_if_index: nh.sw_if_index,
        weight: nh.weight,
        path_type: FibPathType::Normal,
        proto,
        next_hop: Some(address),
    })
}

pub fn fib_paths_from_next_hops(next_hops: &[NextHop]) -> Result<Vec<FibPath>, ConvertError> {
    next_hops.iter().map(fib_path_from_next_hop).collect()
}

/// Recovers a domain next hop from a wire path. Only normal and drop paths
/// have a domain representation; everything else is a conversion error.
pub fn next_hop_from_fib_path(path: &FibPath) -> Result<NextHop, ConvertError> {
    match path.path_type {
        FibPathType::Drop => Ok(NextHop {
            address: None,
            sw_if_index: path.sw_if_index,
            weight: path.weight,
            drop: true,
        }),
        FibPathType::Normal => Ok(NextHop {
            address: path.next_hop,
            sw_if_index: path.sw_if_index,
            weight: path.weight,
            drop: false,
        }),
        other => Err(ConvertError::UnsupportedPathType(other)),
    }
}

pub fn route_from_wire(route: &IpRoute) -> Result<Route, ConvertError> {
    let next_hops = route
        .paths
        .iter()
        .map(next_hop_from_fib_path)
        .collect::<Result<Vec<_>, _>>()?;

    Ok(Route {
        dst: destination_from_prefix(&route.prefix),
        vrf: route.table_id,
        next_hops,
    })
}

pub fn acl_rule_to_wire(rule: &AclRule) -> wire_acl::AclRule {
    wire_acl::AclRule {
        is_permit: match rule.action {
            AclAction::Deny => 0,
            AclAction::Permit => 1,
        },
        src_prefix: prefix_from_destination(&rule.src),
        dst_prefix: prefix_from_destination(&rule.dst),
        proto: rule.proto,
        srcport_or_icmptype_first: rule.src_port_low,
        srcport_or_icmptype_last: rule.src_port_high,
        dstport_or_icmpcode_first: rule.dst_port_low,
        dstport_or_icmpcode_last: rule.dst_port_high,
        tcp_flags_mask: rule.tcp_flags_mask,
        tcp_flags_value: rule.tcp_flags_value,
    }
}

pub fn acl_rule_from_wire(rule: &wire_acl::AclRule) -> AclRule {
    AclRule {
        action: if rule.is_permit == 0 {
            AclAction::Deny
        } else {
            AclAction::Permit
        },
        proto: rule.proto,
        src: destination_from_prefix(&rule.src_prefix),
        dst: destination_from_prefix(&rule.dst_prefix),
        src_port_low: rule.srcport_or_icmptype_first,
        src_port_high: rule.srcport_or_icmptype_last,
        dst_port_low: rule.dstport_or_icmpcode_first,
        dst_port_high: rule.dstport_or_icmpcode_last,
        tcp_flags_mask: rule.tcp_flags_mask,
        tcp_flags_value: rule.tcp_flags_value,
    }
}

pub fn acl_rules_to_wire(rules: &[AclRule]) -> Vec<wire_acl::AclRule> {
    rules.iter().map(acl_rule_to_wire).collect()
}

pub fn acl_rules_from_wire(rules: &[wire_acl::AclRule]) -> Vec<AclRule> {
    rules.iter().map(acl_rule_from_wire).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dest(addr: &str, len: u8) -> Destination {
        Destination {
            address: addr.parse().unwrap(),
            prefix_len: len,
        }
    }

    #[test]
    fn test_drop_next_hop_needs_no_address() {
        let nh = NextHop {
            address: None,
            sw_if_index: 0,
            weight: 1,
            drop: true,
        };
        let path = fib_path_from_next_hop(&nh).unwrap();
        assert_eq!(path.path_type, FibPathType::Drop);
        assert_eq!(path.next_hop, None);
    }

    #[test]
    fn test_normal_next_hop_requires_address() {
        let nh = NextHop {
            address: None,
            sw_if_index: 1,
            weight: 1,
            drop: false,
        };
        assert_eq!(
            fib_path_from_next_hop(&nh),
            Err(ConvertError::MissingNextHopAddress)
        );
    }

    #[test]
    fn test_next_hop_proto_follows_address_family() {
        let nh = NextHop {
            address: Some("2001:db8::1".parse().unwrap()),
            sw_if_index: 3,
            weight: 1,
            drop: false,
        };
        let path = fib_path_from_next_hop(&nh).unwrap();
        assert_eq!(path.proto, FibPathProto::Ip6);

        let nh = NextHop {
            address: Some("192.0.2.1".parse().unwrap()),
            sw_if_index: 3,
            weight: 1,
            drop: false,
        };
        assert_eq!(fib_path_from_next_hop(&nh).unwrap().proto, FibPathProto::Ip4);
    }

    #[test]
    fn test_unsupported_path_type_is_an_error() {
        let path = FibPath {
            sw_if_index: 0,
            weight: 0,
            path_type: FibPathType::Local,
            proto: FibPathProto::Ip4,
            next_hop: None,
        };
        assert_eq!(
            next_hop_from_fib_path(&path),
            Err(ConvertError::UnsupportedPathType(FibPathType::Local))
        );
    }

    #[test]
    fn test_route_from_wire_preserves_path_order() {
        let route = IpRoute {
            table_id: 4,
            prefix: Prefix {
                address: "10.0.0.0".parse().unwrap(),
                len: 24,
            },
            paths: vec![
                FibPath {
                    sw_if_index: 1,
                    weight: 10,
                    path_type: FibPathType::Normal,
                    proto: FibPathProto::Ip4,
                    next_hop: Some("192.0.2.1".parse().unwrap()),
                },
                FibPath {
                    sw_if_index: 2,
                    weight: 20,
                    path_type: FibPathType::Normal,
                    proto: FibPathProto::Ip4,
                    next_hop: Some("192.0.2.2".parse().unwrap()),
                },
            ],
        };

        let converted = route_from_wire(&route).unwrap();
        assert_eq!(converted.vrf, 4);
        assert_eq!(converted.next_hops.len(), 2);
        assert_eq!(converted.next_hops[0].weight, 10);
        assert_eq!(converted.next_hops[1].weight, 20);
    }

    #[test]
    fn test_acl_rule_roundtrip() {
        let rule = AclRule {
            action: AclAction::Permit,
            proto: 6,
            src: dest("10.0.0.0", 8),
            dst: dest("192.0.2.0", 24),
            src_port_low: 1024,
            src_port_high: 65535,
            dst_port_low: 443,
            dst_port_high: 443,
            tcp_flags_mask: 0x02,
            tcp_flags_value: 0x02,
        };

        let wire = acl_rule_to_wire(&rule);
        assert_eq!(wire.is_permit, 1);
        assert_eq!(acl_rule_from_wire(&wire), rule);
    }
}
