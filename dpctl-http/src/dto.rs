//! Request/response DTOs and their domain conversions.
//!
//! DTOs are deliberately separate from the domain model: addresses and
//! prefixes travel as strings and are validated on the way in.

use crate::error::ApiError;
use dpctl_core::domain::{
    AclAction, AclInfo, AclRule, Destination, Interface, NextHop, Route, VersionInfo, Vrf,
};
use serde::{Deserialize, Serialize};

pub(crate) fn parse_destination(s: &str) -> Result<Destination, ApiError> {
    let (addr, len) = s
        .split_once('/')
        .ok_or_else(|| ApiError::bad_request(format!("invalid prefix '{s}': expected addr/len")))?;

    let address = addr
        .parse()
        .map_err(|_| ApiError::bad_request(format!("invalid address '{addr}'")))?;
    let prefix_len = len
        .parse()
        .map_err(|_| ApiError::bad_request(format!("invalid prefix length '{len}'")))?;

    Ok(Destination {
        address,
        prefix_len,
    })
}

// ============================================================================
// System
// ============================================================================

#[derive(Debug, Serialize, Deserialize)]
pub struct VersionResponse {
    pub program: String,
    pub version: String,
    pub build_date: String,
    pub build_directory: String,
}

impl From<VersionInfo> for VersionResponse {
    fn from(info: VersionInfo) -> Self {
        Self {
            program: info.program,
            version: info.version,
            build_date: info.build_date,
            build_directory: info.build_directory,
        }
    }
}

// ============================================================================
// Interfaces
// ============================================================================

#[derive(Debug, Serialize, Deserialize)]
pub struct InterfaceResponse {
    pub sw_if_index: u32,
    pub name: String,
    pub admin_up: bool,
    pub link_up: bool,
    pub mtu: u32,
}

impl From<Interface> for InterfaceResponse {
    fn from(iface: Interface) -> Self {
        Self {
            sw_if_index: iface.sw_if_index,
            name: iface.name,
            admin_up: iface.admin_up,
            link_up: iface.link_up,
            mtu: iface.mtu,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CreateLoopbackResponse {
    pub sw_if_index: u32,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct SetStateRequest {
    pub up: bool,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct AddressRequest {
    /// Address with prefix length, e.g. `192.0.2.1/24`.
    pub address: String,
}

// ============================================================================
// Routes
// ============================================================================

#[derive(Debug, Serialize, Deserialize)]
pub struct NextHopDto {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(default)]
    pub sw_if_index: u32,
    #[serde(default = "default_weight")]
    pub weight: u8,
    #[serde(default)]
    pub drop: bool,
}

fn default_weight() -> u8 {
    1
}

impl NextHopDto {
    fn to_domain(&self) -> Result<NextHop, ApiError> {
        let address = match &self.address {
            Some(addr) => Some(
                addr.parse()
                    .map_err(|_| ApiError::bad_request(format!("invalid next hop '{addr}'")))?,
            ),
            None => None,
        };
        Ok(NextHop {
            address,
            sw_if_index: self.sw_if_index,
            weight: self.weight,
            drop: self.drop,
        })
    }
}

impl From<&NextHop> for NextHopDto {
    fn from(nh: &NextHop) -> Self {
        Self {
            address: nh.address.map(|a| a.to_string()),
            sw_if_index: nh.sw_if_index,
            weight: nh.weight,
            drop: nh.drop,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct RouteRequest {
    /// Destination prefix, e.g. `10.0.0.0/24`.
    pub dst: String,
    #[serde(default)]
    pub vrf: u32,
    pub next_hops: Vec<NextHopDto>,
}

impl RouteRequest {
    pub fn to_domain(&self) -> Result<Route, ApiError> {
        Ok(Route {
            dst: parse_destination(&self.dst)?,
            vrf: self.vrf,
            next_hops: self
                .next_hops
                .iter()
                .map(NextHopDto::to_domain)
                .collect::<Result<_, _>>()?,
        })
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct RouteResponse {
    pub dst: String,
    pub vrf: u32,
    pub next_hops: Vec<NextHopDto>,
}

impl From<Route> for RouteResponse {
    fn from(route: Route) -> Self {
        Self {
            dst: route.dst.to_string(),
            vrf: route.vrf,
            next_hops: route.next_hops.iter().map(NextHopDto::from).collect(),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
pub struct RouteQuery {
    #[serde(default)]
    pub vrf: u32,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct LookupRequest {
    pub dst: String,
    #[serde(default)]
    pub vrf: u32,
}

// ============================================================================
// VRFs
// ============================================================================

#[derive(Debug, Serialize, Deserialize)]
pub struct VrfCreateRequest {
    pub id: u32,
    pub name: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct VrfResponse {
    pub id: u32,
    pub name: String,
    pub ipv4: bool,
    pub ipv6: bool,
    pub route_count: u32,
}

impl From<Vrf> for VrfResponse {
    fn from(vrf: Vrf) -> Self {
        Self {
            id: vrf.id,
            name: vrf.name,
            ipv4: vrf.ipv4,
            ipv6: vrf.ipv6,
            route_count: vrf.route_count,
        }
    }
}

// ============================================================================
// ACLs
// ============================================================================

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AclActionDto {
    Deny,
    Permit,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct AclRuleDto {
    pub action: AclActionDto,
    #[serde(default)]
    pub proto: u8,
    pub src: String,
    pub dst: String,
    #[serde(default)]
    pub src_port_low: u16,
    #[serde(default = "default_port_high")]
    pub src_port_high: u16,
    #[serde(default)]
    pub dst_port_low: u16,
    #[serde(default = "default_port_high")]
    pub dst_port_high: u16,
    #[serde(default)]
    pub tcp_flags_mask: u8,
    #[serde(default)]
    pub tcp_flags_value: u8,
}

fn default_port_high() -> u16 {
    u16::MAX
}

impl AclRuleDto {
    pub fn to_domain(&self) -> Result<AclRule, ApiError> {
        Ok(AclRule {
            action: match self.action {
                AclActionDto::Deny => AclAction::Deny,
                AclActionDto::Permit => AclAction::Permit,
            },
            proto: self.proto,
            src: parse_destination(&self.src)?,
            dst: parse_destination(&self.dst)?,
            src_port_low: self.src_port_low,
            src_port_high: self.src_port_high,
            dst_port_low: self.dst_port_low,
            dst_port_high: self.dst_port_high,
            tcp_flags_mask: self.tcp_flags_mask,
            tcp_flags_value: self.tcp_flags_value,
        })
    }
}

impl From<&AclRule> for AclRuleDto {
    fn from(rule: &AclRule) -> Self {
        Self {
            action: match rule.action {
                AclAction::Deny => AclActionDto::Deny,
                AclAction::Permit => AclActionDto::Permit,
            },
            proto: rule.proto,
            src: rule.src.to_string(),
            dst: rule.dst.to_string(),
            src_port_low: rule.src_port_low,
            src_port_high: rule.src_port_high,
            dst_port_low: rule.dst_port_low,
            dst_port_high: rule.dst_port_high,
            tcp_flags_mask: rule.tcp_flags_mask,
            tcp_flags_value: rule.tcp_flags_value,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct AclCreateRequest {
    pub name: String,
    pub rules: Vec<AclRuleDto>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct AclUpdateRequest {
    pub rules: Vec<AclRuleDto>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct AclCreateResponse {
    pub id: u32,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct AclResponse {
    pub id: u32,
    pub name: String,
    pub rules: Vec<AclRuleDto>,
}

impl From<AclInfo> for AclResponse {
    fn from(acl: AclInfo) -> Self {
        Self {
            id: acl.id,
            name: acl.name,
            rules: acl.rules.iter().map(AclRuleDto::from).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_destination() {
        let dst = parse_destination("10.0.0.0/24").unwrap();
        assert_eq!(dst.prefix_len, 24);
        assert_eq!(dst.to_string(), "10.0.0.0/24");

        let dst = parse_destination("2001:db8::/32").unwrap();
        assert_eq!(dst.prefix_len, 32);
    }

    #[test]
    fn test_parse_destination_rejects_garbage() {
        assert!(parse_destination("10.0.0.0").is_err());
        assert!(parse_destination("not-an-ip/24").is_err());
        assert!(parse_destination("10.0.0.0/many").is_err());
    }

    #[test]
    fn test_route_request_to_domain() {
        let req = RouteRequest {
            dst: "10.0.0.0/24".into(),
            vrf: 3,
            next_hops: vec![NextHopDto {
                address: Some("192.0.2.1".into()),
                sw_if_index: 1,
                weight: 1,
                drop: false,
            }],
        };
        let route = req.to_domain().unwrap();
        assert_eq!(route.vrf, 3);
        assert_eq!(route.next_hops[0].address.unwrap().to_string(), "192.0.2.1");
    }

    #[test]
    fn test_route_request_invalid_next_hop() {
        let req = RouteRequest {
            dst: "10.0.0.0/24".into(),
            vrf: 0,
            next_hops: vec![NextHopDto {
                address: Some("bogus".into()),
                sw_if_index: 0,
                weight: 1,
                drop: false,
            }],
        };
        assert!(req.to_domain().is_err());
    }

    #[test]
    fn test_acl_rule_dto_roundtrip() {
        let dto = AclRuleDto {
            action: AclActionDto::Permit,
            proto: 6,
            src: "10.0.0.0/8".into(),
            dst: "0.0.0.0/0".into(),
            src_port_low: 0,
            src_port_high: 65535,
            dst_port_low: 443,
            dst_port_high: 443,
            tcp_flags_mask: 0,
            tcp_flags_value: 0,
        };
        let rule = dto.to_domain().unwrap();
        assert_eq!(rule.dst_port_low, 443);

        let back = AclRuleDto::from(&rule);
        assert_eq!(back.src, "10.0.0.0/8");
    }
}
