//! # dpctl-core
//!
//! Control-plane services for dpctl.
//!
//! This crate provides:
//! - The domain model (routes, next hops, VRFs, ACLs, interfaces)
//! - Pure domain⇄wire converters
//! - The VRF cache and the route/VRF, interface, ACL and info services

pub mod acl;
pub mod convert;
pub mod domain;
pub mod error;
pub mod info;
pub mod interfaces;
pub mod ip;
pub mod vrf_cache;

pub use acl::AclService;
pub use convert::ConvertError;
pub use error::CoreError;
pub use info::InfoService;
pub use interfaces::InterfaceService;
pub use ip::IpService;
pub use vrf_cache::VrfCache;
