//! Request handlers, grouped by API surface.

pub mod acl;
pub mod info;
pub mod interfaces;
pub mod ip;
