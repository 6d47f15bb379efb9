//! Service-level errors and remote status mapping.

use crate::convert::ConvertError;
use dpctl_client::ClientError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("VRF {id} not found")]
    VrfNotFound { id: u32 },

    #[error("{what} not found")]
    NotFound { what: String },

    #[error("{what} already exists")]
    AlreadyExists { what: String },

    #[error("invalid input: {reason}")]
    InvalidInput { reason: String },

    #[error("conversion failed: {0}")]
    Convert(#[from] ConvertError),

    #[error("dataplane request failed: {0}")]
    Dataplane(#[from] ClientError),

    /// A two-phase operation with one or more failed phases; each entry
    /// names the address family that failed.
    #[error("{op} VRF {id} failed: {}", format_phases(.errors))]
    TwoPhase {
        op: &'static str,
        id: u32,
        errors: Vec<(&'static str, ClientError)>,
    },
}

fn format_phases(errors: &[(&'static str, ClientError)]) -> String {
    errors
        .iter()
        .map(|(family, err)| format!("{family}: {err}"))
        .collect::<Vec<_>>()
        .join("; ")
}

/// Maps a remote rejection onto a domain outcome by status code; anything
/// that is not a classified remote status stays a dataplane failure.
pub(crate) fn map_remote(what: impl Into<String>, err: ClientError) -> CoreError {
    match err.remote_status() {
        Some(status) if status.is_not_found() => CoreError::NotFound { what: what.into() },
        Some(status) if status.is_already_exists() => CoreError::AlreadyExists { what: what.into() },
        _ => CoreError::Dataplane(err),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dpctl_wire::Status;

    #[test]
    fn test_map_remote_not_found() {
        let err = ClientError::Remote {
            message: "ip_route_lookup_reply",
            status: Status::NO_SUCH_ENTRY,
        };
        assert!(matches!(
            map_remote("route 10.0.0.0/24", err),
            CoreError::NotFound { .. }
        ));
    }

    #[test]
    fn test_map_remote_already_exists() {
        let err = ClientError::Remote {
            message: "sw_interface_add_del_address_reply",
            status: Status::ADDRESS_IN_USE,
        };
        assert!(matches!(
            map_remote("address", err),
            CoreError::AlreadyExists { .. }
        ));
    }

    #[test]
    fn test_map_remote_other_status_stays_dataplane() {
        let err = ClientError::Remote {
            message: "ip_table_add_del_reply",
            status: Status::UNSPECIFIED,
        };
        assert!(matches!(map_remote("vrf", err), CoreError::Dataplane(_)));
    }

    #[test]
    fn test_map_remote_transport_error_stays_dataplane() {
        let err = ClientError::Connection(dpctl_client::TransportError::Closed);
        assert!(matches!(map_remote("vrf", err), CoreError::Dataplane(_)));
    }

    #[test]
    fn test_two_phase_display_names_families() {
        let err = CoreError::TwoPhase {
            op: "delete",
            id: 7,
            errors: vec![
                (
                    "IPv4",
                    ClientError::Remote {
                        message: "ip_table_add_del_reply",
                        status: Status::NO_SUCH_FIB,
                    },
                ),
                (
                    "IPv6",
                    ClientError::Remote {
                        message: "ip_table_add_del_reply",
                        status: Status::UNSPECIFIED,
                    },
                ),
            ],
        };
        let text = err.to_string();
        assert!(text.contains("delete VRF 7"));
        assert!(text.contains("IPv4: "));
        assert!(text.contains("IPv6: "));
    }
}
