//! Response types for the permission API.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use ambassador_domain::{GrantRecord, GrantTarget, Permission};

// =============================================================================
// Catalog
// =============================================================================

/// A registered permission as exposed to clients.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PermissionInfo {
    pub key: Uuid,
    pub name: String,
    pub description: String,
    pub granted_to_self_by_default: bool,
    pub granted_to_others_by_default: bool,
}

impl From<&Permission> for PermissionInfo {
    fn from(permission: &Permission) -> Self {
        let default_grant = permission.default_grant();
        Self {
            key: permission.key().to_uuid(),
            name: permission.name().to_string(),
            description: permission.description().to_string(),
            granted_to_self_by_default: default_grant.own,
            granted_to_others_by_default: default_grant.other,
        }
    }
}

// =============================================================================
// Grants
// =============================================================================

/// A stored grant record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GrantInfo {
    pub permission: Uuid,
    /// Friendly name, absent when the key is no longer registered.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub permission_name: Option<String>,
    pub target: GrantTarget,
    pub is_granted: bool,
}

impl GrantInfo {
    pub fn from_record(record: &GrantRecord, permission: Option<&Permission>) -> Self {
        Self {
            permission: record.permission.to_uuid(),
            permission_name: permission.map(|p| p.name().to_string()),
            target: record.target,
            is_granted: record.is_granted,
        }
    }
}

// =============================================================================
// Errors
// =============================================================================

/// Error classification codes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    // === Client Errors (4xx) ===
    /// Request was malformed or invalid
    BadRequest,
    /// Caller lacks the permission
    PermissionDenied,
    /// Named permission is not registered
    UnknownPermission,
    /// The grant already has the requested value
    AlreadyGranted,
    /// The grant is already revoked
    AlreadyRevoked,

    // === Server Errors (5xx) ===
    /// Internal server error
    InternalError,

    /// Unknown variant for forward compatibility
    #[serde(other)]
    Unknown,
}

/// Error body returned by every failing endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub code: ErrorCode,
    /// Human-readable message, safe to show to end users.
    pub message: String,
}

impl ErrorResponse {
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_error_codes_deserialize_to_unknown() {
        let body: ErrorResponse =
            serde_json::from_str(r#"{"code":"rate_limited","message":"slow down"}"#)
                .expect("deserialize");
        assert_eq!(body.code, ErrorCode::Unknown);
    }

    #[test]
    fn permission_info_copies_default_policy() {
        let permission = ambassador_domain::builtin::all()
            .into_iter()
            .next()
            .expect("builtin permission");
        let info = PermissionInfo::from(&permission);
        assert_eq!(info.name, "CreateCharacter");
        assert!(info.granted_to_self_by_default);
        assert!(!info.granted_to_others_by_default);
    }
}
