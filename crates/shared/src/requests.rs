//! Request bodies for the permission API.

use serde::{Deserialize, Serialize};

use ambassador_domain::PermissionTarget;

/// Body of a grant or revoke request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModifyPermissionRequest {
    pub target: PermissionTarget,
}

/// Body of a permission check.
///
/// A held permission answers `204 No Content`; a missing one answers `403`
/// with an [`ErrorResponse`](crate::ErrorResponse).
///
/// The caller resolves identity on the chat platform and passes it along;
/// `role_ids` must already be in priority order, highest first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckPermissionRequest {
    pub owner_id: u64,
    pub user_id: u64,
    #[serde(default)]
    pub role_ids: Vec<u64>,
    /// Friendly name of the permission, matched case-insensitively.
    pub permission: String,
    pub target: PermissionTarget,
    /// Owner of the entity being acted on, for owner-or-permission checks.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub entity_owner_id: Option<u64>,
}
