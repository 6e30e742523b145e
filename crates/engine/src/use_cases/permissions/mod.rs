//! Permission use cases.
//!
//! Writes (grant, revoke) and reads (check) treat the composite `All` target
//! differently: a write on `All` succeeds when either half succeeds, a check
//! on `All` succeeds only when both halves do.

mod check;
mod grant;
mod list;
mod revoke;


use std::sync::Arc;

use ambassador_domain::{GrantScope, Permission, PermissionTarget, ScopeKind};

use crate::entities::Grants;
use crate::infrastructure::ports::RepoError;

pub use check::CheckPermission;
pub use grant::GrantPermission;
pub use list::ListGrants;
pub use revoke::RevokePermission;

/// Container for permission use cases.
pub struct PermissionUseCases {
    pub grant: Arc<GrantPermission>,
    pub revoke: Arc<RevokePermission>,
    pub check: Arc<CheckPermission>,
    pub list: Arc<ListGrants>,
}

impl PermissionUseCases {
    pub fn new(grants: Arc<Grants>) -> Self {
        Self {
            grant: Arc::new(GrantPermission::new(grants.clone())),
            revoke: Arc::new(RevokePermission::new(grants.clone())),
            check: Arc::new(CheckPermission::new(grants.clone())),
            list: Arc::new(ListGrants::new(grants)),
        }
    }
}

/// Errors that can occur during permission operations.
///
/// All variants except `Repo` are expected outcomes whose message is shown to
/// end users as-is.
#[derive(Debug, thiserror::Error)]
pub enum PermissionError {
    #[error("The {0} already has permission to do that.")]
    AlreadyGranted(ScopeKind),

    #[error("The {0} is already prohibited from doing that.")]
    AlreadyRevoked(ScopeKind),

    #[error("Permission denied.")]
    PermissionDenied,

    #[error("No permission named \"{0}\" has been registered.")]
    UnknownPermission(String),

    #[error("Repository error: {0}")]
    Repo(#[from] RepoError),
}

impl PermissionError {
    /// Whether the error is a business outcome rather than an infrastructure failure.
    pub fn is_user_facing(&self) -> bool {
        !matches!(self, Self::Repo(_))
    }
}

/// Set one target of a grant record to `granted`.
async fn set_grant(
    grants: &Grants,
    scope: &GrantScope,
    permission: &Permission,
    target: PermissionTarget,
    granted: bool,
) -> Result<(), PermissionError> {
    let mut record = grants.get_or_create(scope, permission, target).await?;

    if record.is_granted == granted {
        return Err(if granted {
            PermissionError::AlreadyGranted(scope.kind())
        } else {
            PermissionError::AlreadyRevoked(scope.kind())
        });
    }

    record.is_granted = granted;
    grants.save(&record).await?;
    Ok(())
}

/// Set every target covered by `target`.
///
/// For `All`, both halves are attempted and the call succeeds if at least one
/// of them did. When both fail, the `Self` error wins.
async fn set_grant_for_target(
    grants: &Grants,
    scope: &GrantScope,
    permission: &Permission,
    target: PermissionTarget,
    granted: bool,
) -> Result<(), PermissionError> {
    if !target.is_composite() {
        return set_grant(grants, scope, permission, target, granted).await;
    }

    let own = set_grant(grants, scope, permission, PermissionTarget::Own, granted).await;
    let other = set_grant(grants, scope, permission, PermissionTarget::Other, granted).await;

    match (own, other) {
        (Ok(()), Ok(())) => Ok(()),
        (Ok(()), Err(e)) | (Err(e), Ok(())) => {
            tracing::debug!(
                scope = %scope,
                permission = %permission.name(),
                error = %e,
                "Composite target only partially applied"
            );
            Ok(())
        }
        (Err(own), Err(_)) => Err(own),
    }
}
