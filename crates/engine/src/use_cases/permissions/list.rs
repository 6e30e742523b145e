//! List grants use case.

use std::sync::Arc;

use ambassador_domain::{GrantRecord, GrantScope, RoleId, ServerId, UserId};

use super::PermissionError;
use crate::entities::Grants;

/// Lists the explicit grant records applicable to a user or a role.
pub struct ListGrants {
    grants: Arc<Grants>,
}

impl ListGrants {
    pub fn new(grants: Arc<Grants>) -> Self {
        Self { grants }
    }

    pub async fn for_user(
        &self,
        server_id: ServerId,
        user_id: UserId,
    ) -> Result<Vec<GrantRecord>, PermissionError> {
        Ok(self.grants.list(&GrantScope::user(server_id, user_id)).await?)
    }

    pub async fn for_role(&self, role_id: RoleId) -> Result<Vec<GrantRecord>, PermissionError> {
        Ok(self.grants.list(&GrantScope::role(role_id)).await?)
    }
}
