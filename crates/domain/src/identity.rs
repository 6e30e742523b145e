//! Identity context supplied by the chat platform integration.

use serde::{Deserialize, Serialize};

use crate::grant::GrantScope;
use crate::ids::{RoleId, ServerId, UserId};

/// The server a request was made on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerContext {
    pub id: ServerId,
    pub owner_id: UserId,
}

impl ServerContext {
    pub fn new(id: ServerId, owner_id: UserId) -> Self {
        Self { id, owner_id }
    }

    pub fn is_owned_by(&self, user_id: UserId) -> bool {
        self.owner_id == user_id
    }
}

/// A user as seen on a server.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Member {
    pub user_id: UserId,
    /// Role IDs in platform priority order, highest priority first.
    pub role_ids: Vec<RoleId>,
}

impl Member {
    pub fn new(user_id: UserId, role_ids: Vec<RoleId>) -> Self {
        Self { user_id, role_ids }
    }

    pub fn scope_on(&self, server_id: ServerId) -> GrantScope {
        GrantScope::user(server_id, self.user_id)
    }
}
