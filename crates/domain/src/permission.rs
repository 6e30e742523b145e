//! Permission definitions.

use serde::{Deserialize, Serialize};

use crate::ids::PermissionKey;
use crate::target::GrantTarget;

/// Decision used when no explicit grant record exists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DefaultGrant {
    pub own: bool,
    pub other: bool,
}

impl DefaultGrant {
    pub const DENY_ALL: Self = Self {
        own: false,
        other: false,
    };

    pub const GRANT_ALL: Self = Self {
        own: true,
        other: true,
    };

    pub const SELF_ONLY: Self = Self {
        own: true,
        other: false,
    };

    pub fn is_granted_to(&self, target: GrantTarget) -> bool {
        match target {
            GrantTarget::Own => self.own,
            GrantTarget::Other => self.other,
        }
    }
}

/// A registered capability.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Permission {
    key: PermissionKey,
    name: String,
    description: String,
    default_grant: DefaultGrant,
}

impl Permission {
    /// Create a permission that nobody holds by default.
    pub fn new(key: PermissionKey, name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            key,
            name: name.into(),
            description: description.into(),
            default_grant: DefaultGrant::DENY_ALL,
        }
    }

    pub fn with_default(mut self, default_grant: DefaultGrant) -> Self {
        self.default_grant = default_grant;
        self
    }

    pub fn key(&self) -> PermissionKey {
        self.key
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn default_grant(&self) -> DefaultGrant {
        self.default_grant
    }

    pub fn is_granted_by_default_to(&self, target: GrantTarget) -> bool {
        self.default_grant.is_granted_to(target)
    }
}
