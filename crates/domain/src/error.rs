//! Unified error type for the domain layer.

use thiserror::Error;

use crate::ids::PermissionKey;

/// Unified error type for domain operations
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// A composite target was used where only a storable one is allowed
    #[error("Invalid permission target: {0}")]
    InvalidTarget(String),

    /// A permission with the same key is already in the catalog
    #[error("A permission with the identifier {0} has already been registered")]
    DuplicateKey(PermissionKey),

    /// A permission with the same friendly name is already in the catalog
    #[error("A permission named \"{0}\" has already been registered")]
    DuplicateName(String),

    /// Parse error (for value objects)
    #[error("Parse error: {0}")]
    Parse(String),
}

impl DomainError {
    pub fn invalid_target(msg: impl Into<String>) -> Self {
        Self::InvalidTarget(msg.into())
    }

    /// Creates a parse error for string-to-type conversion failures.
    ///
    /// # Example
    /// ```ignore
    /// impl FromStr for GrantTarget {
    ///     type Err = DomainError;
    ///     fn from_str(s: &str) -> Result<Self, Self::Err> {
    ///         match s {
    ///             "self" => Ok(Self::Own),
    ///             _ => Err(DomainError::parse(format!("Unknown grant target: {}", s))),
    ///         }
    ///     }
    /// }
    /// ```
    pub fn parse(msg: impl Into<String>) -> Self {
        Self::Parse(msg.into())
    }
}
