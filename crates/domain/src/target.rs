//! Permission targets.
//!
//! A permission applies either to the acting user themselves or to somebody
//! else. `All` is a request-side shorthand for both and is never stored; the
//! storable subset is [`GrantTarget`].

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::DomainError;

/// Audience of a permission as requested by a caller.
///
/// Deserialization goes through [`FromStr`], so `"Self"`, `" ALL "` and
/// `"own"` are all accepted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", try_from = "String")]
pub enum PermissionTarget {
    /// Acting on oneself.
    #[serde(rename = "self")]
    Own,
    /// Acting on someone else.
    Other,
    /// Both `Own` and `Other`.
    All,
}

impl PermissionTarget {
    /// The storable targets this target covers, `Own` first.
    pub fn expand(self) -> &'static [GrantTarget] {
        match self {
            Self::Own => &[GrantTarget::Own],
            Self::Other => &[GrantTarget::Other],
            Self::All => &[GrantTarget::Own, GrantTarget::Other],
        }
    }

    pub fn is_composite(self) -> bool {
        matches!(self, Self::All)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Own => "self",
            Self::Other => "other",
            Self::All => "all",
        }
    }
}

impl fmt::Display for PermissionTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PermissionTarget {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "self" | "own" => Ok(Self::Own),
            "other" => Ok(Self::Other),
            "all" => Ok(Self::All),
            other => Err(DomainError::parse(format!(
                "Unknown permission target: {}",
                other
            ))),
        }
    }
}

impl TryFrom<String> for PermissionTarget {
    type Error = DomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<GrantTarget> for PermissionTarget {
    fn from(value: GrantTarget) -> Self {
        match value {
            GrantTarget::Own => Self::Own,
            GrantTarget::Other => Self::Other,
        }
    }
}

/// Target of a stored grant record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GrantTarget {
    #[serde(rename = "self")]
    Own,
    Other,
}

impl GrantTarget {
    /// Narrow a requested target to a storable one.
    ///
    /// # Panics
    ///
    /// Panics if `target` is [`PermissionTarget::All`]. Composite targets
    /// must be expanded before they reach record-level operations.
    pub fn expect_concrete(target: PermissionTarget) -> Self {
        match Self::try_from(target) {
            Ok(target) => target,
            Err(e) => panic!("{e}"),
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Own => "self",
            Self::Other => "other",
        }
    }
}

impl TryFrom<PermissionTarget> for GrantTarget {
    type Error = DomainError;

    fn try_from(value: PermissionTarget) -> Result<Self, Self::Error> {
        match value {
            PermissionTarget::Own => Ok(Self::Own),
            PermissionTarget::Other => Ok(Self::Other),
            PermissionTarget::All => Err(DomainError::invalid_target(
                "the composite target 'all' cannot be stored",
            )),
        }
    }
}

impl fmt::Display for GrantTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for GrantTarget {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "self" => Ok(Self::Own),
            "other" => Ok(Self::Other),
            other => Err(DomainError::parse(format!("Unknown grant target: {}", other))),
        }
    }
}
