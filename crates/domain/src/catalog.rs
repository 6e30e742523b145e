//! Permission catalog.
//!
//! Built once at startup and handed to the engine by reference. Lookups by
//! friendly name are case-insensitive, matching how users type them in chat.

use std::collections::HashMap;

use crate::builtin;
use crate::error::DomainError;
use crate::ids::PermissionKey;
use crate::permission::Permission;

/// Registry of every permission the engine knows about.
#[derive(Debug, Clone, Default)]
pub struct PermissionCatalog {
    permissions: Vec<Permission>,
    by_key: HashMap<PermissionKey, usize>,
}

impl PermissionCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Catalog preloaded with the bot's built-in permissions.
    pub fn builtin() -> Self {
        let mut catalog = Self::new();
        for permission in builtin::all() {
            let registered = catalog.register(permission);
            debug_assert!(registered.is_ok(), "built-in permission clash: {registered:?}");
        }
        catalog
    }

    /// Register a permission, making it available to the engine.
    pub fn register(&mut self, permission: Permission) -> Result<&Permission, DomainError> {
        if self.by_key.contains_key(&permission.key()) {
            return Err(DomainError::DuplicateKey(permission.key()));
        }

        if self.find_by_name(permission.name()).is_some() {
            return Err(DomainError::DuplicateName(permission.name().to_string()));
        }

        let index = self.permissions.len();
        self.by_key.insert(permission.key(), index);
        self.permissions.push(permission);
        Ok(&self.permissions[index])
    }

    pub fn get(&self, key: PermissionKey) -> Option<&Permission> {
        self.by_key.get(&key).map(|&index| &self.permissions[index])
    }

    pub fn find_by_name(&self, name: &str) -> Option<&Permission> {
        let name = name.trim();
        self.permissions
            .iter()
            .find(|p| p.name().eq_ignore_ascii_case(name))
    }

    /// Registered permissions in registration order.
    pub fn iter(&self) -> impl Iterator<Item = &Permission> {
        self.permissions.iter()
    }

    pub fn len(&self) -> usize {
        self.permissions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.permissions.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::permission::DefaultGrant;

    fn kick() -> Permission {
        Permission::new(PermissionKey::from_u128(0x10), "Kick", "Kick members")
    }

    #[test]
    fn registers_and_looks_up_by_key_and_name() {
        let mut catalog = PermissionCatalog::new();
        catalog.register(kick()).expect("register");

        let by_key = catalog.get(PermissionKey::from_u128(0x10)).expect("by key");
        assert_eq!(by_key.name(), "Kick");
        assert_eq!(catalog.find_by_name("kICK").map(Permission::key), Some(by_key.key()));
        assert!(catalog.find_by_name("Ban").is_none());
    }

    #[test]
    fn rejects_duplicate_keys() {
        let mut catalog = PermissionCatalog::new();
        catalog.register(kick()).expect("register");

        let clash = Permission::new(PermissionKey::from_u128(0x10), "Ban", "");
        assert_eq!(
            catalog.register(clash),
            Err(DomainError::DuplicateKey(PermissionKey::from_u128(0x10)))
        );
        assert_eq!(catalog.len(), 1);
    }

    #[test]
    fn rejects_duplicate_names_regardless_of_case() {
        let mut catalog = PermissionCatalog::new();
        catalog.register(kick()).expect("register");

        let clash = Permission::new(PermissionKey::from_u128(0x11), "KICK", "")
            .with_default(DefaultGrant::GRANT_ALL);
        assert!(matches!(
            catalog.register(clash),
            Err(DomainError::DuplicateName(_))
        ));
    }

    #[test]
    fn builtin_keys_and_names_are_unique() {
        let mut catalog = PermissionCatalog::new();
        for permission in builtin::all() {
            let name = permission.name().to_string();
            catalog
                .register(permission)
                .unwrap_or_else(|e| panic!("{name} clashes: {e}"));
        }
    }

    #[test]
    fn builtin_catalog_registers_every_builtin() {
        let catalog = PermissionCatalog::builtin();
        assert_eq!(catalog.len(), builtin::all().len());
        assert!(catalog.find_by_name("editcharacter").is_some());
    }
}
