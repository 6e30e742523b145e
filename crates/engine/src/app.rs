//! Application state and composition.

use std::sync::Arc;

use ambassador_domain::{Permission, PermissionCatalog};

use crate::entities::Grants;
use crate::infrastructure::ports::GrantRepo;
use crate::use_cases::{self, PermissionError};

/// Main application state.
///
/// Holds the permission catalog and use cases.
/// Passed to HTTP handlers via Axum state.
pub struct App {
    pub catalog: Arc<PermissionCatalog>,
    pub use_cases: UseCases,
}

/// Container for all use cases.
pub struct UseCases {
    pub permissions: use_cases::PermissionUseCases,
}

impl App {
    /// Create a new App with all dependencies wired up.
    pub fn new(
        catalog: PermissionCatalog,
        grant_repo: Arc<dyn GrantRepo>,
        max_create_attempts: u32,
    ) -> Self {
        let grants =
            Arc::new(Grants::new(grant_repo).with_max_create_attempts(max_create_attempts));

        Self {
            catalog: Arc::new(catalog),
            use_cases: UseCases {
                permissions: use_cases::PermissionUseCases::new(grants),
            },
        }
    }

    /// Look up a registered permission by its friendly name.
    pub fn permission(&self, name: &str) -> Result<&Permission, PermissionError> {
        self.catalog
            .find_by_name(name)
            .ok_or_else(|| PermissionError::UnknownPermission(name.trim().to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::memory::InMemoryGrantRepo;

    #[test]
    fn permission_lookup_ignores_case() {
        let app = App::new(
            PermissionCatalog::builtin(),
            Arc::new(InMemoryGrantRepo::new()),
            3,
        );

        let permission = app.permission("createcharacter").expect("registered");
        assert_eq!(permission.name(), "CreateCharacter");
    }

    #[test]
    fn unknown_names_are_reported() {
        let app = App::new(
            PermissionCatalog::builtin(),
            Arc::new(InMemoryGrantRepo::new()),
            3,
        );

        let err = app.permission(" Fly ").expect_err("not registered");
        assert_eq!(err.to_string(), "No permission named \"Fly\" has been registered.");
    }
}
