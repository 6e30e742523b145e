//! Engine configuration from environment variables.

use crate::entities::grants::DEFAULT_MAX_CREATE_ATTEMPTS;

const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_PORT: u16 = 3000;
const DEFAULT_GRANTS_DB: &str = "permissions.db";

/// Where grant records are stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GrantStoreKind {
    Sqlite { path: String },
    /// Process-local; everything is lost on restart.
    Memory,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineConfig {
    pub server_host: String,
    pub server_port: u16,
    pub grant_store: GrantStoreKind,
    pub max_create_attempts: u32,
}

impl EngineConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary variable source. Unparseable values fall back to defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let server_host = lookup("SERVER_HOST").unwrap_or_else(|| DEFAULT_HOST.into());
        let server_port = lookup("SERVER_PORT")
            .or_else(|| lookup("PORT"))
            .and_then(|v| v.trim().parse().ok())
            .unwrap_or(DEFAULT_PORT);

        let grant_store = match lookup("GRANT_STORE")
            .map(|v| v.trim().to_ascii_lowercase())
            .as_deref()
        {
            Some("memory") => GrantStoreKind::Memory,
            Some("sqlite") | None => GrantStoreKind::Sqlite {
                path: lookup("GRANTS_DB").unwrap_or_else(|| DEFAULT_GRANTS_DB.into()),
            },
            Some(other) => {
                tracing::warn!(value = %other, "Unknown GRANT_STORE, using sqlite");
                GrantStoreKind::Sqlite {
                    path: lookup("GRANTS_DB").unwrap_or_else(|| DEFAULT_GRANTS_DB.into()),
                }
            }
        };

        let max_create_attempts = lookup("GRANT_CREATE_ATTEMPTS")
            .and_then(|v| v.trim().parse().ok())
            .filter(|&n: &u32| n > 0)
            .unwrap_or(DEFAULT_MAX_CREATE_ATTEMPTS);

        Self {
            server_host,
            server_port,
            grant_store,
            max_create_attempts,
        }
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.server_host, self.server_port)
    }
}
