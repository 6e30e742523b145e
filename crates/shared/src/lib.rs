//! Ambassador Shared - Wire types for the permission service
//!
//! Request and response bodies exchanged with the HTTP API. The bot's command
//! layer (or any other client) speaks these types.
//!
//! # Design Principles
//!
//! 1. **Minimal dependencies** - Only serde and uuid
//! 2. **No business logic** - Pure data types and serialization
//! 3. **Raw IDs** - platform IDs travel as plain `u64`, permission keys as `Uuid`

pub mod requests;
pub mod responses;

pub use requests::{CheckPermissionRequest, ModifyPermissionRequest};
pub use responses::{ErrorCode, ErrorResponse, GrantInfo, PermissionInfo};
