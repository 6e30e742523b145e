//! Built-in permissions of the bot's feature plugins.

use crate::ids::PermissionKey;
use crate::permission::{DefaultGrant, Permission};

// Characters
pub const CREATE_CHARACTER: PermissionKey =
    PermissionKey::from_u128(0x0b5e_91f4_3c6a_4e0e_9d2f_1a7c_5b80_0001);
pub const EDIT_CHARACTER: PermissionKey =
    PermissionKey::from_u128(0x0b5e_91f4_3c6a_4e0e_9d2f_1a7c_5b80_0002);
pub const DELETE_CHARACTER: PermissionKey =
    PermissionKey::from_u128(0x0b5e_91f4_3c6a_4e0e_9d2f_1a7c_5b80_0003);
pub const ASSUME_CHARACTER: PermissionKey =
    PermissionKey::from_u128(0x0b5e_91f4_3c6a_4e0e_9d2f_1a7c_5b80_0004);
pub const TRANSFER_CHARACTER: PermissionKey =
    PermissionKey::from_u128(0x0b5e_91f4_3c6a_4e0e_9d2f_1a7c_5b80_0005);

// Roleplaying
pub const START_STOP_ROLEPLAY: PermissionKey =
    PermissionKey::from_u128(0x0b5e_91f4_3c6a_4e0e_9d2f_1a7c_5b80_0101);
pub const EDIT_ROLEPLAY: PermissionKey =
    PermissionKey::from_u128(0x0b5e_91f4_3c6a_4e0e_9d2f_1a7c_5b80_0102);

// Transformations
pub const TRANSFORM: PermissionKey =
    PermissionKey::from_u128(0x0b5e_91f4_3c6a_4e0e_9d2f_1a7c_5b80_0201);
pub const SET_DEFAULT_APPEARANCE: PermissionKey =
    PermissionKey::from_u128(0x0b5e_91f4_3c6a_4e0e_9d2f_1a7c_5b80_0202);

// Dossiers
pub const EDIT_DOSSIER: PermissionKey =
    PermissionKey::from_u128(0x0b5e_91f4_3c6a_4e0e_9d2f_1a7c_5b80_0301);

/// Every built-in permission, in registration order.
pub fn all() -> Vec<Permission> {
    vec![
        Permission::new(
            CREATE_CHARACTER,
            "CreateCharacter",
            "Allows you to create characters.",
        )
        .with_default(DefaultGrant::SELF_ONLY),
        Permission::new(
            EDIT_CHARACTER,
            "EditCharacter",
            "Allows you to edit characters.",
        )
        .with_default(DefaultGrant::SELF_ONLY),
        Permission::new(
            DELETE_CHARACTER,
            "DeleteCharacter",
            "Allows you to delete characters.",
        )
        .with_default(DefaultGrant::SELF_ONLY),
        Permission::new(
            ASSUME_CHARACTER,
            "AssumeCharacter",
            "Allows you to assume characters as your current persona.",
        )
        .with_default(DefaultGrant::SELF_ONLY),
        Permission::new(
            TRANSFER_CHARACTER,
            "TransferCharacter",
            "Allows you to transfer ownership of characters.",
        )
        .with_default(DefaultGrant::SELF_ONLY),
        Permission::new(
            START_STOP_ROLEPLAY,
            "StartStopRoleplay",
            "Allows you to start and stop roleplays.",
        )
        .with_default(DefaultGrant::SELF_ONLY),
        Permission::new(
            EDIT_ROLEPLAY,
            "EditRoleplay",
            "Allows you to edit roleplays.",
        )
        .with_default(DefaultGrant::SELF_ONLY),
        Permission::new(
            TRANSFORM,
            "Transform",
            "Allows you to transform characters.",
        )
        .with_default(DefaultGrant::SELF_ONLY),
        Permission::new(
            SET_DEFAULT_APPEARANCE,
            "SetDefaultAppearance",
            "Allows you to set the default appearance of characters.",
        )
        .with_default(DefaultGrant::SELF_ONLY),
        Permission::new(
            EDIT_DOSSIER,
            "EditDossier",
            "Allows you to add, edit, and delete dossiers.",
        ),
    ]
}
