//! Admin API key: shared cell, rotation and header extraction

mod admin_key;
mod header;

pub use admin_key::{
    AdminKey, AuthError, Rotation, RotationError, generate_admin_key, validate_new_key,
    MIN_ADMIN_KEY_LEN, MAX_ADMIN_KEY_LEN,
};
pub use header::{presented_key, API_KEY_HEADER, MAX_AUTH_HEADER_BYTES};
