//! Process-wide admin API key with in-place rotation
//!
//! One `AdminKey` is shared (behind `Arc`) by every handler that checks the
//! key: API, WebSocket, export and import. Reads clone an `Arc<str>` under a
//! read lock, so no reader can see a partially written key. Rotation
//! verifies the presented key and swaps inside a single write critical
//! section, so two concurrent rotations cannot both succeed with the same
//! old key.

use std::sync::Arc;

use parking_lot::RwLock;
use rand::RngCore;
use subtle::ConstantTimeEq;
use thiserror::Error;

use crate::secrets::SecretString;

/// Shortest key accepted by [`AdminKey::rotate`]
pub const MIN_ADMIN_KEY_LEN: usize = 16;
/// Longest key accepted by [`AdminKey::rotate`]
pub const MAX_ADMIN_KEY_LEN: usize = 512;

/// Why a presented key was not accepted
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AuthError {
    #[error("admin API key is not configured")]
    NotConfigured,

    #[error("missing admin API key")]
    Missing,

    #[error("invalid admin API key")]
    Invalid,
}

/// Why a rotation was refused; the active key is unchanged in every case
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RotationError {
    #[error(transparent)]
    Unauthorized(#[from] AuthError),

    #[error("new admin key must be at least 16 bytes")]
    TooShort,

    #[error("new admin key must be at most 512 bytes")]
    TooLong,

    #[error("new admin key must not contain whitespace or control characters")]
    InvalidCharacters,

    #[error("new admin key must differ from the current key")]
    Unchanged,
}

/// Outcome of a successful rotation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rotation {
    /// Generation now in effect (the initial key is generation 0)
    pub generation: u64,
}

#[derive(Debug)]
struct KeyState {
    // Empty when unconfigured
    value: Arc<str>,
    generation: u64,
}

/// Shared, rotatable admin key
pub struct AdminKey {
    state: RwLock<KeyState>,
}

impl AdminKey {
    /// Seed from configuration; `None` disables every admin operation
    pub fn new(initial: Option<&SecretString>) -> Self {
        let value: Arc<str> = initial.map(|k| k.expose()).unwrap_or_default().into();
        Self {
            state: RwLock::new(KeyState {
                value,
                generation: 0,
            }),
        }
    }

    pub fn is_configured(&self) -> bool {
        !self.state.read().value.is_empty()
    }

    pub fn generation(&self) -> u64 {
        self.state.read().generation
    }

    /// Snapshot of the active key
    pub fn current(&self) -> Option<SecretString> {
        let value = Arc::clone(&self.state.read().value);
        (!value.is_empty()).then(|| SecretString::new(&*value))
    }

    /// Check a key presented by a caller
    pub fn verify(&self, presented: Option<&str>) -> Result<(), AuthError> {
        let current = Arc::clone(&self.state.read().value);
        check(&current, presented)
    }

    /// Replace the key, provided the caller presents the current one
    ///
    /// After this returns `Ok`, every later [`verify`](Self::verify) sees the
    /// new key and the old key is rejected.
    pub fn rotate(&self, presented: Option<&str>, new_key: &str) -> Result<Rotation, RotationError> {
        let mut state = self.state.write();
        check(&state.value, presented)?;
        validate_new_key(new_key)?;
        if constant_time_eq(&state.value, new_key) {
            return Err(RotationError::Unchanged);
        }
        state.value = Arc::from(new_key);
        state.generation += 1;
        Ok(Rotation {
            generation: state.generation,
        })
    }
}

impl std::fmt::Debug for AdminKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.state.read();
        f.debug_struct("AdminKey")
            .field("configured", &!state.value.is_empty())
            .field("generation", &state.generation)
            .finish()
    }
}

/// Generate a random 256-bit key, hex encoded
pub fn generate_admin_key() -> String {
    let mut bytes = [0u8; 32];
    rand::thread_rng().fill_bytes(&mut bytes);
    hex::encode(bytes)
}

/// Validate a proposed admin key without touching any state
pub fn validate_new_key(candidate: &str) -> Result<(), RotationError> {
    if candidate.len() < MIN_ADMIN_KEY_LEN {
        return Err(RotationError::TooShort);
    }
    if candidate.len() > MAX_ADMIN_KEY_LEN {
        return Err(RotationError::TooLong);
    }
    if candidate.chars().any(|c| c.is_whitespace() || c.is_control()) {
        return Err(RotationError::InvalidCharacters);
    }
    Ok(())
}

fn check(current: &str, presented: Option<&str>) -> Result<(), AuthError> {
    if current.is_empty() {
        return Err(AuthError::NotConfigured);
    }
    let presented = match presented {
        Some(p) if !p.is_empty() => p,
        _ => return Err(AuthError::Missing),
    };
    if constant_time_eq(current, presented) {
        Ok(())
    } else {
        Err(AuthError::Invalid)
    }
}

fn constant_time_eq(a: &str, b: &str) -> bool {
    a.as_bytes().ct_eq(b.as_bytes()).into()
}
