//! Environment snapshots and secret material
//!
//! - `SecretStore` trait: read-only lookup of named variables
//! - `EnvSecretStore`: snapshot of `SHELLY_*` process variables
//! - `MemorySecretStore`: writable in-memory store
//! - `read_secret_file`: `*_FILE` indirection for mounted secrets
//! - `SecretString`: value wrapper that never prints its contents

mod traits;
mod env_store;
mod memory_store;
mod file;
mod secret;

pub use traits::{SecretStore, SecretInfo, SecretStoreError, SecretStoreResult};
pub use env_store::{EnvSecretStore, ENV_PREFIX};
pub use memory_store::MemorySecretStore;
pub use file::{read_secret_file, FILE_SUFFIX};
pub use secret::{SecretString, REDACTED};
