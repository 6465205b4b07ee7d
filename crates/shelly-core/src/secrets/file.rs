//! Mounted secret files (`*_FILE` indirection)

use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use super::traits::{SecretStoreError, SecretStoreResult};

/// Suffix marking a variable whose value is a path to the real value
pub const FILE_SUFFIX: &str = "_FILE";

/// Read a secret from a mounted file
///
/// Kubernetes Secret volumes and `docker secret` both mount one value per
/// file. A single trailing `\n` or `\r\n` is stripped, since most tooling
/// that writes these files appends one; any other whitespace is kept.
pub fn read_secret_file(path: impl AsRef<Path>) -> SecretStoreResult<String> {
    let path = path.as_ref();
    if path.as_os_str().is_empty() {
        return Err(SecretStoreError::EmptyPath);
    }

    let display = path.display().to_string();
    let bytes = fs::read(path).map_err(|source| match source.kind() {
        ErrorKind::NotFound => SecretStoreError::NotFound(display.clone()),
        _ => SecretStoreError::Io {
            path: display.clone(),
            source,
        },
    })?;

    let mut content = String::from_utf8(bytes).map_err(|_| SecretStoreError::InvalidUtf8(display))?;
    if content.ends_with('\n') {
        content.pop();
        if content.ends_with('\r') {
            content.pop();
        }
    }
    Ok(content)
}
