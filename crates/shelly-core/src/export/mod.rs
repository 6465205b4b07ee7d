//! Export output directory
//!
//! Export artifacts are produced elsewhere; this module only decides which
//! paths a download or a writer may touch.

mod confine;

pub use confine::{ExportRoot, PathError};
