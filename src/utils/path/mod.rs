//! Path utilities.
//!
//! - [`fs`]: Filesystem path normalization and relative prefixes
//!   (`normalize_path`, `relative_path`, `root_prefix`)

pub mod fs;

pub use fs::{normalize_path, relative_path, root_prefix};
