//! Path utilities.
//!
//! Pure functions for path manipulation. No side effects.
//!
//! - [`fs`]: Filesystem path normalization (`normalize_path`)
//! - [`route`]: Slash-separated relative paths (`to_slash_path`)

pub mod fs;
pub mod route;

pub use fs::normalize_path;
pub use route::to_slash_path;
