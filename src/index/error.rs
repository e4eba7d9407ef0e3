//! Index build errors.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Failures while building a [`super::FingerprintIndex`].
///
/// Root errors are always fatal. `Read` and `Walk` are subject to
/// [`super::ReadErrorPolicy`].
#[derive(Debug, Error)]
pub enum IndexError {
    #[error("asset root `{}` does not exist", .0.display())]
    MissingRoot(PathBuf),

    #[error("asset root `{}` is not a directory", .0.display())]
    NotADirectory(PathBuf),

    #[error("asset root `{}` is not readable", .0.display())]
    UnreadableRoot(PathBuf, #[source] io::Error),

    #[error("failed to read `{}`", .0.display())]
    Read(PathBuf, #[source] io::Error),

    #[error("failed to walk asset directory")]
    Walk(#[from] jwalk::Error),
}
