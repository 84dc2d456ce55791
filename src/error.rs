use std::io;
use std::path::PathBuf;

use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
  #[error("not an existing directory: {}", path.display())]
  InvalidPath { path: PathBuf },

  #[error("already exists: {}", path.display())]
  AlreadyExists { path: PathBuf },

  #[error("not found: {}", path.display())]
  NotFound { path: PathBuf },

  #[error("invalid name: {name:?}")]
  InvalidName { name: String },

  #[error("copy {} -> {} failed: {source}", src.display(), dest.display())]
  Copy {
    src: PathBuf,
    dest: PathBuf,
    source: io::Error,
  },

  #[error("permission denied: {}", path.display())]
  PermissionDenied { path: PathBuf },

  #[error("exit search to perform this action")]
  SearchActive,

  #[error(transparent)]
  Io(#[from] io::Error),
}

impl Error {
  /// Wrap an io error, promoting permission failures so callers can
  /// tell them apart from the generic case.
  pub fn from_io(err: io::Error, path: &std::path::Path) -> Self {
    if err.kind() == io::ErrorKind::PermissionDenied {
      Error::PermissionDenied { path: path.to_path_buf() }
    } else {
      Error::Io(err)
    }
  }
}
