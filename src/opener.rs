use std::path::Path;

use crate::error::{Error, Result};

/// Hand a file to the OS so it opens with its associated application.
pub fn open_path(path: &Path) -> Result<()> {
  if !path.exists() {
    return Err(Error::NotFound { path: path.to_path_buf() });
  }
  open::that_detached(path).map_err(Error::Io)
}
