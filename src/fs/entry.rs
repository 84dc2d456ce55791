use std::path::PathBuf;
use std::time::SystemTime;

/// One row of a directory listing.
#[derive(Debug, Clone)]
pub struct FileEntry {
  pub path: PathBuf,
  pub name: String,
  pub is_dir: bool,
  pub is_symlink: bool,
  pub symlink_target: Option<String>,
  pub size: u64,
  pub modified: Option<SystemTime>,
  pub created: Option<SystemTime>,
  pub readonly: bool,
}

impl FileEntry {
  pub fn from_path(path: PathBuf) -> Self {
    let symlink_meta = path.symlink_metadata();
    let is_symlink = symlink_meta.as_ref().is_ok_and(|m| m.is_symlink());
    let symlink_target = if is_symlink {
      std::fs::read_link(&path)
        .ok()
        .map(|t| t.to_string_lossy().to_string())
    } else {
      None
    };
    // Follow the link for display metadata; a dangling link falls back to zeros
    let metadata = path.metadata();
    let is_dir = metadata.as_ref().is_ok_and(|m| m.is_dir());
    let size = metadata.as_ref().map_or(0, |m| if m.is_dir() { 0 } else { m.len() });
    let modified = metadata.as_ref().ok().and_then(|m| m.modified().ok());
    let created = metadata.as_ref().ok().and_then(|m| m.created().ok());
    let readonly = metadata.as_ref().is_ok_and(|m| m.permissions().readonly());
    let name = path
      .file_name()
      .map(|n| n.to_string_lossy().to_string())
      .unwrap_or_default();

    Self {
      path,
      name,
      is_dir,
      is_symlink,
      symlink_target,
      size,
      modified,
      created,
      readonly,
    }
  }

  pub fn is_hidden(&self) -> bool {
    self.name.starts_with('.')
  }
}
