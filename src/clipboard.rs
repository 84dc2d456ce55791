use std::path::PathBuf;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClipboardOp {
  Cut,
  Copy,
}

/// Pending paste sources. Replaced wholesale on every copy/cut; a cut-paste
/// clears it when done.
#[derive(Debug, Clone, Default)]
pub struct Clipboard {
  paths: Vec<PathBuf>,
  op: Option<ClipboardOp>,
}

impl Clipboard {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn copy(&mut self, paths: Vec<PathBuf>) {
    self.paths = dedup(paths);
    self.op = Some(ClipboardOp::Copy);
  }

  pub fn cut(&mut self, paths: Vec<PathBuf>) {
    self.paths = dedup(paths);
    self.op = Some(ClipboardOp::Cut);
  }

  pub fn clear(&mut self) {
    self.paths.clear();
    self.op = None;
  }

  pub fn is_empty(&self) -> bool {
    self.paths.is_empty() || self.op.is_none()
  }

  pub fn paths(&self) -> &[PathBuf] {
    &self.paths
  }

  pub fn op(&self) -> Option<ClipboardOp> {
    self.op
  }

  /// Drop any clipboard entry at or under `path` (used after deletes).
  pub fn forget(&mut self, path: &std::path::Path) {
    self.paths.retain(|p| !p.starts_with(path));
    if self.paths.is_empty() {
      self.op = None;
    }
  }

  /// Point a clipboard entry at its new location (used after renames).
  pub fn retarget(&mut self, old: &std::path::Path, new: &std::path::Path) {
    for p in &mut self.paths {
      if p == old {
        *p = new.to_path_buf();
      }
    }
  }
}

fn dedup(paths: Vec<PathBuf>) -> Vec<PathBuf> {
  let mut out: Vec<PathBuf> = Vec::with_capacity(paths.len());
  for p in paths {
    if !out.contains(&p) {
      out.push(p);
    }
  }
  out
}

#[cfg(test)]
mod tests {
  use super::*;
  use std::path::Path;

  #[test]
  fn test_copy_replaces_and_dedups() {
    let mut cb = Clipboard::new();
    cb.cut(vec![PathBuf::from("/tmp/old")]);
    cb.copy(vec![
      PathBuf::from("/tmp/a"),
      PathBuf::from("/tmp/b"),
      PathBuf::from("/tmp/a"),
    ]);

    assert_eq!(cb.op(), Some(ClipboardOp::Copy));
    assert_eq!(cb.paths(), &[PathBuf::from("/tmp/a"), PathBuf::from("/tmp/b")]);
  }

  #[test]
  fn test_cut_sets_mode() {
    let mut cb = Clipboard::new();
    cb.cut(vec![PathBuf::from("/tmp/a")]);
    assert_eq!(cb.op(), Some(ClipboardOp::Cut));
    assert!(!cb.is_empty());
  }

  #[test]
  fn test_clear() {
    let mut cb = Clipboard::new();
    cb.copy(vec![PathBuf::from("/tmp/a")]);
    cb.clear();
    assert!(cb.is_empty());
    assert_eq!(cb.op(), None);
  }

  #[test]
  fn test_forget_drops_children() {
    let mut cb = Clipboard::new();
    cb.copy(vec![
      PathBuf::from("/tmp/dir/inner.txt"),
      PathBuf::from("/tmp/other.txt"),
    ]);
    cb.forget(Path::new("/tmp/dir"));
    assert_eq!(cb.paths(), &[PathBuf::from("/tmp/other.txt")]);

    cb.forget(Path::new("/tmp/other.txt"));
    assert!(cb.is_empty());
  }

  #[test]
  fn test_retarget_after_rename() {
    let mut cb = Clipboard::new();
    cb.cut(vec![PathBuf::from("/tmp/a.txt")]);
    cb.retarget(Path::new("/tmp/a.txt"), Path::new("/tmp/b.txt"));
    assert_eq!(cb.paths(), &[PathBuf::from("/tmp/b.txt")]);
  }
}
