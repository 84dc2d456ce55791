use std::mem;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

/// Current-directory state plus back/forward history.
///
/// Navigating to the directory you are already in is a no-op, which also
/// guarantees history never records the same path twice in a row.
#[derive(Debug)]
pub struct Navigator {
  current: PathBuf,
  back: Vec<PathBuf>,
  forward: Vec<PathBuf>,
}

impl Navigator {
  pub fn new(start: impl Into<PathBuf>) -> Result<Self> {
    let start = start.into();
    if !start.is_dir() {
      return Err(Error::InvalidPath { path: start });
    }
    Ok(Self {
      current: start,
      back: Vec::new(),
      forward: Vec::new(),
    })
  }

  pub fn current(&self) -> &Path {
    &self.current
  }

  pub fn can_go_back(&self) -> bool {
    !self.back.is_empty()
  }

  pub fn can_go_forward(&self) -> bool {
    !self.forward.is_empty()
  }

  /// How many steps are navigable in each direction: `(back, forward)`.
  pub fn history_depth(&self) -> (usize, usize) {
    (self.back.len(), self.forward.len())
  }

  /// Navigate to an existing directory. Returns `false` when `path` is
  /// already the current directory (nothing changed).
  pub fn navigate_to(&mut self, path: &Path) -> Result<bool> {
    if !path.is_dir() {
      return Err(Error::InvalidPath { path: path.to_path_buf() });
    }
    if path == self.current {
      return Ok(false);
    }
    let old = mem::replace(&mut self.current, path.to_path_buf());
    self.back.push(old);
    self.forward.clear();
    Ok(true)
  }

  /// Pop the back history. The direct history move does not re-push onto
  /// the back stack; the abandoned current path goes to the forward stack.
  pub fn back(&mut self) -> Option<&Path> {
    let prev = self.back.pop()?;
    let old = mem::replace(&mut self.current, prev);
    self.forward.push(old);
    Some(&self.current)
  }

  pub fn forward(&mut self) -> Option<&Path> {
    let next = self.forward.pop()?;
    let old = mem::replace(&mut self.current, next);
    self.back.push(old);
    Some(&self.current)
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use std::fs;
  use std::sync::atomic::{AtomicU32, Ordering};

  static COUNTER: AtomicU32 = AtomicU32::new(0);

  fn test_dirs(names: &[&str]) -> (PathBuf, Vec<PathBuf>) {
    let id = COUNTER.fetch_add(1, Ordering::SeqCst);
    let base = std::env::temp_dir().join(format!("fex_nav_{id}_{}", std::process::id()));
    let _ = fs::remove_dir_all(&base);
    let mut dirs = Vec::new();
    for name in names {
      let d = base.join(name);
      fs::create_dir_all(&d).unwrap();
      dirs.push(d);
    }
    (base, dirs)
  }

  #[test]
  fn test_new_rejects_non_directory() {
    let (base, dirs) = test_dirs(&["a"]);
    let file = dirs[0].join("f.txt");
    fs::write(&file, "").unwrap();

    assert!(matches!(Navigator::new(&file), Err(Error::InvalidPath { .. })));
    assert!(Navigator::new(&dirs[0]).is_ok());
    let _ = fs::remove_dir_all(&base);
  }

  #[test]
  fn test_navigate_rejects_missing_directory() {
    let (base, dirs) = test_dirs(&["a"]);
    let mut nav = Navigator::new(&dirs[0]).unwrap();

    let result = nav.navigate_to(&base.join("missing"));
    assert!(matches!(result, Err(Error::InvalidPath { .. })));
    assert_eq!(nav.current(), dirs[0]);
    assert!(!nav.can_go_back());
    let _ = fs::remove_dir_all(&base);
  }

  #[test]
  fn test_navigate_same_path_is_noop() {
    let (base, dirs) = test_dirs(&["a"]);
    let mut nav = Navigator::new(&dirs[0]).unwrap();

    assert!(!nav.navigate_to(&dirs[0]).unwrap());
    assert!(!nav.can_go_back());
    let _ = fs::remove_dir_all(&base);
  }

  #[test]
  fn test_back_twice_restores_start() {
    let (base, dirs) = test_dirs(&["a", "b", "c"]);
    let mut nav = Navigator::new(&dirs[0]).unwrap();
    nav.navigate_to(&dirs[1]).unwrap();
    nav.navigate_to(&dirs[2]).unwrap();

    assert_eq!(nav.back().unwrap(), dirs[1]);
    assert_eq!(nav.back().unwrap(), dirs[0]);
    assert!(!nav.can_go_back());
    assert_eq!(nav.history_depth(), (0, 2));

    // Forward history pops most-recent reversal first: B, then C
    assert_eq!(nav.forward().unwrap(), dirs[1]);
    assert_eq!(nav.forward().unwrap(), dirs[2]);
    assert!(!nav.can_go_forward());
    let _ = fs::remove_dir_all(&base);
  }

  #[test]
  fn test_back_on_empty_history_is_noop() {
    let (base, dirs) = test_dirs(&["a"]);
    let mut nav = Navigator::new(&dirs[0]).unwrap();

    assert!(nav.back().is_none());
    assert_eq!(nav.current(), dirs[0]);
    let _ = fs::remove_dir_all(&base);
  }

  #[test]
  fn test_navigate_clears_forward_history() {
    let (base, dirs) = test_dirs(&["a", "b", "c"]);
    let mut nav = Navigator::new(&dirs[0]).unwrap();
    nav.navigate_to(&dirs[1]).unwrap();
    nav.back().unwrap();
    assert!(nav.can_go_forward());

    nav.navigate_to(&dirs[2]).unwrap();
    assert!(!nav.can_go_forward());
    assert_eq!(nav.current(), dirs[2]);
    let _ = fs::remove_dir_all(&base);
  }
}
