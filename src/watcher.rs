use std::io;
use std::path::{Path, PathBuf};
use std::sync::mpsc::{self, Receiver};

use notify::{Event, RecommendedWatcher, RecursiveMode, Watcher};

use crate::error::{Error, Result};

/// Watches the directory currently being browsed so the listing can refresh
/// itself when something else changes it. Non-recursive: only direct
/// children matter to the visible listing.
pub struct DirWatcher {
  watcher: RecommendedWatcher,
  rx: Receiver<notify::Result<Event>>,
  watched: Option<PathBuf>,
}

impl DirWatcher {
  pub fn new() -> Result<Self> {
    let (tx, rx) = mpsc::channel();
    let watcher = notify::recommended_watcher(tx).map_err(notify_err)?;
    Ok(Self {
      watcher,
      rx,
      watched: None,
    })
  }

  /// Switch the watch to `dir`, dropping the previous one.
  pub fn watch(&mut self, dir: &Path) -> Result<()> {
    if let Some(old) = self.watched.take() {
      let _ = self.watcher.unwatch(&old);
    }
    self
      .watcher
      .watch(dir, RecursiveMode::NonRecursive)
      .map_err(notify_err)?;
    self.watched = Some(dir.to_path_buf());
    Ok(())
  }

  /// Drain pending notifications. Returns `true` when the watched directory
  /// saw any change since the last call.
  pub fn take_changed(&mut self) -> bool {
    let mut changed = false;
    while let Ok(event) = self.rx.try_recv() {
      if event.is_ok() {
        changed = true;
      }
    }
    changed
  }
}

fn notify_err(err: notify::Error) -> Error {
  Error::Io(io::Error::other(err))
}
