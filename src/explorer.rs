use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::clipboard::{Clipboard, ClipboardOp};
use crate::config::Config;
use crate::error::{Error, Result};
use crate::fs::entry::FileEntry;
use crate::fs::ops;
use crate::fs::properties::FileProperties;
use crate::locations::KnownLocation;
use crate::nav::Navigator;
use crate::opener;
use crate::search::{SearchEngine, SearchHit};
use crate::watcher::DirWatcher;

/// Counts for the status surface.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DirCounts {
  pub total: usize,
  pub folders: usize,
  pub files: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteMode {
  Trash,
  Permanent,
}

/// Pre-flight answer for a rename, so the caller can raise its
/// confirmation dialog before anything touches the disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenamePlan {
  /// Empty or unchanged name: nothing to do.
  NoChange,
  Ready,
  /// The file extension would change; confirm with the user first.
  ExtensionChange { old: String, new: String },
}

/// Per-path outcome of a multi-item operation. Partial failures are not
/// rolled back; what succeeded stays done.
#[derive(Debug, Default)]
pub struct OpReport {
  pub done: Vec<PathBuf>,
  pub failed: Vec<(PathBuf, Error)>,
}

impl OpReport {
  pub fn all_ok(&self) -> bool {
    self.failed.is_empty()
  }
}

/// The file-manager core: current directory and history, listing, search,
/// clipboard and file operations. All rendering and dialog presentation is
/// the caller's business; this type only reports state and outcomes.
pub struct Explorer {
  nav: Navigator,
  clipboard: Clipboard,
  search: SearchEngine,
  watcher: Option<DirWatcher>,
  entries: Vec<FileEntry>,
  hits: Vec<SearchHit>,
  counts: DirCounts,
  show_hidden: bool,
  pub status_message: Option<String>,
}

impl Explorer {
  pub fn new(root: impl Into<PathBuf>, config: &Config) -> Result<Self> {
    let nav = Navigator::new(root)?;
    let mut search = SearchEngine::new(Duration::from_millis(config.search_debounce_ms));
    search.set_include_hidden(config.show_hidden);

    let watcher = if config.watch_directory {
      // Browsing still works if the platform watcher cannot start
      DirWatcher::new().ok()
    } else {
      None
    };

    let mut explorer = Self {
      nav,
      clipboard: Clipboard::new(),
      search,
      watcher,
      entries: Vec::new(),
      hits: Vec::new(),
      counts: DirCounts::default(),
      show_hidden: config.show_hidden,
      status_message: None,
    };
    explorer.rewatch();
    explorer.relist()?;
    Ok(explorer)
  }

  pub fn current_dir(&self) -> &Path {
    self.nav.current()
  }

  pub fn entries(&self) -> &[FileEntry] {
    &self.entries
  }

  pub fn search_hits(&self) -> &[SearchHit] {
    &self.hits
  }

  pub fn counts(&self) -> DirCounts {
    self.counts
  }

  pub fn search_active(&self) -> bool {
    self.search.is_active()
  }

  /// A search walk is running; result interaction should be disabled.
  pub fn searching(&self) -> bool {
    self.search.is_searching()
  }

  pub fn can_go_back(&self) -> bool {
    self.nav.can_go_back()
  }

  pub fn can_go_forward(&self) -> bool {
    self.nav.can_go_forward()
  }

  /// `(back, forward)` history depths, for enabling navigation controls.
  pub fn history_depth(&self) -> (usize, usize) {
    self.nav.history_depth()
  }

  pub fn show_hidden(&self) -> bool {
    self.show_hidden
  }

  pub fn clipboard_len(&self) -> usize {
    self.clipboard.paths().len()
  }

  /// The status bar line: `N items - M folders, K files - /path`.
  pub fn status_line(&self) -> String {
    format!(
      "{} items - {} folders, {} files - {}",
      self.counts.total,
      self.counts.folders,
      self.counts.files,
      self.nav.current().display()
    )
  }

  pub fn set_show_hidden(&mut self, show_hidden: bool) -> Result<()> {
    self.show_hidden = show_hidden;
    self.search.set_include_hidden(show_hidden);
    self.relist()
  }

  // === Navigation ===

  pub fn navigate_to(&mut self, path: &Path) -> Result<()> {
    if self.nav.navigate_to(path)? {
      self.after_navigation()?;
    }
    Ok(())
  }

  /// No-op when the back history is empty.
  pub fn back(&mut self) -> Result<bool> {
    if self.nav.back().is_none() {
      return Ok(false);
    }
    self.after_navigation()?;
    Ok(true)
  }

  pub fn forward(&mut self) -> Result<bool> {
    if self.nav.forward().is_none() {
      return Ok(false);
    }
    self.after_navigation()?;
    Ok(true)
  }

  pub fn go_to_known(&mut self, location: KnownLocation) -> Result<()> {
    let Some(path) = location.resolve() else {
      return Err(Error::InvalidPath {
        path: PathBuf::from(location.label()),
      });
    };
    self.navigate_to(&path)
  }

  /// Re-list the current directory; re-runs the search when one is active.
  pub fn refresh(&mut self) -> Result<()> {
    self.relist()?;
    if !self.search.query().is_empty() {
      let dir = self.nav.current().to_path_buf();
      self.search.fire_now(&dir);
    }
    Ok(())
  }

  /// Open an entry: directories navigate, files go to the OS opener.
  /// Activating a search hit also leaves search mode.
  pub fn open_entry(&mut self, path: &Path) -> Result<()> {
    let was_search = self.search.is_active();
    if path.is_dir() {
      self.navigate_to(path)?;
    } else {
      opener::open_path(path)?;
    }
    if was_search {
      self.set_search_query("");
    }
    Ok(())
  }

  fn after_navigation(&mut self) -> Result<()> {
    self.rewatch();
    self.relist()?;
    if !self.search.query().is_empty() {
      let dir = self.nav.current().to_path_buf();
      self.search.fire_now(&dir);
    }
    Ok(())
  }

  fn rewatch(&mut self) {
    let dir = self.nav.current().to_path_buf();
    if let Some(watcher) = self.watcher.as_mut() {
      let _ = watcher.watch(&dir);
    }
  }

  fn relist(&mut self) -> Result<()> {
    let dir = self.nav.current().to_path_buf();
    let read_dir = std::fs::read_dir(&dir).map_err(|e| Error::from_io(e, &dir))?;

    let mut entries = Vec::new();
    for entry in read_dir.flatten() {
      let fe = FileEntry::from_path(entry.path());
      if !self.show_hidden && fe.is_hidden() {
        continue;
      }
      entries.push(fe);
    }

    // Directories first, then case-insensitive alphabetical
    entries.sort_by(|a, b| {
      b.is_dir
        .cmp(&a.is_dir)
        .then_with(|| a.name.to_lowercase().cmp(&b.name.to_lowercase()))
    });

    self.counts = DirCounts {
      total: entries.len(),
      folders: entries.iter().filter(|e| e.is_dir).count(),
      files: entries.iter().filter(|e| !e.is_dir).count(),
    };
    self.entries = entries;
    Ok(())
  }

  // === Search ===

  /// Feed search input. Empty input exits search mode right away and
  /// restores the plain listing; anything else schedules a debounced
  /// background search under the current directory.
  pub fn set_search_query(&mut self, query: &str) {
    if self.search.set_query(query) {
      self.hits.clear();
    }
  }

  /// Drive background work: applies finished search results and picks up
  /// external changes to the watched directory. Call this from the event
  /// loop tick. Returns `true` when visible state changed.
  pub fn on_tick(&mut self) -> Result<bool> {
    let mut changed = false;

    if self.watcher.as_mut().is_some_and(DirWatcher::take_changed) {
      self.refresh()?;
      changed = true;
    }

    let dir = self.nav.current().to_path_buf();
    if let Some(hits) = self.search.tick(&dir) {
      self.set_status(format!("Found {} item(s)", hits.len()));
      self.hits = hits;
      changed = true;
    }
    Ok(changed)
  }

  // === Clipboard ===

  pub fn copy_selection(&mut self, paths: Vec<PathBuf>) -> Result<()> {
    if self.search.is_active() {
      return Err(Error::SearchActive);
    }
    if paths.is_empty() {
      return Ok(());
    }
    let count = paths.len();
    self.clipboard.copy(paths);
    self.set_status(format!("Copied {count} item(s)"));
    Ok(())
  }

  pub fn cut_selection(&mut self, paths: Vec<PathBuf>) -> Result<()> {
    if self.search.is_active() {
      return Err(Error::SearchActive);
    }
    if paths.is_empty() {
      return Ok(());
    }
    let count = paths.len();
    self.clipboard.cut(paths);
    self.set_status(format!("Cut {count} item(s)"));
    Ok(())
  }

  /// Paste the clipboard into the current directory. Name collisions get a
  /// `_copy` suffix instead of prompting. A cut source is removed only
  /// after its own copy succeeded, so a failed copy never loses data.
  pub fn paste(&mut self) -> Result<OpReport> {
    let mut report = OpReport::default();
    let Some(op) = self.clipboard.op() else {
      self.set_status("Nothing to paste".to_string());
      return Ok(report);
    };
    if self.clipboard.paths().is_empty() {
      self.set_status("Nothing to paste".to_string());
      return Ok(report);
    }
    let dest_dir = self.nav.current().to_path_buf();
    let sources: Vec<PathBuf> = self.clipboard.paths().to_vec();

    for source in sources {
      if !source.exists() {
        report.failed.push((source.clone(), Error::NotFound { path: source }));
        continue;
      }
      let Some(file_name) = source.file_name() else {
        report
          .failed
          .push((source.clone(), Error::InvalidPath { path: source }));
        continue;
      };

      let raw_dest = dest_dir.join(file_name);
      // Cutting something onto itself is a no-op
      if op == ClipboardOp::Cut && raw_dest == source {
        continue;
      }
      let dest = ops::unique_dest_path(&raw_dest);

      match ops::copy_path(&source, &dest) {
        Ok(()) => {
          if op == ClipboardOp::Cut
            && let Err(e) = ops::delete_path(&source)
          {
            report.failed.push((source, e));
            continue;
          }
          report.done.push(dest);
        }
        Err(e) => report.failed.push((source, e)),
      }
    }

    if op == ClipboardOp::Cut {
      self.clipboard.clear();
    }

    self.refresh()?;
    if report.all_ok() {
      self.set_status(format!("Pasted {} item(s)", report.done.len()));
    } else {
      self.set_status(format!("Paste failed for {} item(s)", report.failed.len()));
    }
    Ok(report)
  }

  // === File operations ===

  pub fn create_file(&mut self, name: &str) -> Result<PathBuf> {
    let name = name.trim();
    if name.is_empty() {
      return Err(Error::InvalidName { name: name.to_string() });
    }
    let dir = self.nav.current().to_path_buf();
    let path = ops::create_file(&dir, name)?;
    self.refresh()?;
    self.set_status(format!("Created {name}"));
    Ok(path)
  }

  pub fn create_folder(&mut self, name: &str) -> Result<PathBuf> {
    let name = name.trim();
    if name.is_empty() {
      return Err(Error::InvalidName { name: name.to_string() });
    }
    let dir = self.nav.current().to_path_buf();
    let path = ops::create_dir(&dir, name)?;
    self.refresh()?;
    self.set_status(format!("Created {name}"));
    Ok(path)
  }

  /// Check a rename before doing it. `ExtensionChange` means the caller
  /// should confirm with the user and only then call [`rename`](Self::rename).
  pub fn plan_rename(&self, path: &Path, new_name: &str) -> RenamePlan {
    let new_name = new_name.trim();
    let old_name = path
      .file_name()
      .map(|n| n.to_string_lossy().to_string())
      .unwrap_or_default();
    if new_name.is_empty() || new_name == old_name {
      return RenamePlan::NoChange;
    }

    if path.is_file() {
      let old_ext = path
        .extension()
        .map(|e| e.to_string_lossy().to_string())
        .unwrap_or_default();
      let new_ext = Path::new(new_name)
        .extension()
        .map(|e| e.to_string_lossy().to_string())
        .unwrap_or_default();
      if !old_ext.is_empty() && old_ext != new_ext {
        return RenamePlan::ExtensionChange { old: old_ext, new: new_ext };
      }
    }
    RenamePlan::Ready
  }

  /// Rename within the parent directory. A `NoChange` plan is a silent
  /// no-op; a taken name fails with `AlreadyExists`.
  pub fn rename(&mut self, path: &Path, new_name: &str) -> Result<()> {
    let new_name = new_name.trim();
    if matches!(self.plan_rename(path, new_name), RenamePlan::NoChange) {
      return Ok(());
    }

    let parent = path
      .parent()
      .map(Path::to_path_buf)
      .unwrap_or_else(|| self.nav.current().to_path_buf());
    let new_path = parent.join(new_name);

    ops::rename_path(path, &new_path)?;
    self.clipboard.retarget(path, &new_path);
    self.refresh()?;
    self.set_status(format!("Renamed to {new_name}"));
    Ok(())
  }

  /// Delete the selection, to the trash or permanently. The confirmation
  /// dialog is the caller's job; call this once the user said yes. An empty
  /// selection is a no-op.
  pub fn delete(&mut self, paths: &[PathBuf], mode: DeleteMode) -> Result<OpReport> {
    if self.search.is_active() {
      return Err(Error::SearchActive);
    }
    let mut report = OpReport::default();
    if paths.is_empty() {
      return Ok(report);
    }

    for path in paths {
      let result = match mode {
        DeleteMode::Trash => ops::trash_path(path),
        DeleteMode::Permanent => ops::delete_path(path),
      };
      match result {
        Ok(()) => {
          self.clipboard.forget(path);
          report.done.push(path.clone());
        }
        Err(e) => report.failed.push((path.clone(), e)),
      }
    }

    self.refresh()?;
    if report.all_ok() {
      self.set_status(format!("Deleted {} item(s)", report.done.len()));
    } else {
      self.set_status(format!("Delete failed for {} item(s)", report.failed.len()));
    }
    Ok(report)
  }

  pub fn properties(&self, path: &Path) -> Result<FileProperties> {
    FileProperties::from_path(path).ok_or_else(|| Error::NotFound { path: path.to_path_buf() })
  }

  fn set_status(&mut self, message: String) {
    self.status_message = Some(message);
  }
}
