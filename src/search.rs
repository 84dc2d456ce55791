use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Receiver, Sender};
use std::thread;
use std::time::{Duration, Instant};

use ignore::WalkBuilder;

pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(350);

/// One search match: display name plus the absolute path behind it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchHit {
  pub name: String,
  pub path: PathBuf,
}

struct WorkerReport {
  generation: u64,
  hits: Vec<SearchHit>,
}

/// Debounced recursive filename search.
///
/// Keystrokes land in [`set_query`](Self::set_query); an actual walk only
/// starts once the debounce window has passed without further input. Each
/// walk runs on its own worker thread and is stamped with a generation id:
/// results reported by a superseded generation are discarded, so the newest
/// query always wins regardless of which worker finishes first. A superseded
/// worker also observes a cancel flag and stops walking early.
pub struct SearchEngine {
  debounce: Duration,
  include_hidden: bool,
  query: String,
  pending_since: Option<Instant>,
  generation: u64,
  active: bool,
  searching: bool,
  tx: Sender<WorkerReport>,
  rx: Receiver<WorkerReport>,
  cancel: Option<Arc<AtomicBool>>,
}

impl SearchEngine {
  pub fn new(debounce: Duration) -> Self {
    let (tx, rx) = mpsc::channel();
    Self {
      debounce,
      include_hidden: false,
      query: String::new(),
      pending_since: None,
      generation: 0,
      active: false,
      searching: false,
      tx,
      rx,
      cancel: None,
    }
  }

  pub fn set_include_hidden(&mut self, include_hidden: bool) {
    self.include_hidden = include_hidden;
  }

  pub fn query(&self) -> &str {
    &self.query
  }

  /// Search mode: the listing shows flattened search results.
  pub fn is_active(&self) -> bool {
    self.active
  }

  /// A walk is in flight and results have not been applied yet.
  pub fn is_searching(&self) -> bool {
    self.searching
  }

  /// Record input. A non-empty query (re)starts the debounce window; an
  /// empty query exits search mode immediately. Returns `true` when search
  /// mode was exited.
  pub fn set_query(&mut self, query: &str) -> bool {
    let query = query.trim();
    if query.is_empty() {
      let was_active = self.active;
      self.query.clear();
      self.pending_since = None;
      self.cancel_worker();
      // Orphan any report already sitting in the channel
      self.generation += 1;
      self.active = false;
      self.searching = false;
      return was_active;
    }
    self.query = query.to_string();
    self.pending_since = Some(Instant::now());
    false
  }

  /// Start the current query right away, skipping the debounce window.
  /// Used when the root changes while a query is present.
  pub fn fire_now(&mut self, root: &Path) {
    if self.query.is_empty() {
      return;
    }
    self.pending_since = None;
    self.spawn(root);
  }

  /// Drive the engine: start a due search, drain finished workers. Returns
  /// the new result set when the latest generation completed.
  pub fn tick(&mut self, root: &Path) -> Option<Vec<SearchHit>> {
    if self.pending_since.is_some_and(|since| since.elapsed() >= self.debounce) {
      self.pending_since = None;
      self.spawn(root);
    }

    let mut latest = None;
    while let Ok(report) = self.rx.try_recv() {
      if report.generation == self.generation {
        latest = Some(report.hits);
      }
    }
    if latest.is_some() {
      self.searching = false;
    }
    latest
  }

  fn spawn(&mut self, root: &Path) {
    self.cancel_worker();
    self.generation += 1;
    self.active = true;
    self.searching = true;

    let cancel = Arc::new(AtomicBool::new(false));
    self.cancel = Some(cancel.clone());
    let tx = self.tx.clone();
    let generation = self.generation;
    let needle = self.query.to_lowercase();
    let root = root.to_path_buf();
    let include_hidden = self.include_hidden;

    thread::spawn(move || {
      let hits = walk_matches(&root, &needle, include_hidden, &cancel);
      if cancel.load(Ordering::Relaxed) {
        return;
      }
      let _ = tx.send(WorkerReport { generation, hits });
    });
  }

  fn cancel_worker(&mut self) {
    if let Some(flag) = self.cancel.take() {
      flag.store(true, Ordering::Relaxed);
    }
  }
}

impl Drop for SearchEngine {
  fn drop(&mut self) {
    self.cancel_worker();
  }
}

/// Recursive case-insensitive substring match on entry names. Unreadable
/// subdirectories are skipped and the walk continues.
fn walk_matches(
  root: &Path,
  needle: &str,
  include_hidden: bool,
  cancel: &AtomicBool,
) -> Vec<SearchHit> {
  let mut hits = Vec::new();
  let walker = WalkBuilder::new(root)
    .hidden(!include_hidden)
    .ignore(false)
    .git_ignore(false)
    .git_global(false)
    .git_exclude(false)
    .parents(false)
    .follow_links(false)
    .build();

  for result in walker {
    if cancel.load(Ordering::Relaxed) {
      break;
    }
    let Ok(entry) = result else { continue };
    if entry.depth() == 0 {
      continue;
    }
    let name = entry.file_name().to_string_lossy();
    if name.to_lowercase().contains(needle) {
      hits.push(SearchHit {
        name: name.into_owned(),
        path: entry.path().to_path_buf(),
      });
    }
  }
  hits
}

#[cfg(test)]
mod tests {
  use super::*;
  use std::fs;
  use std::sync::atomic::AtomicU32;

  static COUNTER: AtomicU32 = AtomicU32::new(0);

  fn test_dir() -> PathBuf {
    let id = COUNTER.fetch_add(1, Ordering::SeqCst);
    let dir = std::env::temp_dir().join(format!("fex_search_{id}_{}", std::process::id()));
    let _ = fs::remove_dir_all(&dir);
    fs::create_dir_all(dir.join("sub").join("deeper")).unwrap();
    fs::write(dir.join("report.txt"), "").unwrap();
    fs::write(dir.join("sub").join("Report_2024.md"), "").unwrap();
    fs::write(dir.join("sub").join("deeper").join("other.txt"), "").unwrap();
    fs::write(dir.join(".hidden_report"), "").unwrap();
    dir
  }

  fn wait_for_results(engine: &mut SearchEngine, root: &Path) -> Vec<SearchHit> {
    let deadline = Instant::now() + Duration::from_secs(5);
    loop {
      if let Some(hits) = engine.tick(root) {
        return hits;
      }
      assert!(Instant::now() < deadline, "search did not complete in time");
      thread::sleep(Duration::from_millis(5));
    }
  }

  #[test]
  fn test_empty_query_exits_search_mode_immediately() {
    let dir = test_dir();
    let mut engine = SearchEngine::new(Duration::from_millis(5));

    engine.set_query("report");
    thread::sleep(Duration::from_millis(10));
    let _ = wait_for_results(&mut engine, &dir);
    assert!(engine.is_active());

    let exited = engine.set_query("");
    assert!(exited);
    assert!(!engine.is_active());
    assert!(!engine.is_searching());
    assert!(engine.tick(&dir).is_none());

    let _ = fs::remove_dir_all(&dir);
  }

  #[test]
  fn test_no_search_before_debounce_expires() {
    let dir = test_dir();
    let mut engine = SearchEngine::new(Duration::from_secs(60));

    engine.set_query("report");
    assert!(engine.tick(&dir).is_none());
    assert!(!engine.is_searching());

    let _ = fs::remove_dir_all(&dir);
  }

  #[test]
  fn test_recursive_case_insensitive_match() {
    let dir = test_dir();
    let mut engine = SearchEngine::new(Duration::from_millis(1));

    engine.set_query("REPORT");
    thread::sleep(Duration::from_millis(5));
    let hits = wait_for_results(&mut engine, &dir);

    let mut names: Vec<&str> = hits.iter().map(|h| h.name.as_str()).collect();
    names.sort();
    assert_eq!(names, ["Report_2024.md", "report.txt"]);
    assert!(hits.iter().all(|h| h.path.starts_with(&dir)));

    let _ = fs::remove_dir_all(&dir);
  }

  #[test]
  fn test_hidden_entries_excluded_by_default() {
    let dir = test_dir();
    let mut engine = SearchEngine::new(Duration::from_millis(1));

    engine.set_query("hidden");
    thread::sleep(Duration::from_millis(5));
    let hits = wait_for_results(&mut engine, &dir);
    assert!(hits.is_empty());

    engine.set_include_hidden(true);
    engine.set_query("hidden");
    thread::sleep(Duration::from_millis(5));
    let hits = wait_for_results(&mut engine, &dir);
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].name, ".hidden_report");

    let _ = fs::remove_dir_all(&dir);
  }

  #[test]
  fn test_directories_match_too() {
    let dir = test_dir();
    let mut engine = SearchEngine::new(Duration::from_millis(1));

    engine.set_query("deeper");
    thread::sleep(Duration::from_millis(5));
    let hits = wait_for_results(&mut engine, &dir);
    assert_eq!(hits.len(), 1);
    assert!(hits[0].path.is_dir());

    let _ = fs::remove_dir_all(&dir);
  }

  #[test]
  fn test_newer_generation_supersedes_older() {
    let dir = test_dir();
    let mut engine = SearchEngine::new(Duration::from_millis(1));

    // First search fires, then is immediately superseded
    engine.set_query("report");
    thread::sleep(Duration::from_millis(5));
    engine.fire_now(&dir);
    engine.set_query("other");
    thread::sleep(Duration::from_millis(5));

    let hits = wait_for_results(&mut engine, &dir);
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].name, "other.txt");

    // Nothing stale left in the channel
    assert!(engine.tick(&dir).is_none());

    let _ = fs::remove_dir_all(&dir);
  }
}
