//! Headless file-explorer core: directory navigation with history, debounced
//! background filename search, clipboard paste with conflict auto-rename,
//! file operations with confirmation gates, and a properties viewer.
//!
//! Rendering, dialogs and shortcuts belong to the embedding UI; it drives
//! [`Explorer`] and reads state back from it.

pub mod clipboard;
pub mod config;
pub mod error;
pub mod explorer;
pub mod fs;
pub mod locations;
pub mod nav;
pub mod opener;
pub mod search;
pub mod watcher;

pub use clipboard::{Clipboard, ClipboardOp};
pub use config::Config;
pub use error::{Error, Result};
pub use explorer::{DeleteMode, DirCounts, Explorer, OpReport, RenamePlan};
pub use fs::{FileEntry, FileProperties};
pub use locations::KnownLocation;
pub use nav::Navigator;
pub use search::{SearchEngine, SearchHit};
