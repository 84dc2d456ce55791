use std::fs::{self, Metadata};
use std::path::Path;
use std::time::SystemTime;

#[cfg(unix)]
use std::os::unix::fs::{MetadataExt, PermissionsExt};

/// Everything the properties panel shows for one path.
#[derive(Debug, Clone)]
pub struct FileProperties {
  pub path: String,
  pub name: String,
  pub file_type: String,
  pub size: u64,
  pub size_human: String,
  pub permissions_octal: String,
  pub permissions_rwx: String,
  pub owner: String,
  pub group: String,
  pub created: Option<String>,
  pub modified: Option<String>,
  pub accessed: Option<String>,
  pub mime_type: Option<String>,
  pub symlink_target: Option<String>,
  pub is_dir: bool,
  pub is_symlink: bool,
  pub hidden: bool,
  pub readable: bool,
  pub writable: bool,
  /// Number of visible entries directly inside a directory.
  pub item_count: Option<usize>,
}

impl FileProperties {
  pub fn from_path(path: &Path) -> Option<Self> {
    let symlink_meta = fs::symlink_metadata(path).ok()?;
    let is_symlink = symlink_meta.is_symlink();
    let symlink_target = if is_symlink {
      fs::read_link(path).ok().map(|t| t.to_string_lossy().to_string())
    } else {
      None
    };

    // For symlinks, report the target's metadata where possible
    let meta = fs::metadata(path).ok().unwrap_or_else(|| symlink_meta.clone());
    let is_dir = meta.is_dir();

    let name = path
      .file_name()
      .map(|n| n.to_string_lossy().to_string())
      .unwrap_or_default();
    let hidden = name.starts_with('.');

    let size = if is_dir { 0 } else { meta.len() };
    let size_human = format_size(size);

    let (permissions_octal, permissions_rwx) = permission_strings(&meta);
    let (owner, group) = owner_strings(&meta);
    let (readable, writable) = access_flags(&meta);

    let created = meta.created().ok().and_then(format_time);
    let modified = meta.modified().ok().and_then(format_time);
    let accessed = meta.accessed().ok().and_then(format_time);

    let file_type = determine_file_type(path, &meta, is_symlink);
    let mime_type = if !is_dir {
      infer::get_from_path(path).ok().flatten().map(|t| t.mime_type().to_string())
    } else {
      None
    };

    let item_count = if is_dir { Some(count_visible_entries(path)) } else { None };

    Some(FileProperties {
      path: path.to_string_lossy().to_string(),
      name,
      file_type,
      size,
      size_human,
      permissions_octal,
      permissions_rwx,
      owner,
      group,
      created,
      modified,
      accessed,
      mime_type,
      symlink_target,
      is_dir,
      is_symlink,
      hidden,
      readable,
      writable,
      item_count,
    })
  }
}

fn count_visible_entries(path: &Path) -> usize {
  fs::read_dir(path)
    .map(|rd| {
      rd.flatten()
        .filter(|e| !e.file_name().to_string_lossy().starts_with('.'))
        .count()
    })
    .unwrap_or(0)
}

pub fn format_size(bytes: u64) -> String {
  const KB: u64 = 1024;
  const MB: u64 = KB * 1024;
  const GB: u64 = MB * 1024;
  const TB: u64 = GB * 1024;

  if bytes >= TB {
    format!("{:.2} TB", bytes as f64 / TB as f64)
  } else if bytes >= GB {
    format!("{:.2} GB", bytes as f64 / GB as f64)
  } else if bytes >= MB {
    format!("{:.2} MB", bytes as f64 / MB as f64)
  } else if bytes >= KB {
    format!("{:.2} KB", bytes as f64 / KB as f64)
  } else {
    format!("{} B", bytes)
  }
}

#[cfg(unix)]
fn permission_strings(meta: &Metadata) -> (String, String) {
  let mode = meta.permissions().mode();
  (format!("{:04o}", mode & 0o7777), format_rwx(mode))
}

#[cfg(not(unix))]
fn permission_strings(meta: &Metadata) -> (String, String) {
  let w = if meta.permissions().readonly() { "r--" } else { "rw-" };
  (String::new(), format!("-{w}------"))
}

#[cfg(unix)]
fn format_rwx(mode: u32) -> String {
  let kind = match mode & 0o170000 {
    0o120000 => 'l',
    0o040000 => 'd',
    0o100000 => '-',
    _ => '?',
  };

  let mut out = String::with_capacity(10);
  out.push(kind);
  for shift in [6u32, 3, 0] {
    let bits = (mode >> shift) & 0o7;
    out.push(if bits & 0o4 != 0 { 'r' } else { '-' });
    out.push(if bits & 0o2 != 0 { 'w' } else { '-' });
    out.push(if bits & 0o1 != 0 { 'x' } else { '-' });
  }
  out
}

#[cfg(unix)]
fn owner_strings(meta: &Metadata) -> (String, String) {
  let owner = users::get_user_by_uid(meta.uid())
    .map(|u| u.name().to_string_lossy().to_string())
    .unwrap_or_else(|| meta.uid().to_string());
  let group = users::get_group_by_gid(meta.gid())
    .map(|g| g.name().to_string_lossy().to_string())
    .unwrap_or_else(|| meta.gid().to_string());
  (owner, group)
}

#[cfg(not(unix))]
fn owner_strings(_meta: &Metadata) -> (String, String) {
  (String::new(), String::new())
}

#[cfg(unix)]
fn access_flags(meta: &Metadata) -> (bool, bool) {
  let uid = users::get_current_uid();
  if uid == 0 {
    return (true, true);
  }
  let mode = meta.permissions().mode();
  let bits = if meta.uid() == uid {
    (mode >> 6) & 0o7
  } else if meta.gid() == users::get_current_gid() {
    (mode >> 3) & 0o7
  } else {
    mode & 0o7
  };
  (bits & 0o4 != 0, bits & 0o2 != 0)
}

#[cfg(not(unix))]
fn access_flags(meta: &Metadata) -> (bool, bool) {
  (true, !meta.permissions().readonly())
}

fn determine_file_type(path: &Path, meta: &Metadata, is_symlink: bool) -> String {
  if is_symlink {
    return "Symbolic link".to_string();
  }
  if meta.is_dir() {
    return "Folder".to_string();
  }
  match path.extension().and_then(|e| e.to_str()) {
    Some(ext) => format!("{} file", ext.to_uppercase()),
    None => "File".to_string(),
  }
}

fn format_time(time: SystemTime) -> Option<String> {
  let duration = time.duration_since(SystemTime::UNIX_EPOCH).ok()?;
  let secs = duration.as_secs() as i64;

  let days_since_epoch = secs / 86400;
  let time_of_day = secs % 86400;
  let (year, month, day) = days_to_ymd(days_since_epoch);

  Some(format!(
    "{:04}-{:02}-{:02} {:02}:{:02}:{:02}",
    year,
    month,
    day,
    time_of_day / 3600,
    (time_of_day % 3600) / 60,
    time_of_day % 60
  ))
}

fn days_to_ymd(mut days: i64) -> (i64, u32, u32) {
  let mut year = 1970;
  loop {
    let days_in_year = if is_leap_year(year) { 366 } else { 365 };
    if days < days_in_year {
      break;
    }
    days -= days_in_year;
    year += 1;
  }

  let months: [i64; 12] = if is_leap_year(year) {
    [31, 29, 31, 30, 31, 30, 31, 31, 30, 31, 30, 31]
  } else {
    [31, 28, 31, 30, 31, 30, 31, 31, 30, 31, 30, 31]
  };

  let mut month = 1;
  for len in months {
    if days < len {
      break;
    }
    days -= len;
    month += 1;
  }

  (year, month, (days + 1) as u32)
}

fn is_leap_year(year: i64) -> bool {
  (year % 4 == 0 && year % 100 != 0) || (year % 400 == 0)
}

#[cfg(test)]
mod tests {
  use super::*;
  use std::path::PathBuf;
  use std::sync::atomic::{AtomicU32, Ordering};

  static COUNTER: AtomicU32 = AtomicU32::new(0);

  fn setup_test_dir() -> PathBuf {
    let id = COUNTER.fetch_add(1, Ordering::SeqCst);
    let dir = std::env::temp_dir().join(format!("fex_props_{id}_{}", std::process::id()));
    let _ = fs::remove_dir_all(&dir);
    fs::create_dir_all(&dir).unwrap();
    dir
  }

  #[test]
  fn test_format_size_units() {
    assert_eq!(format_size(0), "0 B");
    assert_eq!(format_size(1023), "1023 B");
    assert_eq!(format_size(1024), "1.00 KB");
    assert_eq!(format_size(1536), "1.50 KB");
    assert_eq!(format_size(1024 * 1024), "1.00 MB");
    assert_eq!(format_size(1024 * 1024 * 1024), "1.00 GB");
  }

  #[cfg(unix)]
  #[test]
  fn test_format_rwx() {
    assert_eq!(format_rwx(0o100644), "-rw-r--r--");
    assert_eq!(format_rwx(0o100755), "-rwxr-xr-x");
    assert_eq!(format_rwx(0o040755), "drwxr-xr-x");
    assert_eq!(format_rwx(0o120777), "lrwxrwxrwx");
  }

  #[test]
  fn test_properties_for_regular_file() {
    let dir = setup_test_dir();
    let file = dir.join("notes.txt");
    fs::write(&file, "hello world").unwrap();

    let props = FileProperties::from_path(&file).unwrap();
    assert_eq!(props.name, "notes.txt");
    assert_eq!(props.size, 11);
    assert_eq!(props.size_human, "11 B");
    assert!(!props.is_dir);
    assert!(!props.hidden);
    assert!(props.readable);
    assert_eq!(props.file_type, "TXT file");
    assert_eq!(props.item_count, None);
    assert!(props.modified.is_some());

    let _ = fs::remove_dir_all(&dir);
  }

  #[test]
  fn test_properties_for_directory_counts_items() {
    let dir = setup_test_dir();
    fs::write(dir.join("a.txt"), "").unwrap();
    fs::write(dir.join("b.txt"), "").unwrap();
    fs::write(dir.join(".hidden"), "").unwrap();
    fs::create_dir(dir.join("sub")).unwrap();

    let props = FileProperties::from_path(&dir).unwrap();
    assert!(props.is_dir);
    assert_eq!(props.file_type, "Folder");
    assert_eq!(props.item_count, Some(3));

    let _ = fs::remove_dir_all(&dir);
  }

  #[test]
  fn test_properties_hidden_flag() {
    let dir = setup_test_dir();
    let file = dir.join(".secrets");
    fs::write(&file, "x").unwrap();

    let props = FileProperties::from_path(&file).unwrap();
    assert!(props.hidden);

    let _ = fs::remove_dir_all(&dir);
  }

  #[cfg(unix)]
  #[test]
  fn test_properties_for_symlink() {
    let dir = setup_test_dir();
    let file = dir.join("real.txt");
    fs::write(&file, "content").unwrap();
    let link = dir.join("link.txt");
    std::os::unix::fs::symlink(&file, &link).unwrap();

    let props = FileProperties::from_path(&link).unwrap();
    assert!(props.is_symlink);
    assert_eq!(props.symlink_target, Some(file.to_string_lossy().to_string()));
    assert_eq!(props.file_type, "Symbolic link");

    let _ = fs::remove_dir_all(&dir);
  }

  #[cfg(unix)]
  #[test]
  fn test_properties_owner_and_group_resolved() {
    let dir = setup_test_dir();
    let file = dir.join("owned.txt");
    fs::write(&file, "x").unwrap();

    let props = FileProperties::from_path(&file).unwrap();
    assert!(!props.owner.is_empty());
    assert!(!props.group.is_empty());

    let _ = fs::remove_dir_all(&dir);
  }

  #[test]
  fn test_properties_nonexistent_path() {
    assert!(FileProperties::from_path(Path::new("/nonexistent/file.txt")).is_none());
  }

  #[test]
  fn test_days_to_ymd() {
    assert_eq!(days_to_ymd(0), (1970, 1, 1));
    // 2000-03-01, crossing a leap February
    assert_eq!(days_to_ymd(11017), (2000, 3, 1));
  }

  #[test]
  fn test_file_without_extension() {
    let dir = setup_test_dir();
    let file = dir.join("LICENSE");
    fs::write(&file, "MIT").unwrap();

    let props = FileProperties::from_path(&file).unwrap();
    assert_eq!(props.file_type, "File");

    let _ = fs::remove_dir_all(&dir);
  }
}
