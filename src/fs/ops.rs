use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

/// Returns a destination path that does not collide with an existing entry,
/// appending `_copy`, then `_copy_1`, `_copy_2`, … to the stem.
pub fn unique_dest_path(dest: &Path) -> PathBuf {
  if !dest.exists() {
    return dest.to_path_buf();
  }

  let stem = dest
    .file_stem()
    .map(|s| s.to_string_lossy().to_string())
    .unwrap_or_default();
  let ext = dest.extension().map(|e| e.to_string_lossy().to_string());
  let parent = dest.parent().unwrap_or(Path::new("."));

  let make_name = |suffix: &str| -> PathBuf {
    match &ext {
      Some(e) => parent.join(format!("{stem}{suffix}.{e}")),
      None => parent.join(format!("{stem}{suffix}")),
    }
  };

  let first = make_name("_copy");
  if !first.exists() {
    return first;
  }

  let mut n = 1u32;
  loop {
    let candidate = make_name(&format!("_copy_{n}"));
    if !candidate.exists() {
      return candidate;
    }
    n += 1;
  }
}

fn copy_err(src: &Path, dest: &Path, source: io::Error) -> Error {
  Error::Copy {
    src: src.to_path_buf(),
    dest: dest.to_path_buf(),
    source,
  }
}

/// Copy a single file, overwriting any existing destination (delete-then-copy).
pub fn copy_file(src: &Path, dest: &Path) -> Result<u64> {
  if dest.exists() {
    fs::remove_file(dest).map_err(|e| copy_err(src, dest, e))?;
  }
  fs::copy(src, dest).map_err(|e| copy_err(src, dest, e))
}

/// Copy a directory tree. Not atomic: the first failing entry aborts the walk
/// and whatever was copied so far stays on disk.
///
/// Uses an explicit work stack so arbitrarily deep trees cannot exhaust the
/// call stack.
pub fn copy_dir_recursive(source: &Path, dest: &Path) -> Result<()> {
  if !source.is_dir() {
    return Err(Error::NotFound { path: source.to_path_buf() });
  }

  let mut stack = vec![(source.to_path_buf(), dest.to_path_buf())];
  while let Some((src, dst)) = stack.pop() {
    fs::create_dir_all(&dst).map_err(|e| copy_err(&src, &dst, e))?;
    for entry in fs::read_dir(&src).map_err(|e| copy_err(&src, &dst, e))? {
      let entry = entry.map_err(|e| copy_err(&src, &dst, e))?;
      let src_path = entry.path();
      let dst_path = dst.join(entry.file_name());
      if src_path.is_dir() {
        stack.push((src_path, dst_path));
      } else {
        copy_file(&src_path, &dst_path)?;
      }
    }
  }
  Ok(())
}

/// Copy a file or directory to `dest`.
pub fn copy_path(source: &Path, dest: &Path) -> Result<()> {
  if source.is_dir() {
    copy_dir_recursive(source, dest)
  } else if source.exists() {
    copy_file(source, dest).map(|_| ())
  } else {
    Err(Error::NotFound { path: source.to_path_buf() })
  }
}

/// Create an empty file named `name` under `dir`.
pub fn create_file(dir: &Path, name: &str) -> Result<PathBuf> {
  let path = dir.join(name);
  if path.exists() {
    return Err(Error::AlreadyExists { path });
  }
  fs::File::create(&path).map_err(|e| Error::from_io(e, &path))?;
  Ok(path)
}

/// Create an empty directory named `name` under `dir`.
pub fn create_dir(dir: &Path, name: &str) -> Result<PathBuf> {
  let path = dir.join(name);
  if path.exists() {
    return Err(Error::AlreadyExists { path });
  }
  fs::create_dir(&path).map_err(|e| Error::from_io(e, &path))?;
  Ok(path)
}

/// Rename `src` to `dest`. Refuses to clobber an existing destination.
pub fn rename_path(src: &Path, dest: &Path) -> Result<()> {
  if !src.exists() {
    return Err(Error::NotFound { path: src.to_path_buf() });
  }
  if dest.exists() {
    return Err(Error::AlreadyExists { path: dest.to_path_buf() });
  }
  fs::rename(src, dest).map_err(|e| Error::from_io(e, src))
}

/// Delete a path (file or directory) permanently.
pub fn delete_path(path: &Path) -> Result<()> {
  if !path.exists() {
    return Err(Error::NotFound { path: path.to_path_buf() });
  }
  let result = if path.is_dir() {
    fs::remove_dir_all(path)
  } else {
    fs::remove_file(path)
  };
  result.map_err(|e| Error::from_io(e, path))
}

/// Move a path to the OS trash / recycle bin.
pub fn trash_path(path: &Path) -> Result<()> {
  if !path.exists() {
    return Err(Error::NotFound { path: path.to_path_buf() });
  }
  trash::delete(path).map_err(|e| Error::Io(io::Error::other(e)))
}
