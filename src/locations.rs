use std::path::PathBuf;

/// The sidebar's quick-access locations, mapped to platform standard
/// directories.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KnownLocation {
  Home,
  Desktop,
  Documents,
  Downloads,
  Pictures,
  Music,
  Videos,
}

impl KnownLocation {
  pub const ALL: [KnownLocation; 7] = [
    KnownLocation::Home,
    KnownLocation::Desktop,
    KnownLocation::Documents,
    KnownLocation::Downloads,
    KnownLocation::Pictures,
    KnownLocation::Music,
    KnownLocation::Videos,
  ];

  pub fn label(self) -> &'static str {
    match self {
      KnownLocation::Home => "Home",
      KnownLocation::Desktop => "Desktop",
      KnownLocation::Documents => "Documents",
      KnownLocation::Downloads => "Downloads",
      KnownLocation::Pictures => "Pictures",
      KnownLocation::Music => "Music",
      KnownLocation::Videos => "Videos",
    }
  }

  pub fn from_label(label: &str) -> Option<Self> {
    Self::ALL.iter().copied().find(|l| l.label().eq_ignore_ascii_case(label))
  }

  fn lookup(self) -> Option<PathBuf> {
    match self {
      KnownLocation::Home => dirs::home_dir(),
      KnownLocation::Desktop => dirs::desktop_dir(),
      KnownLocation::Documents => dirs::document_dir(),
      KnownLocation::Downloads => dirs::download_dir(),
      KnownLocation::Pictures => dirs::picture_dir(),
      KnownLocation::Music => dirs::audio_dir(),
      KnownLocation::Videos => dirs::video_dir(),
    }
  }

  /// The location's directory if it exists on this machine, falling back
  /// to the home directory.
  pub fn resolve(self) -> Option<PathBuf> {
    self
      .lookup()
      .filter(|p| p.is_dir())
      .or_else(|| dirs::home_dir().filter(|p| p.is_dir()))
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_all_locations_have_labels() {
    assert_eq!(KnownLocation::ALL.len(), 7);
    for loc in KnownLocation::ALL {
      assert!(!loc.label().is_empty());
    }
  }

  #[test]
  fn test_from_label_round_trip() {
    for loc in KnownLocation::ALL {
      assert_eq!(KnownLocation::from_label(loc.label()), Some(loc));
    }
    assert_eq!(KnownLocation::from_label("downloads"), Some(KnownLocation::Downloads));
    assert_eq!(KnownLocation::from_label("nowhere"), None);
  }

  #[test]
  fn test_resolve_yields_directory_or_none() {
    for loc in KnownLocation::ALL {
      if let Some(path) = loc.resolve() {
        assert!(path.is_dir(), "{loc:?} resolved to a non-directory");
      }
    }
  }

  #[test]
  fn test_home_resolves_when_home_exists() {
    if dirs::home_dir().is_some_and(|p| p.is_dir()) {
      assert!(KnownLocation::Home.resolve().is_some());
    }
  }
}
