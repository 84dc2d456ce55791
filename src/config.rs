use std::io;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::{Error, Result};
use crate::search::DEFAULT_DEBOUNCE;

pub struct Config {
  pub show_hidden: bool,
  pub search_debounce_ms: u64,
  pub watch_directory: bool,
}

#[derive(Deserialize, Default)]
struct TomlConfig {
  general: Option<GeneralConfig>,
}

#[derive(Deserialize, Default)]
struct GeneralConfig {
  show_hidden: Option<bool>,
  search_debounce_ms: Option<u64>,
  watch_directory: Option<bool>,
}

impl Default for Config {
  fn default() -> Self {
    let mut config = Config::empty();
    let mut errors = Vec::new();
    config.apply_toml_str(Config::default_toml(), &mut errors);
    config
  }
}

impl Config {
  fn empty() -> Self {
    Config {
      show_hidden: false,
      search_debounce_ms: DEFAULT_DEBOUNCE.as_millis() as u64,
      watch_directory: true,
    }
  }

  fn apply_toml_str(&mut self, s: &str, errors: &mut Vec<String>) {
    let toml_config: TomlConfig = match toml::from_str(s) {
      Ok(c) => c,
      Err(e) => {
        errors.push(format!("failed to parse config.toml: {e}"));
        return;
      }
    };

    if let Some(general) = toml_config.general {
      if let Some(show_hidden) = general.show_hidden {
        self.show_hidden = show_hidden;
      }
      if let Some(debounce) = general.search_debounce_ms {
        self.search_debounce_ms = debounce;
      }
      if let Some(watch) = general.watch_directory {
        self.watch_directory = watch;
      }
    }
  }

  pub fn default_toml() -> &'static str {
    r#"[general]
show_hidden = false       # list dotfiles by default
search_debounce_ms = 350  # pause after typing before a search starts
watch_directory = true    # auto-refresh when the current directory changes
"#
  }

  pub fn config_path() -> Result<PathBuf> {
    let dir = dirs::config_dir().ok_or_else(|| {
      Error::Io(io::Error::new(
        io::ErrorKind::NotFound,
        "could not determine config directory",
      ))
    })?;
    Ok(dir.join("fex").join("config.toml"))
  }

  /// Load the user config, collecting problems instead of failing: a broken
  /// config still yields a usable default.
  pub fn load() -> (Config, Vec<String>) {
    let mut config = Config::default();
    let mut errors = Vec::new();

    let Ok(path) = Config::config_path() else {
      return (config, errors);
    };
    if let Ok(contents) = std::fs::read_to_string(&path) {
      config.apply_toml_str(&contents, &mut errors);
    }
    (config, errors)
  }

  pub fn dump_default_config(path: &Path) -> Result<()> {
    if let Some(parent) = path.parent() {
      std::fs::create_dir_all(parent)?;
    }
    std::fs::write(path, Config::default_toml())?;
    Ok(())
  }
}
