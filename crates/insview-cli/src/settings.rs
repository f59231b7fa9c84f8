//! Viewer configuration: TOML file, then `INSVIEW_*` environment variables,
//! then command-line flags.

use std::path::{Path, PathBuf};

use anyhow::Context as _;
use serde::Deserialize;

/// Runtime configuration, deserialised from `insview.toml`.
#[derive(Debug, Clone, Deserialize)]
pub struct ViewerConfig {
  /// SQLite file holding the policy table.
  pub store_path: PathBuf,
  /// Spreadsheet (CSV export) ingested at startup.
  pub data_path:  PathBuf,
  /// Log destination while the terminal browser owns the screen.
  pub log_path:   PathBuf,
}

/// Flag values that take precedence over file and environment.
#[derive(Debug, Default)]
pub struct Overrides {
  pub store_path: Option<PathBuf>,
  pub data_path:  Option<PathBuf>,
}

impl ViewerConfig {
  pub fn load(file: &Path, overrides: Overrides) -> anyhow::Result<Self> {
    let path_value = |p: Option<PathBuf>| p.map(|p| p.to_string_lossy().into_owned());

    let settings = config::Config::builder()
      .set_default("store_path", "insurance_data.db")?
      .set_default("data_path", "data.csv")?
      .set_default("log_path", "insview.log")?
      .add_source(config::File::from(file.to_path_buf()).required(false))
      .add_source(config::Environment::with_prefix("INSVIEW"))
      .set_override_option("store_path", path_value(overrides.store_path))?
      .set_override_option("data_path", path_value(overrides.data_path))?
      .build()
      .with_context(|| format!("failed to read config file {}", file.display()))?;

    let mut cfg: ViewerConfig = settings
      .try_deserialize()
      .context("failed to deserialise ViewerConfig")?;

    cfg.store_path = expand_tilde(&cfg.store_path);
    cfg.data_path = expand_tilde(&cfg.data_path);
    cfg.log_path = expand_tilde(&cfg.log_path);
    Ok(cfg)
  }
}

/// Expand a leading `~` to the user's home directory.
fn expand_tilde(path: &Path) -> PathBuf {
  let s = path.to_string_lossy();
  if let Some(rest) = s.strip_prefix("~/")
    && let Ok(home) = std::env::var("HOME")
  {
    return PathBuf::from(home).join(rest);
  }
  path.to_path_buf()
}
