//! Loading service configuration (reference data paths, rhyme books, defaults) from TOML.
//!
//! See `AppConfig` for the expected schema. Every field has a default, so an
//! empty file (or no file at all) gives a working setup rooted at `./data`.

use serde::Deserialize;
use tracing::{error, info};

#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct AppConfig {
  pub data: DataPaths,
  pub rhymebooks: Vec<RhymebookCfg>,
  /// Rhyme book used when a request does not name one.
  pub default_rhymebook: String,
  /// Rhyme book consulted by the single-character tone lookup.
  pub char_tone_rhymebook: String,
  /// Form preselected in the form list.
  pub default_form: Option<DefaultFormCfg>,
}

#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct DataPaths {
  pub forms: String,
  pub rhyme_feet: String,
  pub intros: String,
}

#[derive(Clone, Debug, Deserialize)]
pub struct RhymebookCfg {
  pub id: String,
  pub name: String,
  pub path: String,
}

#[derive(Clone, Debug, Deserialize)]
pub struct DefaultFormCfg {
  pub name: String,
  pub author: String,
  pub total_chars: usize,
}

impl Default for DataPaths {
  fn default() -> Self {
    Self {
      forms: "data/cipai_with_statistics_qdcp.csv".into(),
      rhyme_feet: "data/yunjiao.csv".into(),
      intros: "data/cipai_detail_with_intro.csv".into(),
    }
  }
}

impl Default for AppConfig {
  fn default() -> Self {
    Self {
      data: DataPaths::default(),
      rhymebooks: vec![
        RhymebookCfg { id: "1".into(), name: "词林正韵".into(), path: "data/词林正韵.json".into() },
        RhymebookCfg { id: "2".into(), name: "中华新韵".into(), path: "data/中华新韵.json".into() },
      ],
      default_rhymebook: "2".into(),
      char_tone_rhymebook: "2".into(),
      default_form: Some(DefaultFormCfg { name: "竹枝".into(), author: "皇甫松".into(), total_chars: 14 }),
    }
  }
}

/// Attempt to load `AppConfig` from CILV_CONFIG_PATH. On any parsing/IO error, returns None.
pub fn load_config_from_env() -> Option<AppConfig> {
  let path = std::env::var("CILV_CONFIG_PATH").ok()?;
  match std::fs::read_to_string(&path) {
    Ok(s) => match toml::from_str::<AppConfig>(&s) {
      Ok(cfg) => {
        info!(target: "cilv_backend", %path, "Loaded service config (TOML)");
        Some(cfg)
      }
      Err(e) => {
        error!(target: "cilv_backend", %path, error = %e, "Failed to parse TOML config");
        None
      }
    },
    Err(e) => {
      error!(target: "cilv_backend", %path, error = %e, "Failed to read TOML config file");
      None
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn empty_toml_gives_defaults() {
    let cfg: AppConfig = toml::from_str("").expect("toml");
    assert_eq!(cfg.rhymebooks.len(), 2);
    assert_eq!(cfg.default_rhymebook, "2");
    assert_eq!(cfg.data.rhyme_feet, "data/yunjiao.csv");
  }

  #[test]
  fn partial_override() {
    let cfg: AppConfig = toml::from_str(
      r#"
default_rhymebook = "1"

[data]
forms = "/srv/forms.csv"

[[rhymebooks]]
id = "p"
name = "平水韵"
path = "/srv/pingshui.json"

[default_form]
name = "如梦令"
author = "李清照"
total_chars = 33
"#,
    )
    .expect("toml");
    assert_eq!(cfg.default_rhymebook, "1");
    assert_eq!(cfg.data.forms, "/srv/forms.csv");
    assert_eq!(cfg.data.intros, "data/cipai_detail_with_intro.csv");
    assert_eq!(cfg.rhymebooks.len(), 1);
    assert_eq!(cfg.default_form.map(|f| f.total_chars), Some(33));
  }
}
