//! Application state: reference tables loaded once at start-up, plus config.
//!
//! Everything in here is read-only after construction, so handlers share it
//! through an `Arc` without locking. A table that failed to load is kept as
//! its error message and surfaced to the calls that need it.

use std::collections::HashMap;

use tracing::{info, instrument, warn};

use crate::config::{load_config_from_env, AppConfig};
use crate::error::AnalysisError;
use crate::loader::{load_forms, load_intros, load_rhyme_feet, load_rhymebook};
use crate::registry::FormRegistry;
use crate::rhyme::RhymeFootRegistry;
use crate::tone::Rhymebook;

pub struct LoadedRhymebook {
  pub id: String,
  pub name: String,
  pub book: Result<Rhymebook, String>,
}

pub struct ReferenceData {
  pub rhymebooks: Vec<LoadedRhymebook>,
  pub forms: Result<FormRegistry, String>,
  pub rhyme_feet: Result<RhymeFootRegistry, String>,
  pub intros: HashMap<String, String>,
}

impl ReferenceData {
  #[instrument(level = "info", skip_all)]
  pub fn load(cfg: &AppConfig) -> Self {
    let rhymebooks = cfg
      .rhymebooks
      .iter()
      .map(|rb| LoadedRhymebook { id: rb.id.clone(), name: rb.name.clone(), book: load_rhymebook(&rb.path) })
      .collect();
    Self {
      rhymebooks,
      forms: load_forms(&cfg.data.forms),
      rhyme_feet: load_rhyme_feet(&cfg.data.rhyme_feet),
      intros: load_intros(&cfg.data.intros),
    }
  }

  /// Rhyme book by id; an unknown id falls back to the first configured book.
  pub fn rhymebook(&self, choice: &str) -> Result<&Rhymebook, AnalysisError> {
    let loaded = self
      .rhymebooks
      .iter()
      .find(|rb| rb.id == choice)
      .or_else(|| self.rhymebooks.first())
      .ok_or_else(|| AnalysisError::unavailable("rhymebook", "no rhyme book configured"))?;
    loaded
      .book
      .as_ref()
      .map_err(|e| AnalysisError::unavailable(&format!("rhymebook {}", loaded.name), e.clone()))
  }

  pub fn forms(&self) -> Result<&FormRegistry, AnalysisError> {
    self.forms.as_ref().map_err(|e| AnalysisError::unavailable("forms", e.clone()))
  }

  pub fn rhyme_feet(&self) -> Result<&RhymeFootRegistry, AnalysisError> {
    self.rhyme_feet.as_ref().map_err(|e| AnalysisError::unavailable("rhyme_feet", e.clone()))
  }

  pub fn intro(&self, name: &str) -> Option<&str> {
    self.intros.get(name.trim()).map(String::as_str)
  }
}

pub struct AppState {
  pub config: AppConfig,
  pub data: ReferenceData,
}

impl AppState {
  /// Build state from env: load config, then every reference table.
  #[instrument(level = "info", skip_all)]
  pub fn new() -> Self {
    let config = load_config_from_env().unwrap_or_default();
    let data = ReferenceData::load(&config);

    // Inventory summary, one line per table.
    for rb in &data.rhymebooks {
      match &rb.book {
        Ok(b) => info!(target: "cilv_backend", id = %rb.id, name = %rb.name, chars = b.char_count(), "Rhyme book ready"),
        Err(e) => warn!(target: "cilv_backend", id = %rb.id, name = %rb.name, error = %e, "Rhyme book unavailable"),
      }
    }
    match &data.forms {
      Ok(f) => info!(target: "cilv_backend", forms = f.len(), "Form registry ready"),
      Err(e) => warn!(target: "cilv_backend", error = %e, "Form registry unavailable"),
    }
    match &data.rhyme_feet {
      Ok(r) => info!(target: "cilv_backend", forms = r.key_count(), "Rhyme-foot registry ready"),
      Err(e) => warn!(target: "cilv_backend", error = %e, "Rhyme-foot registry unavailable"),
    }

    Self { config, data }
  }

  #[cfg(test)]
  pub fn from_parts(config: AppConfig, data: ReferenceData) -> Self {
    Self { config, data }
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::loader::parse_rhymebook;

  fn data() -> ReferenceData {
    ReferenceData {
      rhymebooks: vec![
        LoadedRhymebook {
          id: "1".into(),
          name: "甲".into(),
          book: parse_rhymebook(r#"[{"一东": {"平": ["东"]}}]"#.as_bytes()),
        },
        LoadedRhymebook { id: "2".into(), name: "乙".into(), book: Err("missing".into()) },
      ],
      forms: Err("no such file".into()),
      rhyme_feet: Ok(RhymeFootRegistry::default()),
      intros: HashMap::from([("竹枝".to_string(), "介绍".to_string())]),
    }
  }

  #[test]
  fn unknown_rhymebook_falls_back_to_first() {
    let d = data();
    assert!(d.rhymebook("1").is_ok());
    assert!(d.rhymebook("nope").is_ok());
  }

  #[test]
  fn unavailable_tables_surface_errors() {
    let d = data();
    assert!(matches!(d.rhymebook("2"), Err(AnalysisError::ReferenceDataUnavailable { .. })));
    assert_eq!(
      d.forms().err(),
      Some(AnalysisError::unavailable("forms", "no such file"))
    );
    assert!(d.rhyme_feet().is_ok());
    assert_eq!(d.intro(" 竹枝"), Some("介绍"));
  }
}
