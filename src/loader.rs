//! Reading reference tables from disk: rhyme books (JSON), the form registry,
//! rhyme-foot registry and form introductions (CSV).
//!
//! Unreadable files or headers fail the whole table. A single row that does not
//! parse is logged and skipped; the rest of the table still loads.

use std::collections::HashMap;
use std::fs::File;
use std::io::Read;

use serde::Deserialize;
use tracing::{info, warn};

use crate::domain::{Form, FormKey};
use crate::registry::{parse_signature, FormRegistry};
use crate::rhyme::RhymeFootRegistry;
use crate::tone::{Rhymebook, RhymebookData};

#[derive(Debug, Deserialize)]
struct FormRow {
  #[serde(rename = "词牌名")]
  name: String,
  #[serde(rename = "作者", default)]
  author: String,
  #[serde(rename = "总数")]
  total: usize,
  #[serde(rename = "分段字数")]
  signature: String,
  #[serde(rename = "韵律")]
  template: String,
}

#[derive(Debug, Deserialize)]
struct RhymeFootRow {
  #[serde(rename = "词牌名")]
  name: String,
  #[serde(rename = "作者", default)]
  author: String,
  #[serde(rename = "韵脚")]
  positions: String,
}

#[derive(Debug, Deserialize)]
struct IntroRow {
  #[serde(rename = "词牌名")]
  name: String,
  #[serde(rename = "介绍", default)]
  intro: String,
}

fn open(path: &str) -> Result<File, String> {
  File::open(path).map_err(|e| format!("{path}: {e}"))
}

pub fn parse_rhymebook<R: Read>(rdr: R) -> Result<Rhymebook, String> {
  let data: RhymebookData = serde_json::from_reader(rdr).map_err(|e| format!("invalid rhyme book JSON: {e}"))?;
  Ok(Rhymebook::from_data(&data))
}

pub fn load_rhymebook(path: &str) -> Result<Rhymebook, String> {
  let book = parse_rhymebook(open(path)?).map_err(|e| format!("{path}: {e}"))?;
  info!(target: "cilv_backend", %path, chars = book.char_count(), classes = book.class_count(), "Loaded rhyme book");
  Ok(book)
}

pub fn parse_forms<R: Read>(rdr: R) -> Result<FormRegistry, String> {
  let mut reader = csv::Reader::from_reader(rdr);
  let mut forms = Vec::new();
  for (row_no, row) in reader.deserialize::<FormRow>().enumerate() {
    let row = match row {
      Ok(r) => r,
      Err(e) => {
        warn!(target: "cilv_backend", row = row_no + 1, error = %e, "Skipping malformed form row");
        continue;
      }
    };
    let signature = parse_signature(&row.signature).filter(|sig| {
      let sum = sig.iter().try_fold(0usize, |acc, n| acc.checked_add(*n));
      if sum == Some(row.total) {
        return true;
      }
      warn!(target: "cilv_backend", row = row_no + 1, total = row.total, sum = ?sum, "Form signature does not add up to its character count");
      false
    });
    if signature.is_none() {
      warn!(target: "cilv_backend", row = row_no + 1, raw = %row.signature, "Form signature is unusable; it will never match");
    }
    forms.push(Form {
      key: FormKey::new(&row.name, &row.author),
      total_chars: row.total,
      signature_raw: row.signature.trim().to_string(),
      signature,
      template_raw: row.template,
    });
  }
  Ok(FormRegistry::new(forms))
}

pub fn load_forms(path: &str) -> Result<FormRegistry, String> {
  let reg = parse_forms(open(path)?).map_err(|e| format!("{path}: {e}"))?;
  info!(target: "cilv_backend", %path, forms = reg.len(), "Loaded form registry");
  Ok(reg)
}

/// Positions are a JSON list, sometimes wrapped in an extra pair of quotes.
fn parse_positions(raw: &str) -> Option<Vec<i64>> {
  let s = raw.trim();
  let s = s.strip_prefix('"').and_then(|t| t.strip_suffix('"')).unwrap_or(s);
  serde_json::from_str(s).ok()
}

pub fn parse_rhyme_feet<R: Read>(rdr: R) -> Result<RhymeFootRegistry, String> {
  let mut reader = csv::Reader::from_reader(rdr);
  let mut reg = RhymeFootRegistry::default();
  for (row_no, row) in reader.deserialize::<RhymeFootRow>().enumerate() {
    let row = match row {
      Ok(r) => r,
      Err(e) => {
        warn!(target: "cilv_backend", row = row_no + 1, error = %e, "Skipping malformed rhyme-foot row");
        continue;
      }
    };
    match parse_positions(&row.positions) {
      Some(positions) => {
        reg.insert(FormKey::new(&row.name, &row.author), positions);
      }
      None => {
        warn!(target: "cilv_backend", row = row_no + 1, raw = %row.positions, "Skipping rhyme-foot row with unparsable positions");
      }
    }
  }
  Ok(reg)
}

pub fn load_rhyme_feet(path: &str) -> Result<RhymeFootRegistry, String> {
  let reg = parse_rhyme_feet(open(path)?).map_err(|e| format!("{path}: {e}"))?;
  info!(target: "cilv_backend", %path, forms = reg.key_count(), "Loaded rhyme-foot registry");
  Ok(reg)
}

pub fn parse_intros<R: Read>(rdr: R) -> HashMap<String, String> {
  let mut reader = csv::Reader::from_reader(rdr);
  let mut out = HashMap::new();
  for row in reader.deserialize::<IntroRow>() {
    match row {
      Ok(r) => {
        out.insert(r.name.trim().to_string(), r.intro.trim().to_string());
      }
      Err(e) => warn!(target: "cilv_backend", error = %e, "Skipping malformed introduction row"),
    }
  }
  out
}

/// Introductions are optional: a missing or unreadable file gives an empty table.
pub fn load_intros(path: &str) -> HashMap<String, String> {
  match open(path) {
    Ok(f) => {
      let intros = parse_intros(f);
      info!(target: "cilv_backend", %path, entries = intros.len(), "Loaded form introductions");
      intros
    }
    Err(e) => {
      warn!(target: "cilv_backend", error = %e, "Form introductions unavailable; continuing without them");
      HashMap::new()
    }
  }
}
