//! Form registry: exact structural lookup, identity lookup, and the form list
//! offered to pickers.

use std::collections::HashSet;

use serde::Serialize;
use tracing::warn;

use crate::domain::{Form, FormKey, ToneClass, ToneSymbol};
use crate::tone::canonicalize_tone_label;
use crate::util::han_only;

/// Annotation marking an augmented rhyme in stored templates; never a tone.
const AUGMENTED_RHYME: &str = "增韵";

/// Result of a successful structural match.
#[derive(Clone, Debug)]
pub struct FormMatch<'a> {
  pub form: &'a Form,
  pub template: Vec<ToneSymbol>,
  /// Other forms sharing the same length and signature, registry order.
  pub alternatives: Vec<FormKey>,
}

/// Entry of the form picker list.
#[derive(Clone, Debug, Serialize)]
pub struct FormSummary {
  pub cipai_name: String,
  pub author: String,
  pub total_chars: usize,
  pub split_length: String,
  pub display_name: String,
}

#[derive(Clone, Debug, Default)]
pub struct FormRegistry {
  forms: Vec<Form>,
}

impl FormRegistry {
  pub fn new(forms: Vec<Form>) -> Self { Self { forms } }

  pub fn len(&self) -> usize { self.forms.len() }

  #[allow(dead_code)]
  pub fn is_empty(&self) -> bool { self.forms.is_empty() }

  /// Exact (length, signature) match; first in registry order wins.
  pub fn match_form(&self, total: usize, signature: &[usize]) -> Option<FormMatch<'_>> {
    let mut hits = self
      .forms
      .iter()
      .filter(|f| f.total_chars == total && f.signature.as_deref() == Some(signature));

    let form = hits.next()?;
    let alternatives: Vec<FormKey> = hits.map(|f| f.key.clone()).collect();
    if !alternatives.is_empty() {
      let others: Vec<String> = alternatives.iter().map(|k| k.to_string()).collect();
      warn!(target: "analysis", chosen = %form.key, others = ?others, total, ?signature, "Several forms share this signature; using the first");
    }
    Some(FormMatch { form, template: parse_template(&form.template_raw), alternatives })
  }

  /// Lookup by (name, author); first in registry order.
  pub fn find(&self, key: &FormKey) -> Option<&Form> {
    self.forms.iter().find(|f| f.key == *key)
  }

  /// Picker list: unique by (name, author, total), sorted by (name, total).
  pub fn summaries(&self) -> Vec<FormSummary> {
    let mut seen = HashSet::new();
    let mut out: Vec<FormSummary> = self
      .forms
      .iter()
      .filter(|f| seen.insert((f.key.name.as_str(), f.key.author.as_str(), f.total_chars)))
      .map(|f| FormSummary {
        cipai_name: f.key.name.clone(),
        author: f.key.author.clone(),
        total_chars: f.total_chars,
        split_length: f.signature_raw.clone(),
        display_name: format!("{} - {} ({}字)", f.key.name, f.key.author, f.total_chars),
      })
      .collect();
    out.sort_by(|a, b| a.cipai_name.cmp(&b.cipai_name).then(a.total_chars.cmp(&b.total_chars)));
    out
  }
}

/// Stored template text → pure tone sequence aligned with stream positions.
pub fn parse_template(raw: &str) -> Vec<ToneSymbol> {
  let cleaned = han_only(raw).replace(AUGMENTED_RHYME, "");
  cleaned
    .chars()
    .filter_map(|c| {
      if c == '中' {
        return Some(ToneSymbol::Wildcard);
      }
      let mut buf = [0u8; 4];
      match canonicalize_tone_label(c.encode_utf8(&mut buf)) {
        ToneClass::Level => Some(ToneSymbol::Level),
        ToneClass::Oblique => Some(ToneSymbol::Oblique),
        ToneClass::Unknown => {
          warn!(target: "analysis", symbol = %c, "Dropping unrecognized tone template symbol");
          None
        }
      }
    })
    .collect()
}

/// Parse a stored signature such as "[7, 7]".
pub fn parse_signature(raw: &str) -> Option<Vec<usize>> {
  serde_json::from_str(raw.trim()).ok()
}
