//! Domain models: tone classes, template symbols, form identity and records.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Tone class of a character as classified by a rhyme book.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ToneClass {
  Level,
  Oblique,
  Unknown,
}

impl ToneClass {
  /// Traditional single-glyph label (平 / 仄 / 未知).
  pub fn label(self) -> &'static str {
    match self {
      ToneClass::Level => "平",
      ToneClass::Oblique => "仄",
      ToneClass::Unknown => "未知",
    }
  }
}

/// One position of a form's canonical tone template.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ToneSymbol {
  Level,
  Oblique,
  /// Either tone accepted (中).
  Wildcard,
}

impl ToneSymbol {
  pub fn accepts(self, tone: ToneClass) -> bool {
    match self {
      ToneSymbol::Wildcard => true,
      ToneSymbol::Level => tone == ToneClass::Level,
      ToneSymbol::Oblique => tone == ToneClass::Oblique,
    }
  }
}

/// Form identity. Names are shared between attributions, so both parts are needed.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FormKey {
  pub name: String,
  pub author: String,
}

impl FormKey {
  pub fn new(name: &str, author: &str) -> Self {
    Self { name: name.trim().to_string(), author: author.trim().to_string() }
  }
}

impl fmt::Display for FormKey {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}|{}", self.name, self.author)
  }
}

/// A registered form (cipai) as loaded from the form table.
#[derive(Clone, Debug)]
pub struct Form {
  pub key: FormKey,
  pub total_chars: usize,
  /// Signature as stored, e.g. "[7, 7]".
  pub signature_raw: String,
  /// Parsed signature; `None` when the stored text is not a list of counts.
  pub signature: Option<Vec<usize>>,
  /// Tone template string as stored, annotations included.
  pub template_raw: String,
}

/// Character paired with its classified tone.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct ToneMark {
  pub ch: char,
  pub tone: ToneClass,
}

/// One nonconforming position found by the tone scorer.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ToneIssue {
  pub word: char,
  pub actual: ToneClass,
  pub expected: ToneSymbol,
  pub position: usize,
}
