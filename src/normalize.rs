//! Text normalization: whitespace-stripped text, Han-only stream, the
//! stream → cleaned-text position map and the segment-length signature.

use serde::Serialize;

use crate::util::{is_han, strip_whitespace};

/// Clause-terminating punctuation used to derive the signature.
pub const CLAUSE_BREAKS: [char; 5] = ['，', '。', '、', '？', '！'];

/// Dense stream index → char index in the cleaned text. Strictly increasing.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct PositionMap(Vec<usize>);

impl PositionMap {
  pub fn get(&self, stream_idx: usize) -> Option<usize> {
    self.0.get(stream_idx).copied()
  }

  #[allow(dead_code)]
  pub fn len(&self) -> usize { self.0.len() }

  #[allow(dead_code)]
  pub fn is_empty(&self) -> bool { self.0.is_empty() }

  #[allow(dead_code)]
  pub fn as_slice(&self) -> &[usize] { &self.0 }
}

/// Output of [`normalize`]. Immutable once built; shared by scorer and resolver.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NormalizedText {
  pub cleaned: String,
  pub stream: Vec<char>,
  pub position_map: PositionMap,
  pub signature: Vec<usize>,
}

impl NormalizedText {
  pub fn len(&self) -> usize { self.stream.len() }

  pub fn processed(&self) -> String { self.stream.iter().collect() }
}

pub fn normalize(raw: &str) -> NormalizedText {
  let cleaned = strip_whitespace(raw);

  let mut stream = Vec::new();
  let mut positions = Vec::new();
  for (idx, ch) in cleaned.chars().enumerate() {
    if is_han(ch) {
      stream.push(ch);
      positions.push(idx);
    }
  }

  let signature = segment_signature(&cleaned);
  NormalizedText { cleaned, stream, position_map: PositionMap(positions), signature }
}

/// Han count per clause; clauses that are empty after trimming are dropped.
pub fn segment_signature(cleaned: &str) -> Vec<usize> {
  cleaned
    .split(|c: char| CLAUSE_BREAKS.contains(&c))
    .filter(|seg| !seg.trim().is_empty())
    .map(|seg| seg.chars().filter(|c| is_han(*c)).count())
    .collect()
}
