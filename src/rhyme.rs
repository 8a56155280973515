//! Rhyme-foot registry and resolution of rhyme-foot patterns against a text.
//!
//! A form key may carry several historically attested patterns. Each keeps a
//! stable `pattern_id` (its registration index); the first is the default.

use std::collections::HashMap;

use serde::Serialize;

use crate::domain::FormKey;
use crate::normalize::PositionMap;
use crate::tone::Rhymebook;

#[derive(Clone, Debug, Default)]
pub struct RhymeFootRegistry {
  patterns: HashMap<FormKey, Vec<Vec<i64>>>,
}

impl RhymeFootRegistry {
  /// Register a pattern; an identical list already under the key is not added twice.
  pub fn insert(&mut self, key: FormKey, positions: Vec<i64>) -> bool {
    let list = self.patterns.entry(key).or_default();
    if list.contains(&positions) {
      return false;
    }
    list.push(positions);
    true
  }

  pub fn patterns_for(&self, key: &FormKey) -> &[Vec<i64>] {
    self.patterns.get(key).map(Vec::as_slice).unwrap_or(&[])
  }

  pub fn key_count(&self) -> usize { self.patterns.len() }
}

/// A rhyme-foot char with its location in the cleaned text.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct RhymeFootDetail {
  pub position: usize,
  pub word: char,
  pub yunbu: Vec<String>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct WordClasses {
  pub word: char,
  pub yunbu: Vec<String>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct PatternResolution {
  pub id: usize,
  pub positions: Vec<i64>,
  pub words: Vec<char>,
  pub yunbu: Vec<WordClasses>,
  pub detailed: Vec<RhymeFootDetail>,
}

/// Resolve one pattern. Positions are 1-based; out-of-range ones are skipped.
pub fn resolve_pattern(
  id: usize,
  positions: &[i64],
  stream: &[char],
  position_map: &PositionMap,
  book: &Rhymebook,
) -> PatternResolution {
  let mut words = Vec::new();
  let mut yunbu = Vec::new();
  let mut detailed = Vec::new();

  for &p in positions {
    if p <= 0 || p as usize > stream.len() {
      continue;
    }
    let idx = (p - 1) as usize;
    let word = stream[idx];
    let classes = book.classes_of(word);
    words.push(word);
    yunbu.push(WordClasses { word, yunbu: classes.clone() });
    if let Some(position) = position_map.get(idx) {
      detailed.push(RhymeFootDetail { position, word, yunbu: classes });
    }
  }

  PatternResolution { id, positions: positions.to_vec(), words, yunbu, detailed }
}

/// Resolve every registered pattern for `key`, in registration order.
pub fn resolve_patterns(
  key: &FormKey,
  stream: &[char],
  position_map: &PositionMap,
  registry: &RhymeFootRegistry,
  book: &Rhymebook,
) -> Vec<PatternResolution> {
  registry
    .patterns_for(key)
    .iter()
    .enumerate()
    .map(|(id, positions)| resolve_pattern(id, positions, stream, position_map, book))
    .collect()
}
