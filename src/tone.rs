//! Tone label canonicalization and the rhyme-book tables built from it.
//!
//! A rhyme book is a list of groups; each group maps a rhyme-class name to
//! label → member list (labels are usually `平` / `仄`). From it we derive:
//!   - the tone dictionary (char → tone class, last assignment wins)
//!   - the rhyme-class table (class name → member set, in book order)

use std::collections::{HashMap, HashSet};
use std::fmt;
use std::marker::PhantomData;

use serde::de::{Deserialize, Deserializer, MapAccess, Visitor};
use tracing::debug;

use crate::domain::ToneClass;

/// Map any recognized tone label (classical or modern notation) to a tone class.
pub fn canonicalize_tone_label(label: &str) -> ToneClass {
  let label = label.trim();
  match label {
    "平" | "阴平" | "阳平" | "一声" | "二声" | "1" | "2" => ToneClass::Level,
    "仄" | "上" | "去" | "入" | "上声" | "去声" | "入声" | "三声" | "四声" | "3" | "4" => {
      ToneClass::Oblique
    }
    _ if label.contains('平') => ToneClass::Level,
    _ if label.contains('仄') => ToneClass::Oblique,
    _ => ToneClass::Unknown,
  }
}

/// JSON object whose entries stay in document order.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Ordered<V>(pub Vec<(String, V)>);

impl<'de, V: Deserialize<'de>> Deserialize<'de> for Ordered<V> {
  fn deserialize<D: Deserializer<'de>>(d: D) -> Result<Self, D::Error> {
    struct OrderedVisitor<V>(PhantomData<V>);

    impl<'de, V: Deserialize<'de>> Visitor<'de> for OrderedVisitor<V> {
      type Value = Ordered<V>;

      fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a JSON object")
      }

      fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Self::Value, A::Error> {
        let mut entries = Vec::with_capacity(map.size_hint().unwrap_or(0));
        while let Some(entry) = map.next_entry::<String, V>()? {
          entries.push(entry);
        }
        Ok(Ordered(entries))
      }
    }

    d.deserialize_map(OrderedVisitor(PhantomData))
  }
}

/// Raw rhyme-book shape: `[{ "一东": { "平": [...], "仄": [...] } }, ...]`.
pub type RhymebookData = Vec<Ordered<Ordered<Vec<String>>>>;

#[derive(Clone, Debug)]
pub struct RhymeClass {
  pub name: String,
  pub members: HashSet<char>,
}

/// Tone dictionary plus rhyme-class table for one rhyme book.
#[derive(Clone, Debug, Default)]
pub struct Rhymebook {
  tones: HashMap<char, ToneClass>,
  labels: HashMap<char, String>,
  classes: Vec<RhymeClass>,
  class_index: HashMap<String, usize>,
}

impl Rhymebook {
  pub fn from_data(data: &RhymebookData) -> Self {
    let mut book = Rhymebook::default();
    for group in data {
      for (class_name, lists) in &group.0 {
        let idx = book.class_slot(class_name);
        // Level lists first, then oblique, so an oblique reading wins within a group.
        for wanted in [ToneClass::Level, ToneClass::Oblique] {
          for (label, words) in &lists.0 {
            if canonicalize_tone_label(label) != wanted {
              continue;
            }
            for word in words {
              let mut it = word.chars();
              let ch = match (it.next(), it.next()) {
                (Some(ch), None) => ch,
                _ => {
                  debug!(target: "cilv_backend", class = %class_name, entry = %word, "Skipping non single-char rhyme book entry");
                  continue;
                }
              };
              book.tones.insert(ch, wanted);
              book.labels.insert(ch, label.clone());
              book.classes[idx].members.insert(ch);
            }
          }
        }
      }
    }
    book
  }

  fn class_slot(&mut self, name: &str) -> usize {
    if let Some(idx) = self.class_index.get(name) {
      return *idx;
    }
    let idx = self.classes.len();
    self.classes.push(RhymeClass { name: name.to_string(), members: HashSet::new() });
    self.class_index.insert(name.to_string(), idx);
    idx
  }

  pub fn tone_of(&self, ch: char) -> ToneClass {
    self.tones.get(&ch).copied().unwrap_or(ToneClass::Unknown)
  }

  /// Label the book itself used for this char, if any.
  pub fn raw_label(&self, ch: char) -> Option<&str> {
    self.labels.get(&ch).map(String::as_str)
  }

  /// Every rhyme class containing `ch`, in book order.
  pub fn classes_of(&self, ch: char) -> Vec<String> {
    self.classes
      .iter()
      .filter(|c| c.members.contains(&ch))
      .map(|c| c.name.clone())
      .collect()
  }

  pub fn class_count(&self) -> usize { self.classes.len() }

  pub fn char_count(&self) -> usize { self.tones.len() }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn book() -> Rhymebook {
    let data: RhymebookData = serde_json::from_str(
      r#"[
        {"一东": {"平": ["东", "风", "中"], "仄": ["动", "中"]}},
        {"二冬": {"平": ["冬", "风"]}},
        {"三江": {"平": ["江"], "仄": ["讲", "长江"]}}
      ]"#,
    )
    .expect("json");
    Rhymebook::from_data(&data)
  }

  #[test]
  fn labels_canonicalize_to_three_classes() {
    assert_eq!(canonicalize_tone_label("平"), ToneClass::Level);
    assert_eq!(canonicalize_tone_label("阳平"), ToneClass::Level);
    assert_eq!(canonicalize_tone_label("二声"), ToneClass::Level);
    assert_eq!(canonicalize_tone_label("入声"), ToneClass::Oblique);
    assert_eq!(canonicalize_tone_label("四声"), ToneClass::Oblique);
    assert_eq!(canonicalize_tone_label("仄声"), ToneClass::Oblique);
    assert_eq!(canonicalize_tone_label("未知"), ToneClass::Unknown);
    assert_eq!(canonicalize_tone_label(""), ToneClass::Unknown);
  }

  #[test]
  fn oblique_wins_within_group_and_later_groups_overwrite() {
    let b = book();
    assert_eq!(b.tone_of('中'), ToneClass::Oblique);
    assert_eq!(b.tone_of('东'), ToneClass::Level);
    assert_eq!(b.tone_of('讲'), ToneClass::Oblique);
    assert_eq!(b.tone_of('月'), ToneClass::Unknown);
    assert_eq!(b.raw_label('动'), Some("仄"));
  }

  #[test]
  fn chars_can_belong_to_several_classes() {
    let b = book();
    assert_eq!(b.classes_of('风'), vec!["一东".to_string(), "二冬".to_string()]);
    assert_eq!(b.classes_of('江'), vec!["三江".to_string()]);
    assert!(b.classes_of('月').is_empty());
    assert_eq!(b.class_count(), 3);
  }

  #[test]
  fn classes_keep_document_order_within_a_group() {
    let data: RhymebookData =
      serde_json::from_str(r#"[{"三江": {"平": ["窗"]}, "一东": {"平": ["窗"]}}, {"二冬": {"平": ["窗"]}}]"#)
        .expect("json");
    let b = Rhymebook::from_data(&data);
    assert_eq!(b.classes_of('窗'), vec!["三江".to_string(), "一东".to_string(), "二冬".to_string()]);
  }

  #[test]
  fn multi_char_entries_are_skipped() {
    let b = book();
    assert!(!b.classes_of('长').contains(&"三江".to_string()));
    assert_eq!(b.char_count(), 7);
  }
}
