//! Modern Mandarin readings for single characters, via the `pinyin` crate.
//!
//! Example:
//!   '中' → reading "zhōng", modern tone label "1" (level)
use pinyin::ToPinyin;

/// Reading with tone diacritics, e.g. "zhōng". `None` for non-Han chars.
pub fn reading_of(ch: char) -> Option<String> {
  ch.to_pinyin().map(|py| py.with_tone().to_string())
}

/// Tone number of the default reading as a label ("1".."4"), if the reading carries one.
pub fn modern_tone_label(ch: char) -> Option<String> {
  let numbered = ch.to_pinyin()?.with_tone_num_end().to_string();
  numbered
    .chars()
    .last()
    .filter(|c| c.is_ascii_digit())
    .map(|c| c.to_string())
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn readings_for_han_only() {
    assert_eq!(reading_of('中').as_deref(), Some("zhōng"));
    assert_eq!(modern_tone_label('中').as_deref(), Some("1"));
    assert_eq!(modern_tone_label('月').as_deref(), Some("4"));
    assert_eq!(reading_of('，'), None);
  }
}
