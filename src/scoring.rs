//! Per-character tone conformance against a form's template.

use serde::Serialize;

use crate::domain::{ToneIssue, ToneMark, ToneSymbol};
use crate::tone::Rhymebook;

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ToneScore {
  pub percentage: f64,
  pub issues: Vec<ToneIssue>,
}

/// Classify every stream char with the given rhyme book.
pub fn mark_tones(stream: &[char], book: &Rhymebook) -> Vec<ToneMark> {
  stream.iter().map(|&ch| ToneMark { ch, tone: book.tone_of(ch) }).collect()
}

/// Compare the overlapping prefix; percentage is relative to the template length.
pub fn score_tones(marks: &[ToneMark], template: &[ToneSymbol]) -> ToneScore {
  let mut conforming = 0usize;
  let mut issues = Vec::new();
  for (position, (mark, expected)) in marks.iter().zip(template).enumerate() {
    if expected.accepts(mark.tone) {
      conforming += 1;
    } else {
      issues.push(ToneIssue { word: mark.ch, actual: mark.tone, expected: *expected, position });
    }
  }
  let percentage = if template.is_empty() {
    0.0
  } else {
    100.0 * conforming as f64 / template.len() as f64
  };
  ToneScore { percentage, issues }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::domain::ToneClass::{self, *};
  use crate::domain::ToneSymbol as S;

  fn marks(pairs: &[(char, ToneClass)]) -> Vec<ToneMark> {
    pairs.iter().map(|&(ch, tone)| ToneMark { ch, tone }).collect()
  }

  #[test]
  fn perfect_conformance() {
    let m = marks(&[('春', Level), ('花', Level), ('落', Oblique), ('月', Oblique)]);
    let s = score_tones(&m, &[S::Level, S::Level, S::Oblique, S::Oblique]);
    assert_eq!(s.percentage, 100.0);
    assert!(s.issues.is_empty());
  }

  #[test]
  fn swapped_middle_scores_half() {
    let m = marks(&[('春', Level), ('落', Oblique), ('花', Level), ('月', Oblique)]);
    let s = score_tones(&m, &[S::Level, S::Level, S::Oblique, S::Oblique]);
    assert_eq!(s.percentage, 50.0);
    assert_eq!(
      s.issues,
      vec![
        ToneIssue { word: '落', actual: Oblique, expected: S::Level, position: 1 },
        ToneIssue { word: '花', actual: Level, expected: S::Oblique, position: 2 },
      ]
    );
  }

  #[test]
  fn empty_template_scores_zero() {
    let m = marks(&[('春', Level), ('花', Unknown)]);
    let s = score_tones(&m, &[]);
    assert_eq!(s.percentage, 0.0);
    assert!(s.issues.is_empty());
  }

  #[test]
  fn wildcard_accepts_anything_including_unknown() {
    let m = marks(&[('甲', Unknown), ('乙', Oblique), ('丙', Unknown)]);
    let s = score_tones(&m, &[S::Wildcard, S::Wildcard, S::Level]);
    assert!(s.issues.iter().all(|i| i.expected != S::Wildcard));
    assert_eq!(s.issues.len(), 1);
    assert_eq!(s.issues[0].actual, Unknown);
    assert!((s.percentage - 200.0 / 3.0).abs() < 1e-9);
  }

  #[test]
  fn short_stream_is_scored_against_full_template() {
    let m = marks(&[('春', Level)]);
    let s = score_tones(&m, &[S::Level, S::Oblique]);
    assert_eq!(s.percentage, 50.0);
    assert!(s.issues.is_empty());
  }
}
