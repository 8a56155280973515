//! Fill-word framework: split a tone template into two stanzas and, within
//! each, into sentences, using only the signature's length arithmetic.

use serde::Serialize;

use crate::domain::ToneSymbol;

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Stanza {
  pub name: String,
  pub length: usize,
  pub sentences: Vec<Vec<ToneSymbol>>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Framework {
  pub stanzas: Vec<Stanza>,
  pub total_chars: usize,
}

pub fn build_framework(template: &[ToneSymbol], signature: &[usize]) -> Framework {
  let total = template.len();
  let synthesized;
  let signature = if signature.is_empty() {
    synthesized = [total / 2, total - total / 2];
    &synthesized[..]
  } else {
    signature
  };

  let mid = total / 2;
  let mut boundary = mid;
  let mut acc = 0usize;
  for len in signature {
    let next = acc.saturating_add(*len);
    if next >= mid {
      boundary = next;
      break;
    }
    acc = next;
  }

  let split_at = boundary.min(total);
  let first_segments = segments_covering(signature, boundary);
  let (first_tones, second_tones) = template.split_at(split_at);

  let stanzas = vec![
    Stanza {
      name: "first stanza".into(),
      length: first_tones.len(),
      sentences: slice_sentences(first_tones, &signature[..first_segments]),
    },
    Stanza {
      name: "second stanza".into(),
      length: second_tones.len(),
      sentences: slice_sentences(second_tones, &signature[first_segments..]),
    },
  ];
  Framework { stanzas, total_chars: total }
}

/// Number of leading segments whose cumulative length first reaches `target`.
fn segments_covering(signature: &[usize], target: usize) -> usize {
  let mut acc = 0usize;
  for (i, len) in signature.iter().enumerate() {
    acc = acc.saturating_add(*len);
    if acc >= target {
      return i + 1;
    }
  }
  signature.len()
}

fn slice_sentences(tones: &[ToneSymbol], lengths: &[usize]) -> Vec<Vec<ToneSymbol>> {
  let mut out = Vec::new();
  let mut pos = 0usize;
  for &len in lengths {
    if pos >= tones.len() {
      break;
    }
    let end = pos.saturating_add(len).min(tones.len());
    if end > pos {
      out.push(tones[pos..end].to_vec());
    }
    pos = pos.saturating_add(len);
  }
  out
}
