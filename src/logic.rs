//! Core operations shared by both HTTP and WebSocket handlers.
//!
//! This includes:
//!   - Full analysis: normalize → match form → score tones → resolve rhyme feet
//!   - Re-resolving one rhyme-foot pattern for a form
//!   - Fill-word frameworks for a named form
//!   - Single-character tone lookup and the form list
//!
//! All of these are synchronous and read only the shared reference tables.

use serde::Serialize;
use tracing::{debug, info, instrument};

use crate::domain::{FormKey, ToneClass, ToneIssue, ToneMark, ToneSymbol};
use crate::error::AnalysisError;
use crate::framework::{build_framework, Framework};
use crate::normalize::{normalize, PositionMap};
use crate::pinyin::{modern_tone_label, reading_of};
use crate::registry::{parse_template, FormSummary};
use crate::rhyme::{resolve_pattern, resolve_patterns, PatternResolution};
use crate::scoring::{mark_tones, score_tones};
use crate::tone::canonicalize_tone_label;
use crate::state::AppState;
use crate::util::trunc_for_log;

#[derive(Clone, Debug, Serialize)]
pub struct AnalysisResult {
  pub text: String,
  pub original_text: String,
  pub processed_text: String,
  pub cipai_name: String,
  pub author: String,
  pub cipai_intro: String,
  /// Other forms with the same structure; the first registered one was used.
  pub alternatives: Vec<FormKey>,
  pub score: f64,
  pub issues: Vec<ToneIssue>,
  pub tone_text: Vec<ToneMark>,
  pub template: Vec<ToneSymbol>,
  /// Default rhyme-foot resolution (first registered pattern), if any.
  pub yunjiao: Option<PatternResolution>,
  pub yunjiao_options: Vec<PatternResolution>,
  pub length: usize,
  pub split_length: Vec<usize>,
  /// Stream index → index into `text`.
  pub position_map: PositionMap,
}

/// Diagnostics returned when no form has the text's structure.
#[derive(Clone, Debug, Serialize)]
pub struct NoMatch {
  pub text: String,
  pub processed_text: String,
  pub length: usize,
  pub split_length: Vec<usize>,
}

#[derive(Clone, Debug)]
pub enum AnalysisOutcome {
  Matched(Box<AnalysisResult>),
  Unmatched(NoMatch),
}

#[derive(Clone, Debug, Serialize)]
pub struct FrameworkOut {
  pub cipai_name: String,
  pub author: String,
  pub total_chars: usize,
  pub tone_pattern: Vec<ToneSymbol>,
  pub split_length: Vec<usize>,
  pub framework: Framework,
}

#[derive(Clone, Debug, Serialize)]
pub struct CharTone {
  pub char: char,
  pub tone: ToneClass,
  /// Label as written in the rhyme book ("未知" when absent).
  pub original_tone: String,
  pub pinyin: Option<String>,
  /// Tone class of the modern reading, independent of the rhyme book.
  pub modern_tone: ToneClass,
}

#[derive(Clone, Debug, Serialize)]
pub struct FormList {
  pub cipai_list: Vec<FormSummary>,
  pub default_index: usize,
}

fn rhymebook_choice<'a>(state: &'a AppState, choice: Option<&'a str>) -> &'a str {
  match choice {
    Some(c) if !c.trim().is_empty() => c.trim(),
    _ => state.config.default_rhymebook.as_str(),
  }
}

fn round2(x: f64) -> f64 {
  (x * 100.0).round() / 100.0
}

#[instrument(level = "info", skip(state, text), fields(text_len = text.len()))]
pub fn analyze(state: &AppState, text: &str, rhymebook: Option<&str>) -> Result<AnalysisOutcome, AnalysisError> {
  if text.trim().is_empty() {
    return Err(AnalysisError::InvalidRequest("empty text".into()));
  }
  let book = state.data.rhymebook(rhymebook_choice(state, rhymebook))?;
  let forms = state.data.forms()?;
  let feet = state.data.rhyme_feet()?;

  let norm = normalize(text);
  let Some(m) = forms.match_form(norm.len(), &norm.signature) else {
    info!(target: "analysis", total_chars = norm.len(), split_length = ?norm.signature, text = %trunc_for_log(&norm.cleaned, 40), "No form matched");
    return Ok(AnalysisOutcome::Unmatched(NoMatch {
      text: text.to_string(),
      processed_text: norm.processed(),
      length: norm.len(),
      split_length: norm.signature,
    }));
  };

  let marks = mark_tones(&norm.stream, book);
  let score = score_tones(&marks, &m.template);
  let options = resolve_patterns(&m.form.key, &norm.stream, &norm.position_map, feet, book);
  info!(target: "analysis", form = %m.form.key, score = %format!("{:.2}", score.percentage), issues = score.issues.len(), patterns = options.len(), "Text analyzed");

  Ok(AnalysisOutcome::Matched(Box::new(AnalysisResult {
    processed_text: norm.processed(),
    original_text: text.to_string(),
    cipai_name: m.form.key.name.clone(),
    author: m.form.key.author.clone(),
    cipai_intro: state.data.intro(&m.form.key.name).unwrap_or_default().to_string(),
    alternatives: m.alternatives,
    score: round2(score.percentage),
    issues: score.issues,
    tone_text: marks,
    template: m.template,
    yunjiao: options.first().cloned(),
    yunjiao_options: options,
    length: norm.len(),
    split_length: norm.signature,
    position_map: norm.position_map,
    text: norm.cleaned,
  })))
}

/// Re-derive a single rhyme-foot pattern. Same result as the matching element of
/// `analyze`'s `yunjiao_options` for the same inputs.
#[instrument(level = "info", skip(state, text), fields(text_len = text.len(), %form_name, %author, pattern_id = pattern_id))]
pub fn reselect_rhyme_pattern(
  state: &AppState,
  text: &str,
  rhymebook: Option<&str>,
  form_name: &str,
  author: &str,
  pattern_id: usize,
) -> Result<PatternResolution, AnalysisError> {
  if text.trim().is_empty() || form_name.trim().is_empty() || author.trim().is_empty() {
    return Err(AnalysisError::InvalidRequest("text, form name and author are required".into()));
  }
  let book = state.data.rhymebook(rhymebook_choice(state, rhymebook))?;
  let feet = state.data.rhyme_feet()?;

  let key = FormKey::new(form_name, author);
  let patterns = feet.patterns_for(&key);
  let positions = patterns.get(pattern_id).ok_or_else(|| {
    AnalysisError::InvalidSelection(format!(
      "rhyme-foot pattern {} not found for {} ({} known)",
      pattern_id,
      key,
      patterns.len()
    ))
  })?;

  let norm = normalize(text);
  let r = resolve_pattern(pattern_id, positions, &norm.stream, &norm.position_map, book);
  debug!(target: "analysis", form = %key, pattern_id, words = r.words.len(), "Rhyme-foot pattern reselected");
  Ok(r)
}

#[instrument(level = "info", skip(state), fields(%form_name, %author))]
pub fn build_fillword_framework(state: &AppState, form_name: &str, author: &str) -> Result<FrameworkOut, AnalysisError> {
  if form_name.trim().is_empty() || author.trim().is_empty() {
    return Err(AnalysisError::InvalidRequest("form name and author are required".into()));
  }
  let forms = state.data.forms()?;
  let key = FormKey::new(form_name, author);
  let form = forms
    .find(&key)
    .ok_or_else(|| AnalysisError::InvalidSelection(format!("no form registered as {}", key)))?;

  let tone_pattern = parse_template(&form.template_raw);
  let split_length = form.signature.clone().unwrap_or_default();
  let framework = build_framework(&tone_pattern, &split_length);
  Ok(FrameworkOut {
    cipai_name: form.key.name.clone(),
    author: form.key.author.clone(),
    total_chars: form.total_chars,
    tone_pattern,
    split_length,
    framework,
  })
}

#[instrument(level = "debug", skip(state))]
pub fn classify_char_tone(state: &AppState, input: &str) -> Result<CharTone, AnalysisError> {
  let mut chars = input.trim().chars();
  let ch = match (chars.next(), chars.next()) {
    (Some(ch), None) => ch,
    (None, _) => return Err(AnalysisError::InvalidRequest("missing character".into())),
    _ => return Err(AnalysisError::InvalidRequest("expected a single character".into())),
  };
  let book = state.data.rhymebook(&state.config.char_tone_rhymebook)?;

  let original_tone = book.raw_label(ch).unwrap_or(ToneClass::Unknown.label()).to_string();
  let modern_tone = modern_tone_label(ch)
    .map(|l| canonicalize_tone_label(&l))
    .unwrap_or(ToneClass::Unknown);
  Ok(CharTone {
    char: ch,
    tone: canonicalize_tone_label(&original_tone),
    original_tone,
    pinyin: reading_of(ch),
    modern_tone,
  })
}

pub fn list_forms(state: &AppState) -> Result<FormList, AnalysisError> {
  let cipai_list = state.data.forms()?.summaries();
  let default_index = state
    .config
    .default_form
    .as_ref()
    .and_then(|d| {
      cipai_list
        .iter()
        .position(|f| f.cipai_name == d.name && f.author == d.author && f.total_chars == d.total_chars)
    })
    .unwrap_or(0);
  Ok(FormList { cipai_list, default_index })
}

#[cfg(test)]
pub(crate) mod fixtures {
  use std::collections::HashMap;

  use crate::config::{AppConfig, DefaultFormCfg};
  use crate::domain::{Form, FormKey};
  use crate::loader::parse_rhymebook;
  use crate::registry::{parse_signature, FormRegistry};
  use crate::rhyme::RhymeFootRegistry;
  use crate::state::{AppState, LoadedRhymebook, ReferenceData};

  pub fn form(name: &str, author: &str, sig: &str, template: &str) -> Form {
    let signature = parse_signature(sig);
    Form {
      key: FormKey::new(name, author),
      total_chars: signature.as_ref().map(|s| s.iter().sum()).unwrap_or(0),
      signature_raw: sig.to_string(),
      signature,
      template_raw: template.to_string(),
    }
  }

  /// 春/花 level, 落/月 oblique; one 4-char form with two rhyme-foot patterns.
  pub fn state() -> AppState {
    let book = parse_rhymebook(
      r#"[{"六麻": {"平": ["花"]}}, {"十一真": {"平": ["春"]}}, {"六月": {"仄": ["落", "月"]}}, {"十药": {"仄": ["落"]}}]"#
        .as_bytes(),
    );
    let forms = FormRegistry::new(vec![
      form("春词", "无名氏", "[2, 2]", "平平仄仄"),
      form("春词", "佚名", "[2, 2]", "仄仄平平"),
      form("长调", "某", "[3, 5]", "中平仄，仄平平中仄"),
    ]);
    let mut feet = RhymeFootRegistry::default();
    feet.insert(FormKey::new("春词", "无名氏"), vec![2, 4]);
    feet.insert(FormKey::new("春词", "无名氏"), vec![2, 3]);

    let config = AppConfig {
      default_form: Some(DefaultFormCfg { name: "长调".into(), author: "某".into(), total_chars: 8 }),
      ..AppConfig::default()
    };
    AppState::from_parts(
      config,
      ReferenceData {
        rhymebooks: vec![
          LoadedRhymebook { id: "1".into(), name: "测试韵".into(), book: book.clone() },
          LoadedRhymebook { id: "2".into(), name: "测试新韵".into(), book },
        ],
        forms: Ok(forms),
        rhyme_feet: Ok(feet),
        intros: HashMap::from([("春词".to_string(), "测试用词牌。".to_string())]),
      },
    )
  }
}
