//! Small utility helpers used across modules.

/// True if the char is a Han ideograph in the basic CJK block (U+4E00..=U+9FA5).
/// Matches the range the reference tables were authored against; extension
/// blocks do not count as verse characters.
pub fn is_han(ch: char) -> bool {
  ('\u{4E00}'..='\u{9FA5}').contains(&ch)
}

/// Remove every Unicode whitespace character.
pub fn strip_whitespace(s: &str) -> String {
  s.chars().filter(|c| !c.is_whitespace()).collect()
}

/// Keep only Han characters.
pub fn han_only(s: &str) -> String {
  s.chars().filter(|c| is_han(*c)).collect()
}

/// Log-safe truncation for large strings (char-boundary aware).
pub fn trunc_for_log(s: &str, max_chars: usize) -> String {
  let total = s.chars().count();
  if total <= max_chars {
    s.to_string()
  } else {
    let head: String = s.chars().take(max_chars).collect();
    format!("{}… ({} chars total)", head, total)
  }
}
