/* src/server/core/rust/src/matcher.rs */

//! Ranks declared locales against the client's preferred language tags.

use std::cmp::Ordering;

use crate::locale::Locale;

#[derive(Debug, Clone, PartialEq)]
pub struct BrowserLocaleMatch {
  pub code: String,
  pub score: f64,
}

/// Two passes over the preference list: the first exact tag match scores
/// `1 - index / len`, the first language-subtag match `0.999 - index / len`.
pub fn match_browser_locale(
  locales: &[Locale],
  browser_locales: &[String],
) -> Vec<BrowserLocaleMatch> {
  let mut matches = Vec::new();
  #[allow(clippy::cast_precision_loss)]
  let len = browser_locales.len() as f64;

  for (index, tag) in browser_locales.iter().enumerate() {
    if let Some(locale) = locales.iter().find(|l| l.match_tag().eq_ignore_ascii_case(tag)) {
      #[allow(clippy::cast_precision_loss)]
      let score = 1.0 - index as f64 / len;
      matches.push(BrowserLocaleMatch { code: locale.code.clone(), score });
      break;
    }
  }

  for (index, tag) in browser_locales.iter().enumerate() {
    let language = primary_subtag(tag);
    if let Some(locale) = locales.iter().find(|l| primary_subtag(l.match_tag()) == language) {
      #[allow(clippy::cast_precision_loss)]
      let score = 0.999 - index as f64 / len;
      matches.push(BrowserLocaleMatch { code: locale.code.clone(), score });
      break;
    }
  }

  matches
}

/// Higher score first; on a tie the longer (more specific) code wins.
pub fn compare_browser_locale(a: &BrowserLocaleMatch, b: &BrowserLocaleMatch) -> Ordering {
  if a.score == b.score {
    b.code.len().cmp(&a.code.len())
  } else {
    b.score.partial_cmp(&a.score).unwrap_or(Ordering::Equal)
  }
}

/// Best declared locale for the given preference list.
pub fn find_browser_locale(locales: &[Locale], browser_locales: &[String]) -> Option<String> {
  let mut matches = match_browser_locale(locales, browser_locales);
  matches.sort_by(compare_browser_locale);
  matches.into_iter().next().map(|m| m.code)
}

/// Parse an `Accept-Language` header into tags ordered by q-value.
/// Malformed entries are skipped; `*` and `q=0` entries are dropped.
pub fn parse_accept_language(header: &str) -> Vec<String> {
  let mut entries: Vec<(&str, f64)> = Vec::new();
  for part in header.split(',') {
    let part = part.trim();
    if part.is_empty() {
      continue;
    }
    let mut segments = part.split(';');
    let tag = segments.next().unwrap_or_default().trim();
    if tag == "*" || !is_language_tag(tag) {
      continue;
    }
    let mut q = Some(1.0_f64);
    for s in segments {
      if let Some(val) = s.trim().strip_prefix("q=") {
        q = val.trim().parse::<f64>().ok().filter(|v| (0.0..=1.0).contains(v));
      }
    }
    match q {
      Some(q) if q > 0.0 => entries.push((tag, q)),
      _ => {}
    }
  }

  // Stable: equal weights keep header order
  entries.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(Ordering::Equal));
  entries.into_iter().map(|(tag, _)| tag.to_string()).collect()
}

fn primary_subtag(tag: &str) -> String {
  tag.split(['-', '_']).next().unwrap_or_default().to_ascii_lowercase()
}

fn is_language_tag(tag: &str) -> bool {
  let mut parts = tag.split('-');
  let primary = parts.next().unwrap_or_default();
  if primary.is_empty() || primary.len() > 8 || !primary.chars().all(|c| c.is_ascii_alphabetic()) {
    return false;
  }
  parts.all(|p| !p.is_empty() && p.len() <= 8 && p.chars().all(|c| c.is_ascii_alphanumeric()))
}
