/* src/server/core/rust/src/locale.rs */

//! Locale declarations and the codec that reads locale codes back out of
//! localized route names and path prefixes.

use std::collections::HashSet;

use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::errors::LocaleError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
  #[default]
  Ltr,
  Rtl,
  Auto,
}

impl Direction {
  pub fn as_str(self) -> &'static str {
    match self {
      Self::Ltr => "ltr",
      Self::Rtl => "rtl",
      Self::Auto => "auto",
    }
  }
}

/// A declared locale after normalization. Immutable once the config is built.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Locale {
  pub code: String,
  /// BCP-47 tag, required for SEO alternates.
  pub language: Option<String>,
  pub dir: Direction,
  pub domain: Option<String>,
  pub domains: Vec<String>,
  pub is_catchall_locale: bool,
  pub default_for_domains: Vec<String>,
}

impl Locale {
  pub fn new(code: impl Into<String>) -> Self {
    Self {
      code: code.into(),
      language: None,
      dir: Direction::Ltr,
      domain: None,
      domains: Vec::new(),
      is_catchall_locale: false,
      default_for_domains: Vec::new(),
    }
  }

  pub fn language(mut self, tag: impl Into<String>) -> Self {
    self.language = Some(tag.into());
    self
  }

  pub fn dir(mut self, dir: Direction) -> Self {
    self.dir = dir;
    self
  }

  pub fn domain(mut self, domain: impl Into<String>) -> Self {
    self.domain = Some(domain.into());
    self
  }

  /// Tag used for browser matching: the declared language, else the code.
  pub fn match_tag(&self) -> &str {
    self.language.as_deref().unwrap_or(&self.code)
  }

  /// Whether `host` (already normalized) is one of this locale's domains.
  pub fn serves_host(&self, host: &str) -> bool {
    self.domain.iter().chain(self.domains.iter()).any(|d| normalize_host(d) == host)
  }

  pub fn is_default_for(&self, host: &str) -> bool {
    self.default_for_domains.iter().any(|d| normalize_host(d) == host)
  }
}

/// Locale as written in configuration: a bare code or a full table.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum LocaleInput {
  Code(String),
  Object(LocaleObject),
}

impl From<&str> for LocaleInput {
  fn from(code: &str) -> Self {
    Self::Code(code.to_string())
  }
}

impl From<LocaleObject> for LocaleInput {
  fn from(obj: LocaleObject) -> Self {
    Self::Object(obj)
  }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct LocaleObject {
  pub code: String,
  #[serde(default)]
  pub language: Option<String>,
  #[serde(default)]
  pub dir: Option<Direction>,
  #[serde(default)]
  pub domain: Option<String>,
  #[serde(default)]
  pub domains: Vec<String>,
  #[serde(default)]
  pub is_catchall_locale: bool,
  #[serde(default)]
  pub default_for_domains: Vec<String>,
}

/// Normalize declared locales into the canonical ordered list.
pub fn normalize_locales(inputs: &[LocaleInput]) -> Result<Vec<Locale>, LocaleError> {
  if inputs.is_empty() {
    return Err(LocaleError::EmptyLocales);
  }

  let mut seen = HashSet::new();
  let mut locales = Vec::with_capacity(inputs.len());
  for input in inputs {
    let locale = match input {
      LocaleInput::Code(code) => Locale::new(code.trim()),
      LocaleInput::Object(obj) => Locale {
        code: obj.code.trim().to_string(),
        language: obj.language.clone().filter(|l| !l.is_empty()),
        dir: obj.dir.unwrap_or_default(),
        domain: obj.domain.clone().filter(|d| !d.is_empty()),
        domains: obj.domains.clone(),
        is_catchall_locale: obj.is_catchall_locale,
        default_for_domains: obj.default_for_domains.clone(),
      },
    };
    if locale.code.is_empty() {
      return Err(LocaleError::EmptyLocaleCode);
    }
    if !seen.insert(locale.code.clone()) {
      return Err(LocaleError::DuplicateLocale(locale.code));
    }
    locales.push(locale);
  }
  Ok(locales)
}

/// Lowercase, drop any scheme, path and port.
pub fn normalize_host(raw: &str) -> String {
  let raw = raw.trim();
  let without_scheme = raw.split_once("://").map_or(raw, |(_, rest)| rest);
  let authority = without_scheme.split('/').next().unwrap_or_default();
  let host = match authority.rsplit_once(':') {
    Some((h, port)) if port.chars().all(|c| c.is_ascii_digit()) => h,
    _ => authority,
  };
  host.to_ascii_lowercase()
}

/// Find the locale serving `host` when locales are split across domains.
///
/// Several locales may share a host through `domains`; the one listing the
/// host in `default_for_domains` wins, otherwise the first declared.
/// Unmatched hosts go to the catch-all locale if one is flagged.
pub fn locale_for_host<'a>(locales: &'a [Locale], host: &str) -> Option<&'a Locale> {
  let host = normalize_host(host);
  let candidates: Vec<&Locale> = locales.iter().filter(|l| l.serves_host(&host)).collect();
  match candidates.as_slice() {
    [] => locales.iter().find(|l| l.is_catchall_locale),
    [only] => Some(*only),
    many => many.iter().copied().find(|l| l.is_default_for(&host)).or(Some(many[0])),
  }
}

/// Encodes and decodes the locale segment of route names and paths.
#[derive(Debug, Clone)]
pub struct LocaleCodec {
  codes: Vec<String>,
  separator: String,
  default_suffix: String,
  name_re: Regex,
  path_re: Regex,
}

impl LocaleCodec {
  pub fn new(
    codes: &[String],
    separator: &str,
    default_suffix: &str,
  ) -> Result<Self, LocaleError> {
    if separator.is_empty() {
      return Err(LocaleError::config("routes_name_separator must not be empty"));
    }
    // Longest first so "en-US" is tried before "en".
    let mut sorted: Vec<&String> = codes.iter().collect();
    sorted.sort_by_key(|c| std::cmp::Reverse(c.len()));
    let alternation = sorted.iter().map(|c| regex::escape(c)).collect::<Vec<_>>().join("|");

    let sep = regex::escape(separator);
    let suffix = regex::escape(default_suffix);
    let name_re = Regex::new(&format!("^(.+?){sep}({alternation})(?:{sep}{suffix})?$"))
      .map_err(|e| LocaleError::config(format!("locale name pattern: {e}")))?;
    let path_re = Regex::new(&format!("^/({alternation})(?:/|$)"))
      .map_err(|e| LocaleError::config(format!("locale path pattern: {e}")))?;

    Ok(Self {
      codes: codes.to_vec(),
      separator: separator.to_string(),
      default_suffix: default_suffix.to_string(),
      name_re,
      path_re,
    })
  }

  pub fn separator(&self) -> &str {
    &self.separator
  }

  /// `base + sep + code`, plus `sep + default_suffix` for the unprefixed
  /// default-locale duplicate.
  pub fn localized_name(&self, base: &str, code: &str, default_variant: bool) -> String {
    let mut name = format!("{base}{}{code}", self.separator);
    if default_variant {
      name.push_str(&self.separator);
      name.push_str(&self.default_suffix);
    }
    name
  }

  /// Locale code embedded in a localized route name, if it is a known code.
  pub fn from_route_name(&self, name: &str) -> Option<&str> {
    let caps = self.name_re.captures(name)?;
    self.known(caps.get(2)?.as_str())
  }

  /// Locale code in the first path segment, if it is a known code.
  pub fn from_path(&self, path: &str) -> Option<&str> {
    let path = path.split(['?', '#']).next().unwrap_or_default();
    let caps = self.path_re.captures(path)?;
    self.known(caps.get(1)?.as_str())
  }

  /// Route name with its locale suffix (and default suffix) removed.
  pub fn base_name<'a>(&self, name: &'a str) -> &'a str {
    self.name_re.captures(name).and_then(|c| c.get(1)).map_or(name, |m| m.as_str())
  }

  /// Path with its recognized locale prefix removed; always starts with `/`.
  pub fn strip_prefix<'a>(&self, path: &'a str) -> &'a str {
    match self.from_path(path) {
      Some(code) => {
        let rest = &path[code.len() + 1..];
        if rest.is_empty() || rest.starts_with(['?', '#']) { "/" } else { rest }
      }
      None => path,
    }
  }

  fn known(&self, code: &str) -> Option<&str> {
    self.codes.iter().find(|c| *c == code).map(String::as_str)
  }
}
