/* src/server/core/rust/src/config.rs */

use std::path::{Path, PathBuf};

use serde::{Deserialize, Deserializer, Serialize};

use crate::errors::LocaleError;
use crate::locale::{Locale, LocaleCodec, LocaleInput, normalize_locales};
use crate::messages::FallbackLocale;

pub const CONFIG_FILE: &str = "i18n.toml";

/// How locale codes appear in URLs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Strategy {
  NoPrefix,
  Prefix,
  #[default]
  PrefixExceptDefault,
  PrefixAndDefault,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum RedirectOn {
  #[default]
  #[serde(rename = "root")]
  Root,
  #[serde(rename = "no_prefix", alias = "no prefix")]
  NoPrefix,
  #[serde(rename = "all")]
  All,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct DetectBrowserLanguage {
  #[serde(default = "default_true")]
  pub use_cookie: bool,
  #[serde(default = "default_cookie_key")]
  pub cookie_key: String,
  #[serde(default)]
  pub cookie_domain: Option<String>,
  #[serde(default)]
  pub cookie_secure: bool,
  #[serde(default)]
  pub cookie_cross_origin: bool,
  #[serde(default)]
  pub redirect_on: RedirectOn,
  #[serde(default)]
  pub always_redirect: bool,
  #[serde(default)]
  pub fallback_locale: Option<String>,
}

impl Default for DetectBrowserLanguage {
  fn default() -> Self {
    Self {
      use_cookie: true,
      cookie_key: default_cookie_key(),
      cookie_domain: None,
      cookie_secure: false,
      cookie_cross_origin: false,
      redirect_on: RedirectOn::Root,
      always_redirect: false,
      fallback_locale: None,
    }
  }
}

fn default_true() -> bool {
  true
}

fn default_cookie_key() -> String {
  "i18n_redirected".to_string()
}

/// `detect_browser_language = false` disables detection, a table configures it.
fn deserialize_detect<'de, D>(deserializer: D) -> Result<Option<DetectBrowserLanguage>, D::Error>
where
  D: Deserializer<'de>,
{
  #[derive(Deserialize)]
  #[serde(untagged)]
  enum Toggle {
    Enabled(bool),
    Options(DetectBrowserLanguage),
  }

  Ok(match Toggle::deserialize(deserializer)? {
    Toggle::Enabled(true) => Some(DetectBrowserLanguage::default()),
    Toggle::Enabled(false) => None,
    Toggle::Options(opts) => Some(opts),
  })
}

fn default_detect() -> Option<DetectBrowserLanguage> {
  Some(DetectBrowserLanguage::default())
}

fn default_separator() -> String {
  "___".to_string()
}

fn default_suffix() -> String {
  "default".to_string()
}

fn default_protocol() -> String {
  "https".to_string()
}

/// Raw `[i18n]` options as written in `i18n.toml`.
#[derive(Debug, Clone, Deserialize)]
pub struct I18nOptions {
  #[serde(default)]
  pub strategy: Strategy,
  /// Falls back to the first declared locale.
  #[serde(default)]
  pub default_locale: Option<String>,
  pub locales: Vec<LocaleInput>,
  #[serde(default = "default_detect", deserialize_with = "deserialize_detect")]
  pub detect_browser_language: Option<DetectBrowserLanguage>,
  #[serde(default)]
  pub different_domains: bool,
  #[serde(default)]
  pub trailing_slash: bool,
  #[serde(default = "default_separator")]
  pub routes_name_separator: String,
  #[serde(default = "default_suffix")]
  pub default_locale_route_name_suffix: String,
  #[serde(default)]
  pub base_url: Option<String>,
  #[serde(default)]
  pub fallback_locale: Option<FallbackLocale>,
  #[serde(default = "default_protocol")]
  pub domain_protocol: String,
}

impl I18nOptions {
  pub fn new(locales: &[&str], default_locale: &str) -> Self {
    Self {
      strategy: Strategy::default(),
      default_locale: Some(default_locale.to_string()),
      locales: locales.iter().map(|c| LocaleInput::from(*c)).collect(),
      detect_browser_language: default_detect(),
      different_domains: false,
      trailing_slash: false,
      routes_name_separator: default_separator(),
      default_locale_route_name_suffix: default_suffix(),
      base_url: None,
      fallback_locale: None,
      domain_protocol: default_protocol(),
    }
  }

  pub fn strategy(mut self, strategy: Strategy) -> Self {
    self.strategy = strategy;
    self
  }

  pub fn detect_browser_language(mut self, detect: Option<DetectBrowserLanguage>) -> Self {
    self.detect_browser_language = detect;
    self
  }
}

#[derive(Deserialize)]
struct ConfigFile {
  i18n: I18nOptions,
}

/// Validated runtime configuration, shared read-only by every component.
#[derive(Debug, Clone)]
pub struct I18nConfig {
  pub strategy: Strategy,
  pub default_locale: String,
  pub locales: Vec<Locale>,
  pub detect_browser_language: Option<DetectBrowserLanguage>,
  pub different_domains: bool,
  pub trailing_slash: bool,
  pub routes_name_separator: String,
  pub default_locale_route_name_suffix: String,
  pub base_url: Option<String>,
  pub fallback_locale: Option<FallbackLocale>,
  pub domain_protocol: String,
  codec: LocaleCodec,
}

impl I18nConfig {
  pub fn from_options(opts: I18nOptions) -> Result<Self, LocaleError> {
    let locales = normalize_locales(&opts.locales)?;
    let codes: Vec<String> = locales.iter().map(|l| l.code.clone()).collect();

    let default_locale = match opts.default_locale.filter(|d| !d.is_empty()) {
      Some(d) if codes.contains(&d) => d,
      Some(d) => return Err(LocaleError::UnknownDefaultLocale { default: d, locales: codes }),
      None => codes[0].clone(),
    };

    if let Some(ref detect) = opts.detect_browser_language {
      if detect.use_cookie && detect.cookie_key.trim().is_empty() {
        return Err(LocaleError::config("detect_browser_language.cookie_key must not be empty"));
      }
      if let Some(ref fallback) = detect.fallback_locale
        && !codes.contains(fallback)
      {
        return Err(LocaleError::config(format!(
          "detect_browser_language.fallback_locale \"{fallback}\" is not in locales {codes:?}"
        )));
      }
    }

    let codec =
      LocaleCodec::new(&codes, &opts.routes_name_separator, &opts.default_locale_route_name_suffix)?;

    Ok(Self {
      strategy: opts.strategy,
      default_locale,
      locales,
      detect_browser_language: opts.detect_browser_language,
      different_domains: opts.different_domains,
      trailing_slash: opts.trailing_slash,
      routes_name_separator: opts.routes_name_separator,
      default_locale_route_name_suffix: opts.default_locale_route_name_suffix,
      base_url: opts.base_url.map(|u| u.trim_end_matches('/').to_string()),
      fallback_locale: opts.fallback_locale,
      domain_protocol: opts.domain_protocol,
      codec,
    })
  }

  pub fn codec(&self) -> &LocaleCodec {
    &self.codec
  }

  pub fn locale(&self, code: &str) -> Option<&Locale> {
    self.locales.iter().find(|l| l.code == code)
  }

  pub fn is_locale(&self, code: &str) -> bool {
    self.locale(code).is_some()
  }

  pub fn codes(&self) -> impl Iterator<Item = &str> {
    self.locales.iter().map(|l| l.code.as_str())
  }

  /// Whether routes for `code` carry a `/code` path prefix.
  pub fn is_prefixed(&self, code: &str) -> bool {
    if self.different_domains {
      return false;
    }
    match self.strategy {
      Strategy::NoPrefix => false,
      Strategy::Prefix | Strategy::PrefixAndDefault => true,
      Strategy::PrefixExceptDefault => code != self.default_locale,
    }
  }
}

/// Parse the `[i18n]` table out of a TOML document.
pub fn parse_i18n_config(content: &str) -> Result<I18nConfig, LocaleError> {
  let file: ConfigFile = toml::from_str(content)?;
  I18nConfig::from_options(file.i18n)
}

/// Walk upward from `start` to find `i18n.toml`, like Cargo.toml discovery
pub fn find_i18n_config(start: &Path) -> Result<PathBuf, LocaleError> {
  let mut dir = start.canonicalize()?;
  loop {
    let candidate = dir.join(CONFIG_FILE);
    if candidate.is_file() {
      return Ok(candidate);
    }
    if !dir.pop() {
      return Err(LocaleError::config(format!(
        "{CONFIG_FILE} not found (searched upward from {})",
        start.display()
      )));
    }
  }
}

pub fn load_i18n_config(path: &Path) -> Result<I18nConfig, LocaleError> {
  let content = std::fs::read_to_string(path)?;
  let config = parse_i18n_config(&content)?;
  tracing::debug!(
    path = %path.display(),
    locales = config.locales.len(),
    default = %config.default_locale,
    "loaded i18n config"
  );
  Ok(config)
}
