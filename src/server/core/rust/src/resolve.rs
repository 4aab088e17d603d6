/* src/server/core/rust/src/resolve.rs */

//! Per-request locale detection: route locale, then cookie, then
//! Accept-Language, then the configured fallback, plus the redirect policy.

use std::sync::Arc;

use crate::config::{DetectBrowserLanguage, I18nConfig, RedirectOn, Strategy};
use crate::cookie::{LocaleCookie, parse_cookie};
use crate::errors::LocaleError;
use crate::locale::{locale_for_host, normalize_host};
use crate::matcher::{find_browser_locale, parse_accept_language};
use crate::routes::{RouteTable, add_prefix, fill_template, normalize_trailing_slash};

/// Request-scoped signals, borrowed from the incoming request.
#[derive(Debug, Clone, Copy, Default)]
pub struct ResolveData<'a> {
  /// Request path, optionally with query and hash.
  pub path: &'a str,
  pub route_name: Option<&'a str>,
  pub cookie_header: Option<&'a str>,
  pub accept_language: Option<&'a str>,
  pub host: Option<&'a str>,
  /// Locale already active for this client; only meaningful under `no_prefix`.
  pub current_locale: Option<&'a str>,
}

/// One link of the detection chain. Returns a declared locale code or `None`
/// to defer to the next strategy.
pub trait ResolveStrategy: Send + Sync {
  fn kind(&self) -> &'static str;
  fn resolve(&self, data: &ResolveData<'_>, config: &I18nConfig) -> Option<String>;
}

struct FromCookie {
  key: String,
}

impl ResolveStrategy for FromCookie {
  fn kind(&self) -> &'static str {
    "cookie"
  }

  fn resolve(&self, data: &ResolveData<'_>, config: &I18nConfig) -> Option<String> {
    let value = parse_cookie(data.cookie_header?, &self.key)?;
    config.is_locale(value).then(|| value.to_string())
  }
}

struct FromAcceptLanguage;

impl ResolveStrategy for FromAcceptLanguage {
  fn kind(&self) -> &'static str {
    "accept_language"
  }

  fn resolve(&self, data: &ResolveData<'_>, config: &I18nConfig) -> Option<String> {
    let tags = parse_accept_language(data.accept_language?);
    find_browser_locale(&config.locales, &tags)
  }
}

pub fn from_cookie(key: impl Into<String>) -> Box<dyn ResolveStrategy> {
  Box::new(FromCookie { key: key.into() })
}

pub fn from_accept_language() -> Box<dyn ResolveStrategy> {
  Box::new(FromAcceptLanguage)
}

/// Cookie (when enabled) then Accept-Language.
pub fn default_strategies(config: &I18nConfig) -> Vec<Box<dyn ResolveStrategy>> {
  let mut strategies = Vec::new();
  if let Some(ref detect) = config.detect_browser_language
    && detect.use_cookie
  {
    strategies.push(from_cookie(detect.cookie_key.clone()));
  }
  strategies.push(from_accept_language());
  strategies
}

/// First strategy that yields a locale, with the kind that produced it.
pub fn resolve_chain(
  strategies: &[Box<dyn ResolveStrategy>],
  data: &ResolveData<'_>,
  config: &I18nConfig,
) -> Option<(String, &'static str)> {
  strategies.iter().find_map(|s| s.resolve(data, config).map(|code| (code, s.kind())))
}

/// Outcome of detection for one request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Detection {
  pub locale: String,
  pub redirect_to: Option<String>,
  pub set_cookie: Option<LocaleCookie>,
  /// Which signal decided: `route`, `domain`, `cookie`, `accept_language`,
  /// `current`, `fallback` or `default`.
  pub source: &'static str,
}

pub struct LocaleResolver {
  config: Arc<I18nConfig>,
  routes: Arc<RouteTable>,
  strategies: Vec<Box<dyn ResolveStrategy>>,
}

impl LocaleResolver {
  pub fn new(config: Arc<I18nConfig>, routes: Arc<RouteTable>) -> Self {
    let strategies = default_strategies(&config);
    Self { config, routes, strategies }
  }

  /// Replace the cookie / Accept-Language chain.
  pub fn with_strategies(mut self, strategies: Vec<Box<dyn ResolveStrategy>>) -> Self {
    self.strategies = strategies;
    self
  }

  pub fn config(&self) -> &I18nConfig {
    &self.config
  }

  /// Resolve the locale for a request. Only an unmatched host in
  /// multi-domain mode is an error; every other case settles on a locale.
  pub fn detect(&self, data: &ResolveData<'_>) -> Result<Detection, LocaleError> {
    let config = &*self.config;

    if config.different_domains {
      let host = data.host.unwrap_or_default();
      let locale = locale_for_host(&config.locales, host)
        .ok_or_else(|| LocaleError::HostNotFound(normalize_host(host)))?;
      let detection = Detection {
        locale: locale.code.clone(),
        redirect_to: None,
        set_cookie: self.cookie_write(data, &locale.code),
        source: "domain",
      };
      tracing::debug!(host, locale = %detection.locale, "locale resolved from host");
      return Ok(detection);
    }

    let route_locale = self.route_locale(data);
    let rendered = match config.strategy {
      Strategy::NoPrefix => {
        data.current_locale.filter(|c| config.is_locale(c)).map(|c| (c.to_string(), "current"))
      }
      _ => route_locale.map(|c| (c, "route")).or_else(|| self.unprefixed_locale()),
    };

    let Some(detect) = config.detect_browser_language.as_ref() else {
      let (locale, source) = rendered.unwrap_or_else(|| (config.default_locale.clone(), "default"));
      return Ok(Detection { locale, redirect_to: None, set_cookie: None, source });
    };

    let (detected, detected_source) =
      resolve_chain(&self.strategies, data, config).unwrap_or_else(|| {
        let fallback =
          detect.fallback_locale.clone().unwrap_or_else(|| config.default_locale.clone());
        (fallback, "fallback")
      });

    let disagrees = rendered.as_ref().is_none_or(|(code, _)| *code != detected);
    let switch = disagrees && self.redirect_allowed(detect, data, rendered.is_some());

    // Prefix strategies only change locale by moving to another URL; a page
    // with no counterpart in the detected locale keeps rendering its own.
    let target = if switch && config.strategy != Strategy::NoPrefix {
      self.redirect_target(data.path, &detected).filter(|to| to != data.path)
    } else {
      None
    };
    let (locale, source, redirect_to) = match (switch, target, rendered) {
      (true, Some(to), _) => (detected, detected_source, Some(to)),
      (true, None, _) if config.strategy == Strategy::NoPrefix => {
        (detected, detected_source, None)
      }
      (_, _, Some((code, source))) => (code, source, None),
      (_, _, None) => (detected, detected_source, None),
    };

    let set_cookie = self.cookie_write(data, &locale);
    tracing::debug!(
      path = data.path,
      locale = %locale,
      source,
      redirect = ?redirect_to,
      "locale detected"
    );
    Ok(Detection { locale, redirect_to, set_cookie, source })
  }

  /// Locale carried by the route: name suffix first, then path prefix.
  /// Always `None` under `no_prefix`.
  pub fn route_locale(&self, data: &ResolveData<'_>) -> Option<String> {
    if self.config.strategy == Strategy::NoPrefix {
      return None;
    }
    let codec = self.config.codec();
    data
      .route_name
      .and_then(|name| codec.from_route_name(name))
      .or_else(|| codec.from_path(data.path))
      .map(str::to_string)
  }

  /// Path of the current page in `target`, keeping query and hash. Routes
  /// matched in the table honour per-locale paths and return `None` when the
  /// route is disabled for `target`; unknown paths get their prefix swapped.
  pub fn redirect_target(&self, path: &str, target: &str) -> Option<String> {
    let config = &*self.config;
    let (bare, suffix) = split_suffix(path);

    if let Some((entry, params)) = self.routes.match_path(bare) {
      let dest = self.routes.get(&entry.base_name, target)?;
      return fill_template(&dest.path, &params).map(|p| format!("{p}{suffix}"));
    }

    let stripped = config.codec().strip_prefix(bare);
    let swapped =
      if config.is_prefixed(target) { add_prefix(target, stripped) } else { stripped.to_string() };
    Some(format!("{}{suffix}", normalize_trailing_slash(&swapped, config.trailing_slash)))
  }

  /// Unprefixed paths belong to the default locale unless every locale is prefixed.
  fn unprefixed_locale(&self) -> Option<(String, &'static str)> {
    match self.config.strategy {
      Strategy::PrefixExceptDefault | Strategy::PrefixAndDefault => {
        Some((self.config.default_locale.clone(), "route"))
      }
      Strategy::Prefix | Strategy::NoPrefix => None,
    }
  }

  fn redirect_allowed(
    &self,
    detect: &DetectBrowserLanguage,
    data: &ResolveData<'_>,
    rendered: bool,
  ) -> bool {
    let (bare, _) = split_suffix(data.path);
    let eligible = match detect.redirect_on {
      RedirectOn::Root => bare.trim_end_matches('/').is_empty(),
      RedirectOn::NoPrefix => {
        detect.always_redirect || self.config.codec().from_path(bare).is_none()
      }
      RedirectOn::All => true,
    };
    if !eligible {
      return false;
    }
    // A returning visitor already chose; only a page that cannot render as-is
    // still needs to move.
    let returning = detect.use_cookie && self.cookie_locale(data, detect).is_some();
    !(returning && !detect.always_redirect && rendered)
  }

  fn cookie_locale<'a>(
    &self,
    data: &ResolveData<'a>,
    detect: &DetectBrowserLanguage,
  ) -> Option<&'a str> {
    parse_cookie(data.cookie_header?, &detect.cookie_key).filter(|c| self.config.is_locale(c))
  }

  fn cookie_write(&self, data: &ResolveData<'_>, locale: &str) -> Option<LocaleCookie> {
    let detect = self.config.detect_browser_language.as_ref()?;
    if !detect.use_cookie || self.cookie_locale(data, detect) == Some(locale) {
      return None;
    }
    Some(LocaleCookie::new(detect, locale))
  }
}

/// Split `/a/b?x=1#h` into `/a/b` and `?x=1#h`.
fn split_suffix(path: &str) -> (&str, &str) {
  match path.find(['?', '#']) {
    Some(idx) => path.split_at(idx),
    None => (path, ""),
  }
}
