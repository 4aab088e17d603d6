/* src/server/core/rust/src/switch.rs */

//! Equivalent URL of the current page in another locale, and `locale_path`
//! for links to a named route.

use std::fmt::Write as _;
use std::sync::Arc;

use crate::config::I18nConfig;
use crate::routes::{RouteParams, RouteTable, add_prefix, fill_template, normalize_trailing_slash};

/// Post-processes a computed path: `(path, target locale) -> path`.
pub type PathInterceptor = Arc<dyn Fn(&str, &str) -> String + Send + Sync>;

/// The page being switched from: a route name, a concrete path, or both.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CurrentRoute {
  pub name: Option<String>,
  pub path: String,
  pub params: RouteParams,
  /// Decoded pairs in request order; repeated keys are kept.
  pub query: Vec<(String, Option<String>)>,
  pub hash: Option<String>,
}

impl CurrentRoute {
  /// Parse `/path?query#hash`.
  pub fn parse(url: &str) -> Self {
    let (rest, hash) = match url.split_once('#') {
      Some((rest, hash)) => (rest, Some(hash.to_string())),
      None => (url, None),
    };
    let (path, query) = rest.split_once('?').unwrap_or((rest, ""));
    let query = query
      .split('&')
      .filter(|pair| !pair.is_empty())
      .map(|pair| match pair.split_once('=') {
        Some((k, v)) => (decode_query(k), Some(decode_query(v))),
        None => (decode_query(pair), None),
      })
      .collect();
    let path = if path.is_empty() { "/".to_string() } else { path.to_string() };
    Self { name: None, path, params: RouteParams::new(), query, hash }
  }

  /// Route addressed by (base or localized) name.
  pub fn named(name: impl Into<String>) -> Self {
    Self { name: Some(name.into()), ..Default::default() }
  }

  pub fn param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
    self.params.insert(key.into(), value.into());
    self
  }

  pub fn query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
    self.query.push((key.into(), Some(value.into())));
    self
  }

  pub fn hash(mut self, hash: impl Into<String>) -> Self {
    self.hash = Some(hash.into());
    self
  }

  /// `?query#hash` suffix, empty when there is neither.
  fn suffix(&self) -> String {
    let mut out = String::new();
    for (i, (key, value)) in self.query.iter().enumerate() {
      out.push(if i == 0 { '?' } else { '&' });
      out.push_str(&encode_query(key));
      if let Some(value) = value {
        let _ = write!(out, "={}", encode_query(value));
      }
    }
    if let Some(ref hash) = self.hash {
      out.push('#');
      out.push_str(hash.trim_start_matches('#'));
    }
    out
  }
}

#[derive(Clone)]
pub struct PathSwitcher {
  config: Arc<I18nConfig>,
  routes: Arc<RouteTable>,
  interceptor: Option<PathInterceptor>,
}

impl PathSwitcher {
  pub fn new(config: Arc<I18nConfig>, routes: Arc<RouteTable>) -> Self {
    Self { config, routes, interceptor: None }
  }

  pub fn with_interceptor(mut self, interceptor: PathInterceptor) -> Self {
    self.interceptor = Some(interceptor);
    self
  }

  /// Base route name of `route`: its name with the locale suffix stripped,
  /// else the base name of the table entry its path matches.
  pub fn route_base_name(&self, route: &CurrentRoute) -> Option<String> {
    if let Some(ref name) = route.name {
      return Some(self.config.codec().base_name(name).to_string());
    }
    self.routes.match_path(&route.path).map(|(entry, _)| entry.base_name.clone())
  }

  /// URL of `route` in `target`, or `""` when the route has no equivalent
  /// there (unknown locale, disabled route, missing param).
  pub fn switch_path(&self, route: &CurrentRoute, target: &str) -> String {
    let Some(path) = self.localized_path(route, target) else {
      return String::new();
    };
    self.finish(format!("{path}{}", route.suffix()), target)
  }

  /// [`switch_path`](Self::switch_path) for a raw `/path?query#hash`.
  pub fn switch_url(&self, url: &str, target: &str) -> String {
    self.switch_path(&CurrentRoute::parse(url), target)
  }

  /// Link target for `to` (a route name or a path) in `locale`. Paths that
  /// match no known route get their locale prefix swapped instead.
  pub fn locale_path(&self, to: &str, locale: &str) -> String {
    if !to.starts_with('/') {
      return self.switch_path(&CurrentRoute::named(to), locale);
    }
    let route = CurrentRoute::parse(to);
    if self.routes.match_path(&route.path).is_some() || !self.config.is_locale(locale) {
      return self.switch_path(&route, locale);
    }

    let config = &*self.config;
    let stripped = config.codec().strip_prefix(&route.path);
    let path =
      if config.is_prefixed(locale) { add_prefix(locale, stripped) } else { stripped.to_string() };
    let path = normalize_trailing_slash(&path, config.trailing_slash);
    self.finish(format!("{path}{}", route.suffix()), locale)
  }

  fn localized_path(&self, route: &CurrentRoute, target: &str) -> Option<String> {
    if !self.config.is_locale(target) {
      return None;
    }
    let base = self.route_base_name(route)?;
    let dest = self.routes.get(&base, target)?;

    let params = if route.params.is_empty() && !route.path.is_empty() {
      self.routes.match_path(&route.path).map(|(_, params)| params).unwrap_or_default()
    } else {
      route.params.clone()
    };
    fill_template(&dest.path, &params)
  }

  /// Prefix the target domain's origin under `different_domains`, then run
  /// the interceptor.
  fn finish(&self, path: String, target: &str) -> String {
    let path = match self.domain_origin(target) {
      Some(origin) => format!("{origin}{path}"),
      None => path,
    };
    match self.interceptor {
      Some(ref f) => f(&path, target),
      None => path,
    }
  }

  fn domain_origin(&self, target: &str) -> Option<String> {
    if !self.config.different_domains {
      return None;
    }
    let locale = self.config.locale(target)?;
    let domain = locale.domain.as_deref().or_else(|| locale.domains.first().map(String::as_str))?;
    let domain = domain.trim_end_matches('/');
    if domain.contains("://") {
      Some(domain.to_string())
    } else {
      Some(format!("{}://{domain}", self.config.domain_protocol))
    }
  }
}

fn decode_query(raw: &str) -> String {
  let raw = raw.replace('+', " ");
  urlencoding::decode(&raw).map_or_else(|_| raw.clone(), |s| s.into_owned())
}

/// Unicode passes through verbatim; ASCII outside the unreserved set is
/// percent-encoded.
fn encode_query(raw: &str) -> String {
  let mut out = String::with_capacity(raw.len());
  for c in raw.chars() {
    if !c.is_ascii() || c.is_ascii_alphanumeric() || matches!(c, '-' | '.' | '_' | '~') {
      out.push(c);
    } else {
      let _ = write!(out, "%{:02X}", c as u32);
    }
  }
  out
}
