/* src/server/core/rust/src/routes/mod.rs */

//! Expands a locale-agnostic route tree into one concrete route per
//! (route, locale) pair.

mod pattern;
mod table;

#[cfg(test)]
mod tests;

use std::collections::{BTreeMap, HashSet};

use serde::{Deserialize, Serialize};

use crate::config::{I18nConfig, Strategy};
use crate::errors::LocaleError;

pub use pattern::{RouteParams, fill_template, match_template};
pub use table::{RouteEntry, RouteTable};

/// Per-locale path override: a custom path, or `false` to disable the locale.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PathOverride {
  Path(String),
  Enabled(bool),
}

/// A locale-agnostic route as supplied by the route tree provider.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteNode {
  #[serde(default)]
  pub name: Option<String>,
  #[serde(default)]
  pub path: Option<String>,
  /// Custom path per locale code; `false` disables that locale.
  #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
  pub paths: BTreeMap<String, PathOverride>,
  /// Restrict the route to these locales. `None` means every locale.
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub locales: Option<Vec<String>>,
  #[serde(default, skip_serializing_if = "Vec::is_empty")]
  pub children: Vec<RouteNode>,
}

impl RouteNode {
  pub fn new(name: impl Into<String>, path: impl Into<String>) -> Self {
    Self { name: Some(name.into()), path: Some(path.into()), ..Default::default() }
  }

  pub fn path_for(mut self, locale: impl Into<String>, path: impl Into<String>) -> Self {
    self.paths.insert(locale.into(), PathOverride::Path(path.into()));
    self
  }

  pub fn disable(mut self, locale: impl Into<String>) -> Self {
    self.paths.insert(locale.into(), PathOverride::Enabled(false));
    self
  }

  pub fn only(mut self, locales: &[&str]) -> Self {
    self.locales = Some(locales.iter().map(|l| (*l).to_string()).collect());
    self
  }

  pub fn child(mut self, child: RouteNode) -> Self {
    self.children.push(child);
    self
  }

  fn is_enabled_for(&self, code: &str) -> bool {
    if let Some(ref allowed) = self.locales
      && !allowed.iter().any(|l| l == code)
    {
      return false;
    }
    !matches!(self.paths.get(code), Some(PathOverride::Enabled(false)))
  }

  fn segment_for<'a>(&'a self, code: &str, default: &'a str) -> &'a str {
    match self.paths.get(code) {
      Some(PathOverride::Path(p)) => p,
      _ => default,
    }
  }
}

/// One concrete route for a (route, locale) pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LocalizedRoute {
  pub name: String,
  /// Absolute for top-level routes, relative to the parent for children.
  pub path: String,
  pub locale: String,
  #[serde(skip)]
  pub base_name: String,
  /// The unprefixed default-locale duplicate under `prefix_and_default`.
  #[serde(skip)]
  pub default_variant: bool,
  #[serde(skip_serializing_if = "Vec::is_empty")]
  pub children: Vec<LocalizedRoute>,
}

pub struct RouteLocalizer<'a> {
  config: &'a I18nConfig,
}

impl<'a> RouteLocalizer<'a> {
  pub fn new(config: &'a I18nConfig) -> Self {
    Self { config }
  }

  /// Localize every route, skipping (with a warning) the ones that are invalid.
  pub fn localize(&self, routes: &[RouteNode]) -> Vec<LocalizedRoute> {
    let mut seen = HashSet::new();
    let mut out = Vec::new();
    for node in routes {
      match self.localize_node(node, &mut seen) {
        Ok(localized) => out.extend(localized),
        Err(e) => tracing::warn!(error = %e, "skipping route"),
      }
    }
    out
  }

  /// Like [`localize`](Self::localize) but fails on the first invalid route.
  pub fn localize_strict(&self, routes: &[RouteNode]) -> Result<Vec<LocalizedRoute>, LocaleError> {
    let mut seen = HashSet::new();
    let mut out = Vec::new();
    for node in routes {
      out.extend(self.localize_node(node, &mut seen)?);
    }
    Ok(out)
  }

  fn localize_node(
    &self,
    node: &RouteNode,
    seen: &mut HashSet<String>,
  ) -> Result<Vec<LocalizedRoute>, LocaleError> {
    let base = base_name(node, None)?;
    self.warn_unknown_overrides(node, &base);

    let source_path = node.path.clone().unwrap_or_else(|| format!("/{base}"));
    let mut out = Vec::new();

    for locale in &self.config.locales {
      let code = locale.code.as_str();
      if !node.is_enabled_for(code) {
        continue;
      }
      let segment = node.segment_for(code, &source_path);
      let segment =
        if segment.starts_with('/') { segment.to_string() } else { format!("/{segment}") };

      let path =
        if self.config.is_prefixed(code) { add_prefix(code, &segment) } else { segment.clone() };
      out.push(self.build(node, &base, code, &path, false)?);

      if self.config.strategy == Strategy::PrefixAndDefault
        && code == self.config.default_locale
        && !self.config.different_domains
      {
        out.push(self.build(node, &base, code, &segment, true)?);
      }
    }

    // Names are checked only once the whole subtree localized cleanly
    let mut names = Vec::new();
    collect_names(&out, &mut names);
    for name in &names {
      if seen.contains(name) {
        return Err(LocaleError::InvalidRoute(format!("route name \"{name}\" is not unique")));
      }
    }
    seen.extend(names);
    Ok(out)
  }

  fn build(
    &self,
    node: &RouteNode,
    base: &str,
    code: &str,
    path: &str,
    default_variant: bool,
  ) -> Result<LocalizedRoute, LocaleError> {
    let children = self.localize_children(&node.children, base, code, default_variant)?;
    Ok(LocalizedRoute {
      name: self.config.codec().localized_name(base, code, default_variant),
      path: normalize_trailing_slash(path, self.config.trailing_slash),
      locale: code.to_string(),
      base_name: base.to_string(),
      default_variant,
      children,
    })
  }

  /// Children inherit the parent's locale and never re-apply the prefix.
  fn localize_children(
    &self,
    children: &[RouteNode],
    parent_base: &str,
    code: &str,
    default_variant: bool,
  ) -> Result<Vec<LocalizedRoute>, LocaleError> {
    let mut out = Vec::new();
    for child in children {
      if !child.is_enabled_for(code) {
        continue;
      }
      let base = base_name(child, Some(parent_base))?;
      let own_path = child.path.clone().unwrap_or_default();
      let segment = child.segment_for(code, &own_path);
      let grandchildren = self.localize_children(&child.children, &base, code, default_variant)?;
      out.push(LocalizedRoute {
        name: self.config.codec().localized_name(&base, code, default_variant),
        path: normalize_child_segment(segment, self.config.trailing_slash),
        locale: code.to_string(),
        base_name: base,
        default_variant,
        children: grandchildren,
      });
    }
    Ok(out)
  }

  fn warn_unknown_overrides(&self, node: &RouteNode, base: &str) {
    for code in node.paths.keys() {
      if !self.config.is_locale(code) {
        tracing::warn!(route = %base, locale = %code, "ignoring path override for unknown locale");
      }
    }
    for child in &node.children {
      if let Ok(child_base) = base_name(child, Some(base)) {
        self.warn_unknown_overrides(child, &child_base);
      }
    }
  }
}

/// Localize with the lenient policy; see [`RouteLocalizer::localize`].
pub fn localize(routes: &[RouteNode], config: &I18nConfig) -> Vec<LocalizedRoute> {
  RouteLocalizer::new(config).localize(routes)
}

/// Route identity: the declared name, else one derived from the path
/// (`/user/:id` -> `user-id`, `/` -> `index`).
fn base_name(node: &RouteNode, parent: Option<&str>) -> Result<String, LocaleError> {
  if let Some(name) = node.name.as_deref().filter(|n| !n.is_empty()) {
    return Ok(name.to_string());
  }
  let Some(path) = node.path.as_deref() else {
    return Err(LocaleError::InvalidRoute("route has neither a name nor a path".into()));
  };
  let slug = path
    .split('/')
    .filter(|s| !s.is_empty())
    .map(|s| s.trim_start_matches(':').split('(').next().unwrap_or_default().trim_end_matches(['?', '*']))
    .collect::<Vec<_>>()
    .join("-");
  let slug = if slug.is_empty() { "index".to_string() } else { slug };
  Ok(match parent {
    Some(p) => format!("{p}-{slug}"),
    None => slug,
  })
}

fn collect_names(routes: &[LocalizedRoute], out: &mut Vec<String>) {
  for r in routes {
    out.push(r.name.clone());
    collect_names(&r.children, out);
  }
}

/// `/` + code in front of an absolute path; the root becomes `/code`.
pub(crate) fn add_prefix(code: &str, path: &str) -> String {
  if path == "/" || path.is_empty() {
    format!("/{code}")
  } else if path.starts_with('/') {
    format!("/{code}{path}")
  } else {
    format!("/{code}/{path}")
  }
}

/// Exactly one trailing slash when enabled, none when disabled; the bare
/// root always stays `/`.
pub fn normalize_trailing_slash(path: &str, trailing_slash: bool) -> String {
  let trimmed = path.trim_end_matches('/');
  if trimmed.is_empty() {
    return "/".to_string();
  }
  // Catch-all patterns end the path; a slash after them would never match
  if trailing_slash && !trimmed.ends_with('*') {
    format!("{trimmed}/")
  } else {
    trimmed.to_string()
  }
}

fn normalize_child_segment(segment: &str, trailing_slash: bool) -> String {
  if segment.starts_with('/') {
    return normalize_trailing_slash(segment, trailing_slash);
  }
  let trimmed = segment.trim_end_matches('/');
  if trailing_slash && !trimmed.is_empty() && !trimmed.ends_with('*') {
    format!("{trimmed}/")
  } else {
    trimmed.to_string()
  }
}
