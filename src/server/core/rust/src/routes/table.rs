/* src/server/core/rust/src/routes/table.rs */

use std::collections::HashMap;

use super::pattern::{RouteParams, match_template, specificity};
use super::{LocalizedRoute, RouteNode, RouteLocalizer};
use crate::config::I18nConfig;

/// A localized route flattened to its absolute path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteEntry {
  pub name: String,
  pub base_name: String,
  pub locale: String,
  pub path: String,
  pub default_variant: bool,
}

/// Read-only index over the localized route tree. Rebuilt wholesale when the
/// source tree changes.
#[derive(Debug, Clone, Default)]
pub struct RouteTable {
  routes: Vec<LocalizedRoute>,
  entries: Vec<RouteEntry>,
  by_name: HashMap<String, usize>,
  by_base: HashMap<(String, String), usize>,
  /// Entry indexes, most specific path template first.
  match_order: Vec<usize>,
}

impl RouteTable {
  pub fn new(routes: Vec<LocalizedRoute>) -> Self {
    let mut entries = Vec::new();
    flatten(&routes, None, &mut entries);

    let mut by_name = HashMap::new();
    let mut by_base = HashMap::new();
    for (idx, entry) in entries.iter().enumerate() {
      by_name.insert(entry.name.clone(), idx);
      let key = (entry.base_name.clone(), entry.locale.clone());
      // The unprefixed default-locale duplicate is the canonical target
      if entry.default_variant || !by_base.contains_key(&key) {
        by_base.insert(key, idx);
      }
    }

    let mut match_order: Vec<usize> = (0..entries.len()).collect();
    match_order.sort_by_cached_key(|&i| specificity(&entries[i].path));

    Self { routes, entries, by_name, by_base, match_order }
  }

  /// Localize `nodes` and index the result.
  pub fn build(nodes: &[RouteNode], config: &I18nConfig) -> Self {
    let table = Self::new(RouteLocalizer::new(config).localize(nodes));
    tracing::debug!(routes = table.entries.len(), "route table built");
    table
  }

  pub fn routes(&self) -> &[LocalizedRoute] {
    &self.routes
  }

  pub fn entries(&self) -> &[RouteEntry] {
    &self.entries
  }

  pub fn len(&self) -> usize {
    self.entries.len()
  }

  pub fn is_empty(&self) -> bool {
    self.entries.is_empty()
  }

  pub fn by_name(&self, name: &str) -> Option<&RouteEntry> {
    self.by_name.get(name).map(|&i| &self.entries[i])
  }

  /// Route for `(base name, locale)`; `None` when the route is disabled or
  /// not translated for that locale.
  pub fn get(&self, base_name: &str, locale: &str) -> Option<&RouteEntry> {
    self.by_base.get(&(base_name.to_string(), locale.to_string())).map(|&i| &self.entries[i])
  }

  /// Most specific entry whose path template matches `path`; equally
  /// specific templates keep declaration order.
  pub fn match_path(&self, path: &str) -> Option<(&RouteEntry, RouteParams)> {
    let path = path.split(['?', '#']).next().unwrap_or_default();
    self.match_order.iter().find_map(|&i| {
      let entry = &self.entries[i];
      match_template(&entry.path, path).map(|params| (entry, params))
    })
  }
}

fn flatten(routes: &[LocalizedRoute], parent: Option<&str>, out: &mut Vec<RouteEntry>) {
  for route in routes {
    let path = match parent {
      Some(p) => join_child(p, &route.path),
      None => route.path.clone(),
    };
    // Children first: a parent path is a prefix of its children's paths
    flatten(&route.children, Some(&path), out);
    out.push(RouteEntry {
      name: route.name.clone(),
      base_name: route.base_name.clone(),
      locale: route.locale.clone(),
      path,
      default_variant: route.default_variant,
    });
  }
}

fn join_child(parent: &str, child: &str) -> String {
  if child.starts_with('/') {
    return child.to_string();
  }
  if child.is_empty() {
    return parent.to_string();
  }
  if parent.ends_with('/') { format!("{parent}{child}") } else { format!("{parent}/{child}") }
}
