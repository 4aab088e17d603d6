/* src/server/core/rust/src/messages/fallback.rs */

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Message fallback specification: one locale, an ordered list, or a map
/// from locale to list with an optional `default` entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FallbackLocale {
  Single(String),
  List(Vec<String>),
  Map(BTreeMap<String, Vec<String>>),
}

impl FallbackLocale {
  /// Ordered fallback chain for `locale`, never containing `locale` itself.
  pub fn chain_for(&self, locale: &str) -> Vec<String> {
    let candidates: Vec<&String> = match self {
      Self::Single(code) => vec![code],
      Self::List(codes) => codes.iter().collect(),
      Self::Map(map) => {
        let own = map.get(locale).into_iter().flatten();
        let default = map.get("default").into_iter().flatten();
        own.chain(default).collect()
      }
    };

    let mut chain: Vec<String> = Vec::with_capacity(candidates.len());
    for code in candidates {
      if code.is_empty() || code == locale || chain.contains(code) {
        continue;
      }
      chain.push(code.clone());
    }
    chain
  }
}
