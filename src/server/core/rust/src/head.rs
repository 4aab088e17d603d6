/* src/server/core/rust/src/head.rs */

//! SEO head tags for a localized page: `<html lang dir>`, hreflang
//! alternates, canonical link and Open Graph locale meta.

use std::collections::HashSet;
use std::fmt::Write as _;

use serde::Serialize;

use crate::config::I18nConfig;
use crate::locale::Direction;
use crate::switch::{CurrentRoute, PathSwitcher};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HtmlAttrs {
  #[serde(skip_serializing_if = "Option::is_none")]
  pub lang: Option<String>,
  pub dir: Direction,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HeadLink {
  pub id: String,
  pub rel: &'static str,
  pub href: String,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub hreflang: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HeadMeta {
  pub id: String,
  pub property: &'static str,
  pub content: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LocaleHead {
  pub html_attrs: HtmlAttrs,
  pub links: Vec<HeadLink>,
  pub meta: Vec<HeadMeta>,
}

/// Head tags for `route` rendered in `locale`. Only locales declaring a
/// `language` get alternates; hrefs are absolute when `base_url` is set.
pub fn locale_head(
  config: &I18nConfig,
  switcher: &PathSwitcher,
  route: &CurrentRoute,
  locale: &str,
) -> LocaleHead {
  let current = config.locale(locale);
  let html_attrs = HtmlAttrs {
    lang: current.and_then(|l| l.language.clone()),
    dir: current.map(|l| l.dir).unwrap_or_default(),
  };

  // Alternates and canonical ignore query and hash
  let bare = CurrentRoute { query: Vec::new(), hash: None, ..route.clone() };
  let href = |code: &str| {
    let path = switcher.switch_path(&bare, code);
    (!path.is_empty()).then(|| absolute(config, &path))
  };

  let mut links = Vec::new();
  let mut seen_languages = HashSet::new();
  for l in &config.locales {
    let Some(ref language) = l.language else { continue };
    let Some(url) = href(&l.code) else { continue };

    // First locale of a language also answers for the bare language tag
    let primary = language.split('-').next().unwrap_or_default().to_ascii_lowercase();
    if primary != language.to_ascii_lowercase() && seen_languages.insert(primary.clone()) {
      links.push(alternate(&primary, url.clone()));
    }
    seen_languages.insert(language.to_ascii_lowercase());
    links.push(alternate(language, url.clone()));

    if l.code == config.default_locale {
      links.push(alternate("x-default", url));
    }
  }

  if let Some(url) = href(locale) {
    links.push(HeadLink { id: "i18n-can".into(), rel: "canonical", href: url, hreflang: None });
  }

  let mut meta = Vec::new();
  if let Some(language) = current.and_then(|l| l.language.as_deref()) {
    meta.push(HeadMeta {
      id: "i18n-og".into(),
      property: "og:locale",
      content: og_locale(language),
    });
  }
  for l in config.locales.iter().filter(|l| l.code != locale) {
    if let Some(ref language) = l.language {
      meta.push(HeadMeta {
        id: format!("i18n-og-alt-{language}"),
        property: "og:locale:alternate",
        content: og_locale(language),
      });
    }
  }

  LocaleHead { html_attrs, links, meta }
}

impl LocaleHead {
  /// `<link>` and `<meta>` tags for injection into `<head>`.
  pub fn to_html(&self) -> String {
    let mut out = String::new();
    for link in &self.links {
      let _ = write!(
        out,
        r#"<link id="{}" rel="{}" href="{}""#,
        escape_attr(&link.id),
        link.rel,
        escape_attr(&link.href)
      );
      if let Some(ref lang) = link.hreflang {
        let _ = write!(out, r#" hreflang="{}""#, escape_attr(lang));
      }
      out.push('>');
    }
    for m in &self.meta {
      let _ = write!(
        out,
        r#"<meta id="{}" property="{}" content="{}">"#,
        escape_attr(&m.id),
        m.property,
        escape_attr(&m.content)
      );
    }
    out
  }
}

fn alternate(hreflang: &str, href: String) -> HeadLink {
  HeadLink {
    id: format!("i18n-alt-{hreflang}"),
    rel: "alternate",
    href,
    hreflang: Some(hreflang.to_string()),
  }
}

fn absolute(config: &I18nConfig, path: &str) -> String {
  if path.contains("://") {
    return path.to_string();
  }
  match config.base_url {
    Some(ref base) => format!("{base}{path}"),
    None => path.to_string(),
  }
}

fn og_locale(language: &str) -> String {
  language.replace('-', "_")
}

fn escape_attr(value: &str) -> String {
  let mut out = String::with_capacity(value.len());
  for c in value.chars() {
    match c {
      '&' => out.push_str("&amp;"),
      '"' => out.push_str("&quot;"),
      '\'' => out.push_str("&#39;"),
      '<' => out.push_str("&lt;"),
      '>' => out.push_str("&gt;"),
      _ => out.push(c),
    }
  }
  out
}
