/* src/server/core/rust/src/routes/pattern.rs */

//! Route path templates: `/user/:id`, optional `:tab?`, and a trailing
//! catch-all `:rest(.*)*`.

use std::collections::BTreeMap;

pub type RouteParams = BTreeMap<String, String>;

enum Segment<'a> {
  Static(&'a str),
  Param(&'a str),
  Optional(&'a str),
  CatchAll(&'a str),
}

fn parse_segment(raw: &str) -> Segment<'_> {
  let Some(param) = raw.strip_prefix(':') else {
    return Segment::Static(raw);
  };
  if let Some(idx) = param.find("(.*)") {
    return Segment::CatchAll(&param[..idx]);
  }
  if let Some(name) = param.strip_suffix('?') {
    return Segment::Optional(name);
  }
  Segment::Param(param)
}

fn segments(path: &str) -> Vec<&str> {
  path.split('/').filter(|s| !s.is_empty()).collect()
}

/// Match a concrete path against a template, returning decoded params.
pub fn match_template(template: &str, path: &str) -> Option<RouteParams> {
  let pattern = segments(template);
  let actual = segments(path);
  let mut params = RouteParams::new();
  let mut i = 0;

  for (pos, raw) in pattern.iter().enumerate() {
    match parse_segment(raw) {
      Segment::Static(s) => {
        if actual.get(i) != Some(&s) {
          return None;
        }
        i += 1;
      }
      Segment::Param(name) => {
        params.insert(name.to_string(), decode(actual.get(i)?));
        i += 1;
      }
      Segment::Optional(name) => {
        // Consumed only when the segments still required after it remain;
        // later optionals and a catch-all may match nothing
        let required = pattern[pos + 1..]
          .iter()
          .filter(|raw| matches!(parse_segment(raw), Segment::Static(_) | Segment::Param(_)))
          .count();
        if let Some(value) = actual.get(i)
          && actual.len() - i > required
        {
          params.insert(name.to_string(), decode(value));
          i += 1;
        }
      }
      Segment::CatchAll(name) => {
        let rest: Vec<String> = actual[i.min(actual.len())..].iter().map(|s| decode(s)).collect();
        params.insert(name.to_string(), rest.join("/"));
        i = actual.len();
      }
    }
  }

  (i == actual.len()).then_some(params)
}

/// Sort key for a template: static segments before params, params before
/// optionals, catch-alls last. Lower sorts first.
pub fn specificity(template: &str) -> Vec<u8> {
  segments(template)
    .into_iter()
    .map(|raw| match parse_segment(raw) {
      Segment::Static(_) => 0,
      Segment::Param(_) => 1,
      Segment::Optional(_) => 2,
      Segment::CatchAll(_) => 3,
    })
    .collect()
}

/// Substitute params into a template. `None` when a required param is missing.
pub fn fill_template(template: &str, params: &RouteParams) -> Option<String> {
  if !template.contains(':') {
    return Some(template.to_string());
  }

  let mut out = Vec::new();
  for raw in template.split('/') {
    if raw.is_empty() {
      out.push(String::new());
      continue;
    }
    match parse_segment(raw) {
      Segment::Static(s) => out.push(s.to_string()),
      Segment::Param(name) => out.push(urlencoding::encode(params.get(name)?).into_owned()),
      Segment::Optional(name) => {
        if let Some(value) = params.get(name).filter(|v| !v.is_empty()) {
          out.push(urlencoding::encode(value).into_owned());
        }
      }
      Segment::CatchAll(name) => {
        if let Some(value) = params.get(name).filter(|v| !v.is_empty()) {
          let encoded: Vec<String> =
            value.split('/').map(|s| urlencoding::encode(s).into_owned()).collect();
          out.push(encoded.join("/"));
        }
      }
    }
  }

  let joined = out.join("/");
  // Dropped optional segments can leave "//" or an empty path behind
  let mut collapsed = String::with_capacity(joined.len());
  for c in joined.chars() {
    if c == '/' && collapsed.ends_with('/') {
      continue;
    }
    collapsed.push(c);
  }
  if collapsed.is_empty() {
    collapsed.push('/');
  }
  if collapsed.len() > 1 && collapsed.ends_with('/') && !template.ends_with('/') {
    collapsed.pop();
  }
  Some(collapsed)
}

fn decode(raw: &str) -> String {
  urlencoding::decode(raw).map_or_else(|_| raw.to_string(), |s| s.into_owned())
}

#[cfg(test)]
mod tests {
  use super::*;

  fn params(pairs: &[(&str, &str)]) -> RouteParams {
    pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect()
  }

  #[test]
  fn static_match() {
    assert_eq!(match_template("/fr/about", "/fr/about"), Some(RouteParams::new()));
    assert_eq!(match_template("/fr/about", "/fr/about/"), Some(RouteParams::new()));
    assert_eq!(match_template("/fr/about", "/fr/contact"), None);
    assert_eq!(match_template("/", "/"), Some(RouteParams::new()));
    assert_eq!(match_template("/", "/about"), None);
  }

  #[test]
  fn param_match_decodes() {
    assert_eq!(match_template("/user/:id", "/user/a%20b"), Some(params(&[("id", "a b")])));
    assert_eq!(match_template("/user/:id", "/user"), None);
  }

  #[test]
  fn optional_param() {
    assert_eq!(match_template("/docs/:tab?", "/docs"), Some(RouteParams::new()));
    assert_eq!(match_template("/docs/:tab?", "/docs/api"), Some(params(&[("tab", "api")])));
    assert_eq!(match_template("/docs/:tab?/edit", "/docs/edit"), Some(RouteParams::new()));
  }

  #[test]
  fn optional_before_catch_all_takes_the_segment() {
    assert_eq!(
      match_template("/docs/:tab?/:rest(.*)*", "/docs/api"),
      Some(params(&[("tab", "api"), ("rest", "")]))
    );
    assert_eq!(
      match_template("/docs/:tab?/:rest(.*)*", "/docs/api/x/y"),
      Some(params(&[("tab", "api"), ("rest", "x/y")]))
    );
    assert_eq!(match_template("/docs/:tab?/:rest(.*)*", "/docs"), Some(params(&[("rest", "")])));
  }

  #[test]
  fn static_segments_are_more_specific() {
    assert!(specificity("/fr") < specificity("/:slug"));
    assert!(specificity("/docs") < specificity("/docs/:tab?"));
    assert!(specificity("/user/:id") < specificity("/user/:id?"));
    assert!(specificity("/a/:b") < specificity("/:rest(.*)*"));
  }

  #[test]
  fn catch_all() {
    assert_eq!(
      match_template("/fr/:slug(.*)*", "/fr/a/b/c"),
      Some(params(&[("slug", "a/b/c")]))
    );
    assert_eq!(match_template("/fr/:slug(.*)*", "/fr"), Some(params(&[("slug", "")])));
  }

  #[test]
  fn fill_encodes_params() {
    let p = params(&[("id", "a b/c")]);
    assert_eq!(fill_template("/en/user/:id", &p), Some("/en/user/a%20b%2Fc".into()));
    assert_eq!(fill_template("/en/user/:id", &RouteParams::new()), None);
  }

  #[test]
  fn fill_optional_and_catch_all() {
    assert_eq!(fill_template("/docs/:tab?", &RouteParams::new()), Some("/docs".into()));
    assert_eq!(fill_template("/:tab?", &RouteParams::new()), Some("/".into()));
    let p = params(&[("slug", "a/é")]);
    assert_eq!(fill_template("/fr/:slug(.*)*", &p), Some("/fr/a/%C3%A9".into()));
  }

  #[test]
  fn fill_keeps_trailing_slash() {
    let p = params(&[("id", "7")]);
    assert_eq!(fill_template("/user/:id/", &p), Some("/user/7/".into()));
    assert_eq!(fill_template("/about/", &p), Some("/about/".into()));
  }
}
