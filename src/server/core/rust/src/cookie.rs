/* src/server/core/rust/src/cookie.rs */

use std::fmt;

use crate::config::DetectBrowserLanguage;

/// One year, the lifetime of a persisted locale decision.
pub const LOCALE_COOKIE_MAX_AGE: u64 = 60 * 60 * 24 * 365;

/// Value of cookie `name` in a raw `Cookie` header.
pub fn parse_cookie<'a>(header: &'a str, name: &str) -> Option<&'a str> {
  for pair in header.split(';') {
    if let Some((k, v)) = pair.trim().split_once('=')
      && k.trim() == name
    {
      let v = v.trim().trim_matches('"');
      if !v.is_empty() {
        return Some(v);
      }
    }
  }
  None
}

/// A locale cookie write, rendered as a `Set-Cookie` value by `Display`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocaleCookie {
  pub name: String,
  pub value: String,
  pub domain: Option<String>,
  pub secure: bool,
  pub cross_origin: bool,
  pub max_age: u64,
}

impl LocaleCookie {
  pub fn new(detect: &DetectBrowserLanguage, locale: impl Into<String>) -> Self {
    Self {
      name: detect.cookie_key.clone(),
      value: locale.into(),
      domain: detect.cookie_domain.clone().filter(|d| !d.is_empty()),
      secure: detect.cookie_secure,
      cross_origin: detect.cookie_cross_origin,
      max_age: LOCALE_COOKIE_MAX_AGE,
    }
  }
}

impl fmt::Display for LocaleCookie {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}={}; Max-Age={}; Path=/", self.name, self.value, self.max_age)?;
    if let Some(ref domain) = self.domain {
      write!(f, "; Domain={domain}")?;
    }
    // Browsers drop SameSite=None cookies that are not Secure
    if self.cross_origin {
      f.write_str("; SameSite=None; Secure")
    } else {
      f.write_str("; SameSite=Lax")?;
      if self.secure { f.write_str("; Secure") } else { Ok(()) }
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn parse_finds_named_cookie() {
    assert_eq!(parse_cookie("a=1; i18n_redirected=fr; b=2", "i18n_redirected"), Some("fr"));
    assert_eq!(parse_cookie("i18n_redirected=\"en\"", "i18n_redirected"), Some("en"));
  }

  #[test]
  fn parse_ignores_others() {
    assert_eq!(parse_cookie("lang=zh", "i18n_redirected"), None);
    assert_eq!(parse_cookie("i18n_redirected=", "i18n_redirected"), None);
    assert_eq!(parse_cookie("", "i18n_redirected"), None);
    assert_eq!(parse_cookie("garbage;;", "i18n_redirected"), None);
  }

  #[test]
  fn serialize_default() {
    let cookie = LocaleCookie::new(&DetectBrowserLanguage::default(), "fr");
    assert_eq!(cookie.to_string(), "i18n_redirected=fr; Max-Age=31536000; Path=/; SameSite=Lax");
  }

  #[test]
  fn serialize_with_domain_and_secure() {
    let detect = DetectBrowserLanguage {
      cookie_domain: Some("example.com".into()),
      cookie_secure: true,
      ..Default::default()
    };
    assert_eq!(
      LocaleCookie::new(&detect, "en").to_string(),
      "i18n_redirected=en; Max-Age=31536000; Path=/; Domain=example.com; SameSite=Lax; Secure"
    );
  }

  #[test]
  fn cross_origin_forces_secure() {
    let detect = DetectBrowserLanguage { cookie_cross_origin: true, ..Default::default() };
    assert!(LocaleCookie::new(&detect, "en").to_string().ends_with("SameSite=None; Secure"));
  }
}
