/* src/server/core/rust/src/errors.rs */

use thiserror::Error;

#[derive(Debug, Error)]
pub enum LocaleError {
  #[error("i18n.locales must not be empty")]
  EmptyLocales,

  #[error("locale code must not be empty")]
  EmptyLocaleCode,

  #[error("duplicate locale code \"{0}\"")]
  DuplicateLocale(String),

  #[error("default locale \"{default}\" is not in locales {locales:?}")]
  UnknownDefaultLocale { default: String, locales: Vec<String> },

  #[error("unknown locale \"{0}\"")]
  UnknownLocale(String),

  #[error("invalid route: {0}")]
  InvalidRoute(String),

  #[error("no locale is configured for host \"{0}\"")]
  HostNotFound(String),

  #[error("failed to load message fragment \"{key}\": {reason}")]
  MessageLoad { key: String, reason: String },

  #[error("{0}")]
  Config(String),

  #[error(transparent)]
  Io(#[from] std::io::Error),

  #[error(transparent)]
  Json(#[from] serde_json::Error),

  #[error(transparent)]
  Toml(#[from] toml::de::Error),
}

impl LocaleError {
  pub fn load(key: impl Into<String>, reason: impl Into<String>) -> Self {
    Self::MessageLoad { key: key.into(), reason: reason.into() }
  }

  pub fn config(msg: impl Into<String>) -> Self {
    Self::Config(msg.into())
  }

  pub fn code(&self) -> &'static str {
    match self {
      Self::EmptyLocales
      | Self::EmptyLocaleCode
      | Self::DuplicateLocale(_)
      | Self::UnknownDefaultLocale { .. }
      | Self::Config(_)
      | Self::Toml(_) => "CONFIG_ERROR",
      Self::UnknownLocale(_) | Self::HostNotFound(_) => "NOT_FOUND",
      Self::InvalidRoute(_) => "INVALID_ROUTE",
      Self::MessageLoad { .. } => "MESSAGE_LOAD_ERROR",
      Self::Io(_) | Self::Json(_) => "INTERNAL_ERROR",
    }
  }

  /// HTTP status the error maps to when it reaches the request layer.
  pub fn status(&self) -> u16 {
    match self.code() {
      "NOT_FOUND" => 404,
      _ => 500,
    }
  }
}
