/* src/server/core/rust/src/runtime.rs */

use std::collections::HashMap;
use std::sync::RwLock;

use crate::config::I18nConfig;
use crate::errors::LocaleError;
use crate::messages::{MessageMerger, Messages};

/// Handle to whatever renders translations. The core only needs to read and
/// switch the active locale and hand over merged messages.
pub trait TranslationRuntime: Send + Sync {
  fn locale(&self) -> String;
  fn set_locale(&self, code: &str);
  fn messages(&self, locale: &str) -> Option<Messages>;
  fn set_messages(&self, locale: &str, messages: Messages);
}

/// In-process runtime backed by a locked map.
pub struct MemoryRuntime {
  locale: RwLock<String>,
  messages: RwLock<HashMap<String, Messages>>,
}

impl MemoryRuntime {
  pub fn new(locale: impl Into<String>) -> Self {
    Self { locale: RwLock::new(locale.into()), messages: RwLock::new(HashMap::new()) }
  }
}

impl TranslationRuntime for MemoryRuntime {
  fn locale(&self) -> String {
    self.locale.read().unwrap_or_else(|e| e.into_inner()).clone()
  }

  fn set_locale(&self, code: &str) {
    *self.locale.write().unwrap_or_else(|e| e.into_inner()) = code.to_string();
  }

  fn messages(&self, locale: &str) -> Option<Messages> {
    self.messages.read().unwrap_or_else(|e| e.into_inner()).get(locale).cloned()
  }

  fn set_messages(&self, locale: &str, messages: Messages) {
    self.messages.write().unwrap_or_else(|e| e.into_inner()).insert(locale.to_string(), messages);
  }
}

/// Merge messages for `locale`, hand them to the runtime, then switch to it.
/// The runtime holds the messages before its locale changes.
pub async fn activate_locale(
  runtime: &dyn TranslationRuntime,
  merger: &MessageMerger,
  config: &I18nConfig,
  locale: &str,
) -> Result<(), LocaleError> {
  if !config.is_locale(locale) {
    return Err(LocaleError::UnknownLocale(locale.to_string()));
  }
  let messages = merger.messages(locale).await;
  runtime.set_messages(locale, messages);
  runtime.set_locale(locale);
  tracing::debug!(locale, "locale activated");
  Ok(())
}
