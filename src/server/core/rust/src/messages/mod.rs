/* src/server/core/rust/src/messages/mod.rs */

//! Message catalogs: per-locale fragment registry, fallback chains, and the
//! caching merger that produces one merged object per locale.

mod fallback;
mod merge;

#[cfg(test)]
mod tests;

use std::collections::HashMap;
use std::future::Future;
use std::path::{Path, PathBuf};
use std::pin::Pin;
use std::sync::{Arc, RwLock};

use futures_util::future::join_all;

use crate::errors::LocaleError;

pub use fallback::FallbackLocale;
pub use merge::deep_merge;

/// Merged or partial message tree; always a JSON object.
pub type Messages = serde_json::Value;

pub type BoxFuture<T> = Pin<Box<dyn Future<Output = T> + Send>>;

pub type LoadResult = Result<Messages, LocaleError>;

pub type LoaderFn = Arc<dyn Fn(&str) -> LoadResult + Send + Sync>;

pub type AsyncLoaderFn = Arc<dyn Fn(String) -> BoxFuture<LoadResult> + Send + Sync>;

/// Where a fragment's messages come from. Loaders receive the locale code.
#[derive(Clone)]
pub enum FragmentSource {
  Static(Messages),
  Loader(LoaderFn),
  AsyncLoader(AsyncLoaderFn),
  /// `.json` or `.toml` file read on demand.
  File(PathBuf),
}

#[derive(Clone)]
pub struct MessageFragment {
  pub key: String,
  pub source: FragmentSource,
  pub cacheable: bool,
}

impl MessageFragment {
  pub fn inline(key: impl Into<String>, messages: Messages) -> Self {
    Self { key: key.into(), source: FragmentSource::Static(messages), cacheable: true }
  }

  pub fn loader<F>(key: impl Into<String>, f: F) -> Self
  where
    F: Fn(&str) -> LoadResult + Send + Sync + 'static,
  {
    Self { key: key.into(), source: FragmentSource::Loader(Arc::new(f)), cacheable: true }
  }

  pub fn async_loader<F, Fut>(key: impl Into<String>, f: F) -> Self
  where
    F: Fn(String) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = LoadResult> + Send + 'static,
  {
    let f: AsyncLoaderFn =
      Arc::new(move |locale: String| -> BoxFuture<LoadResult> { Box::pin(f(locale)) });
    Self { key: key.into(), source: FragmentSource::AsyncLoader(f), cacheable: true }
  }

  /// Fragment backed by a file; the path doubles as the cache key.
  pub fn file(path: impl Into<PathBuf>) -> Self {
    let path = path.into();
    Self { key: path.display().to_string(), source: FragmentSource::File(path), cacheable: true }
  }

  /// Never cache this fragment, nor any locale it contributes to.
  pub fn uncached(mut self) -> Self {
    self.cacheable = false;
    self
  }
}

/// Fragments per locale, kept in registration order.
#[derive(Clone, Default)]
pub struct MessageRegistry {
  fragments: HashMap<String, Vec<MessageFragment>>,
}

impl MessageRegistry {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn register(&mut self, locale: impl Into<String>, fragment: MessageFragment) {
    self.fragments.entry(locale.into()).or_default().push(fragment);
  }

  pub fn with(mut self, locale: impl Into<String>, fragment: MessageFragment) -> Self {
    self.register(locale, fragment);
    self
  }

  pub fn fragments(&self, locale: &str) -> &[MessageFragment] {
    self.fragments.get(locale).map_or(&[], Vec::as_slice)
  }

  pub fn is_empty(&self) -> bool {
    self.fragments.values().all(Vec::is_empty)
  }
}

/// Outcome of loading one fragment: `None` when it failed and contributes
/// nothing, plus whether the result may be cached.
struct Loaded {
  messages: Option<Messages>,
  cacheable: bool,
}

/// Loads and merges fragments per locale. Shared across requests; the two
/// caches are the only mutable state.
pub struct MessageMerger {
  registry: MessageRegistry,
  fallback: Option<FallbackLocale>,
  fragment_cache: RwLock<HashMap<String, Messages>>,
  locale_cache: RwLock<HashMap<String, Messages>>,
}

impl MessageMerger {
  pub fn new(registry: MessageRegistry) -> Self {
    Self {
      registry,
      fallback: None,
      fragment_cache: RwLock::new(HashMap::new()),
      locale_cache: RwLock::new(HashMap::new()),
    }
  }

  pub fn with_fallback(mut self, fallback: Option<FallbackLocale>) -> Self {
    self.fallback = fallback;
    self
  }

  pub fn registry(&self) -> &MessageRegistry {
    &self.registry
  }

  pub fn fallback_chain(&self, locale: &str) -> Vec<String> {
    self.fallback.as_ref().map(|f| f.chain_for(locale)).unwrap_or_default()
  }

  /// Merged messages for `locale` using the configured fallback chain.
  pub async fn messages(&self, locale: &str) -> Messages {
    let chain = self.fallback_chain(locale);
    self.resolve(locale, &chain).await
  }

  /// Merge `locale` over its fallback chain. The locale's own messages win,
  /// then the chain in order, so the chain is applied back to front.
  /// Fragment failures are logged and skipped, never returned.
  pub async fn resolve(&self, locale: &str, chain: &[String]) -> Messages {
    let key = cache_key(locale, chain);
    if let Some(hit) = read_cache(&self.locale_cache, &key) {
      tracing::debug!(locale, "message cache hit");
      return hit;
    }

    // Every fragment of the whole chain is in flight at once; results come
    // back in merge order (chain back to front, registration order within).
    let loads = chain
      .iter()
      .rev()
      .map(String::as_str)
      .chain(std::iter::once(locale))
      .flat_map(|code| self.registry.fragments(code).iter().map(move |f| (code, f)))
      .map(|(code, f)| self.load_fragment(code, f));
    let loaded = join_all(loads).await;

    let mut merged = Messages::Object(serde_json::Map::new());
    let mut cacheable = true;
    for item in loaded {
      cacheable &= item.cacheable;
      if let Some(messages) = item.messages {
        deep_merge(&mut merged, messages);
      }
    }

    if cacheable {
      write_cache(&self.locale_cache, key, merged.clone());
    }
    merged
  }

  pub fn is_cached(&self, locale: &str) -> bool {
    let key = cache_key(locale, &self.fallback_chain(locale));
    read_cache(&self.locale_cache, &key).is_some()
  }

  /// Drop every cached fragment and locale result.
  pub fn invalidate(&self) {
    for cache in [&self.fragment_cache, &self.locale_cache] {
      cache.write().unwrap_or_else(|e| e.into_inner()).clear();
    }
  }

  async fn load_fragment(&self, locale: &str, fragment: &MessageFragment) -> Loaded {
    let key = format!("{locale}:{}", fragment.key);
    if fragment.cacheable
      && let Some(hit) = read_cache(&self.fragment_cache, &key)
    {
      return Loaded { messages: Some(hit), cacheable: true };
    }

    let result = match &fragment.source {
      FragmentSource::Static(messages) => Ok(messages.clone()),
      FragmentSource::Loader(f) => f(locale),
      FragmentSource::AsyncLoader(f) => f(locale.to_string()).await,
      FragmentSource::File(path) => read_message_file(path).await,
    };

    match result {
      Ok(messages) if messages.is_object() => {
        if fragment.cacheable {
          write_cache(&self.fragment_cache, key, messages.clone());
        }
        Loaded { messages: Some(messages), cacheable: fragment.cacheable }
      }
      Ok(_) => {
        tracing::warn!(locale, fragment = %fragment.key, "message fragment is not an object, skipping");
        Loaded { messages: None, cacheable: false }
      }
      Err(e) => {
        tracing::warn!(locale, fragment = %fragment.key, error = %e, "message fragment failed to load");
        Loaded { messages: None, cacheable: false }
      }
    }
  }
}

/// Read a `.json` or `.toml` message file.
pub async fn read_message_file(path: &Path) -> LoadResult {
  let content = tokio::fs::read_to_string(path)
    .await
    .map_err(|e| LocaleError::load(path.display().to_string(), e.to_string()))?;
  let is_toml = path.extension().is_some_and(|ext| ext == "toml");
  if is_toml {
    toml::from_str::<toml::Value>(&content)
      .map_err(|e| LocaleError::load(path.display().to_string(), e.to_string()))
      .and_then(|v| serde_json::to_value(v).map_err(LocaleError::from))
  } else {
    serde_json::from_str(&content)
      .map_err(|e| LocaleError::load(path.display().to_string(), e.to_string()))
  }
}

fn cache_key(locale: &str, chain: &[String]) -> String {
  if chain.is_empty() { locale.to_string() } else { format!("{locale}|{}", chain.join(",")) }
}

// Guards never live across an await; a poisoned lock still holds valid data.
fn read_cache(cache: &RwLock<HashMap<String, Messages>>, key: &str) -> Option<Messages> {
  cache.read().unwrap_or_else(|e| e.into_inner()).get(key).cloned()
}

fn write_cache(cache: &RwLock<HashMap<String, Messages>>, key: String, value: Messages) {
  cache.write().unwrap_or_else(|e| e.into_inner()).insert(key, value);
}
