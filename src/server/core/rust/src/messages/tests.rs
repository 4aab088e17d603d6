/* src/server/core/rust/src/messages/tests.rs */

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use serde_json::json;

use super::*;

fn counting_loader(
  counter: &Arc<AtomicUsize>,
  value: Messages,
) -> impl Fn(&str) -> LoadResult + Send + Sync + 'static {
  let counter = counter.clone();
  move |_| {
    counter.fetch_add(1, Ordering::SeqCst);
    Ok(value.clone())
  }
}

#[tokio::test]
async fn later_fragment_overrides_earlier() {
  let registry = MessageRegistry::new()
    .with("en", MessageFragment::inline("base", json!({ "welcome": "Hi" })))
    .with("en", MessageFragment::inline("overlay", json!({ "welcome": "Hello", "extra": "X" })));
  let merger = MessageMerger::new(registry);
  assert_eq!(merger.messages("en").await, json!({ "welcome": "Hello", "extra": "X" }));
}

#[tokio::test]
async fn fallback_fills_missing_keys() {
  let registry = MessageRegistry::new()
    .with("base", MessageFragment::inline("base", json!({ "welcome": "Hi", "bye": "Bye" })))
    .with("overlay", MessageFragment::inline("overlay", json!({ "welcome": "Hello", "extra": "X" })));
  let merger = MessageMerger::new(registry);
  let merged = merger.resolve("overlay", &["base".to_string()]).await;
  assert_eq!(merged, json!({ "welcome": "Hello", "extra": "X", "bye": "Bye" }));
}

#[tokio::test]
async fn first_fallback_outranks_later_ones() {
  let registry = MessageRegistry::new()
    .with("fr", MessageFragment::inline("fr", json!({ "a": "fr" })))
    .with("en", MessageFragment::inline("en", json!({ "a": "en", "b": "en" })));
  let merger = MessageMerger::new(registry)
    .with_fallback(Some(FallbackLocale::List(vec!["fr".into(), "en".into()])));
  assert_eq!(merger.fallback_chain("fr-CA"), ["fr", "en"]);
  assert_eq!(merger.messages("fr-CA").await, json!({ "a": "fr", "b": "en" }));
}

#[tokio::test]
async fn failing_fragment_is_isolated() {
  let registry = MessageRegistry::new()
    .with("en", MessageFragment::inline("ok", json!({ "title": "Title" })))
    .with("en", MessageFragment::loader("broken", |_| Err(LocaleError::load("broken", "boom"))))
    .with("en", MessageFragment::inline("late", json!({ "footer": "Footer" })))
    .with("fr", MessageFragment::inline("fr", json!({ "title": "Titre" })));
  let merger = MessageMerger::new(registry).with_fallback(Some(FallbackLocale::Single("en".into())));

  assert_eq!(merger.messages("en").await, json!({ "title": "Title", "footer": "Footer" }));
  assert_eq!(merger.messages("fr").await, json!({ "title": "Titre", "footer": "Footer" }));
  // A failed load poisons cacheability of the whole locale
  assert!(!merger.is_cached("en"));
  assert!(!merger.is_cached("fr"));
}

#[tokio::test]
async fn non_object_result_is_skipped() {
  let registry = MessageRegistry::new()
    .with("en", MessageFragment::loader("list", |_| Ok(json!(["not", "an", "object"]))))
    .with("en", MessageFragment::inline("ok", json!({ "a": 1 })));
  let merger = MessageMerger::new(registry);
  assert_eq!(merger.messages("en").await, json!({ "a": 1 }));
}

#[tokio::test]
async fn loaders_receive_locale() {
  let registry = MessageRegistry::new()
    .with("en", MessageFragment::loader("dyn", |locale| Ok(json!({ "locale": locale }))))
    .with(
      "fr",
      MessageFragment::async_loader("remote", |locale| async move {
        tokio::task::yield_now().await;
        Ok(json!({ "remote": locale }))
      }),
    );
  let merger = MessageMerger::new(registry);
  assert_eq!(merger.messages("en").await, json!({ "locale": "en" }));
  assert_eq!(merger.messages("fr").await, json!({ "remote": "fr" }));
}

#[tokio::test]
async fn cacheable_locale_is_computed_once() {
  let calls = Arc::new(AtomicUsize::new(0));
  let registry = MessageRegistry::new()
    .with("en", MessageFragment::loader("count", counting_loader(&calls, json!({ "a": 1 }))));
  let merger = MessageMerger::new(registry);

  merger.messages("en").await;
  merger.messages("en").await;
  assert_eq!(calls.load(Ordering::SeqCst), 1);
  assert!(merger.is_cached("en"));

  merger.invalidate();
  assert!(!merger.is_cached("en"));
  merger.messages("en").await;
  assert_eq!(calls.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn uncached_fragment_is_reloaded() {
  let cached = Arc::new(AtomicUsize::new(0));
  let live = Arc::new(AtomicUsize::new(0));
  let registry = MessageRegistry::new()
    .with("en", MessageFragment::loader("static", counting_loader(&cached, json!({ "a": 1 }))))
    .with("en", MessageFragment::loader("live", counting_loader(&live, json!({ "b": 2 }))).uncached());
  let merger = MessageMerger::new(registry);

  for _ in 0..3 {
    assert_eq!(merger.messages("en").await, json!({ "a": 1, "b": 2 }));
  }
  assert!(!merger.is_cached("en"));
  // The cacheable fragment still hits its own cache
  assert_eq!(cached.load(Ordering::SeqCst), 1);
  assert_eq!(live.load(Ordering::SeqCst), 3);
}

#[tokio::test]
async fn unknown_locale_is_empty() {
  let merger = MessageMerger::new(MessageRegistry::new());
  assert_eq!(merger.messages("xx").await, json!({}));
}

#[tokio::test]
async fn file_fragments() {
  let dir = tempfile::tempdir().unwrap();
  let json_path = dir.path().join("en.json");
  let toml_path = dir.path().join("en.toml");
  std::fs::write(&json_path, r#"{ "home": { "title": "Home" } }"#).unwrap();
  std::fs::write(&toml_path, "[home]\nsubtitle = \"Welcome\"\n").unwrap();

  let registry = MessageRegistry::new()
    .with("en", MessageFragment::file(&json_path))
    .with("en", MessageFragment::file(&toml_path))
    .with("en", MessageFragment::file(dir.path().join("missing.json")));
  let merger = MessageMerger::new(registry);
  assert_eq!(
    merger.messages("en").await,
    json!({ "home": { "title": "Home", "subtitle": "Welcome" } })
  );
}

#[tokio::test]
async fn read_message_file_reports_path() {
  let dir = tempfile::tempdir().unwrap();
  let path = dir.path().join("bad.json");
  std::fs::write(&path, "{ not json").unwrap();
  let err = read_message_file(&path).await.unwrap_err();
  assert_eq!(err.code(), "MESSAGE_LOAD_ERROR");
  assert!(err.to_string().contains("bad.json"));
}

#[tokio::test]
async fn chain_fragments_load_concurrently() {
  // Each loader waits for the other, so both locales must be in flight together
  let barrier = Arc::new(tokio::sync::Barrier::new(2));
  let rendezvous = |value: Messages| {
    let barrier = barrier.clone();
    MessageFragment::async_loader("remote", move |_| {
      let barrier = barrier.clone();
      let value = value.clone();
      async move {
        barrier.wait().await;
        Ok(value)
      }
    })
  };
  let registry = MessageRegistry::new()
    .with("en", rendezvous(json!({ "a": "en", "b": "en" })))
    .with("fr", rendezvous(json!({ "a": "fr" })));
  let merger = MessageMerger::new(registry).with_fallback(Some(FallbackLocale::Single("en".into())));

  let merged = tokio::time::timeout(Duration::from_secs(5), merger.messages("fr"))
    .await
    .expect("fallback and locale loads overlap");
  assert_eq!(merged, json!({ "a": "fr", "b": "en" }));
}
