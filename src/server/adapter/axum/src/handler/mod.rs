/* src/server/adapter/axum/src/handler/mod.rs */

mod detect;
mod messages;

use std::sync::Arc;

use axum::Router;
use axum::middleware;
use axum::routing::get;
use seam_locale::{I18nConfig, LocaleParts, LocaleResolver, MessageMerger};

pub use detect::{CURRENT_LOCALE_HEADER, ResolvedLocale};

pub(crate) struct AppState {
  pub config: Arc<I18nConfig>,
  pub resolver: Arc<LocaleResolver>,
  pub merger: Arc<MessageMerger>,
}

/// Wrap `app` with locale detection and mount the messages endpoint.
/// The endpoint is merged after the layer so it never redirects.
pub(crate) fn build_router(parts: LocaleParts, app: Router) -> Router {
  let state = Arc::new(AppState {
    config: parts.config,
    resolver: parts.resolver,
    merger: parts.merger,
  });

  let messages = Router::new()
    .route("/_seam/i18n/{locale}", get(messages::handle_messages))
    .with_state(state.clone());

  app.layer(middleware::from_fn_with_state(state, detect::detect_locale)).merge(messages)
}
