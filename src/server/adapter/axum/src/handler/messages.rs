/* src/server/adapter/axum/src/handler/messages.rs */

use std::sync::Arc;

use axum::extract::{Path, State};
use seam_locale::LocaleError;

use super::AppState;
use crate::error::AxumError;

pub(super) async fn handle_messages(
  State(state): State<Arc<AppState>>,
  Path(locale): Path<String>,
) -> Result<axum::Json<serde_json::Value>, AxumError> {
  if !state.config.is_locale(&locale) {
    return Err(LocaleError::UnknownLocale(locale).into());
  }
  Ok(axum::Json(state.merger.messages(&locale).await))
}
