/* src/server/adapter/axum/src/error.rs */

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use seam_locale::LocaleError;

/// A `LocaleError` on its way out of a handler or the detection layer.
/// Renders as the seam error envelope with the status the error maps to,
/// so an unknown host becomes a JSON 404.
pub struct AxumError(pub LocaleError);

impl IntoResponse for AxumError {
  fn into_response(self) -> Response {
    let err = self.0;
    let status = StatusCode::from_u16(err.status()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    let body = serde_json::json!({
      "ok": false,
      "error": {
        "code": err.code(),
        "message": err.to_string(),
        "transient": false,
      }
    });
    (status, axum::Json(body)).into_response()
  }
}

impl From<LocaleError> for AxumError {
  fn from(err: LocaleError) -> Self {
    Self(err)
  }
}
