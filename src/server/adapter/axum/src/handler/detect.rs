/* src/server/adapter/axum/src/handler/detect.rs */

use std::sync::Arc;

use axum::extract::{FromRequestParts, Request, State};
use axum::http::request::Parts;
use axum::http::uri::PathAndQuery;
use axum::http::{HeaderMap, HeaderValue, StatusCode, header};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use seam_locale::{Detection, LocaleCookie, ResolveData};
use serde::Serialize;

use super::AppState;
use crate::error::AxumError;

/// Request header carrying the locale the client currently renders.
/// Only consulted under the `no_prefix` strategy.
pub const CURRENT_LOCALE_HEADER: &str = "x-seam-locale";

/// Locale settled for the request, inserted by the detection middleware.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedLocale {
  pub code: String,
  pub source: &'static str,
}

impl<S: Send + Sync> FromRequestParts<S> for ResolvedLocale {
  type Rejection = (StatusCode, &'static str);

  async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
    parts
      .extensions
      .get::<ResolvedLocale>()
      .cloned()
      .ok_or((StatusCode::INTERNAL_SERVER_ERROR, "locale detection layer is not installed"))
  }
}

pub(super) async fn detect_locale(
  State(state): State<Arc<AppState>>,
  mut req: Request,
  next: Next,
) -> Response {
  let detected = {
    let uri = req.uri();
    let headers = req.headers();
    let data = ResolveData {
      path: uri.path_and_query().map_or_else(|| uri.path(), PathAndQuery::as_str),
      route_name: None,
      cookie_header: header_str(headers, header::COOKIE.as_str()),
      accept_language: header_str(headers, header::ACCEPT_LANGUAGE.as_str()),
      host: header_str(headers, header::HOST.as_str()).or_else(|| uri.host()),
      current_locale: header_str(headers, CURRENT_LOCALE_HEADER),
    };
    state.resolver.detect(&data)
  };

  let detection = match detected {
    Ok(detection) => detection,
    Err(err) => {
      tracing::debug!(error = %err, "locale detection rejected request");
      return AxumError(err).into_response();
    }
  };

  let Detection { locale, redirect_to, set_cookie, source } = detection;

  if let Some(to) = redirect_to {
    let mut response = (StatusCode::FOUND, [(header::LOCATION, to)]).into_response();
    append_cookie(response.headers_mut(), set_cookie.as_ref());
    return response;
  }

  req.extensions_mut().insert(ResolvedLocale { code: locale, source });
  let mut response = next.run(req).await;
  append_cookie(response.headers_mut(), set_cookie.as_ref());
  response
}

fn header_str<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
  headers.get(name).and_then(|v| v.to_str().ok())
}

fn append_cookie(headers: &mut HeaderMap, cookie: Option<&LocaleCookie>) {
  let Some(cookie) = cookie else { return };
  match HeaderValue::from_str(&cookie.to_string()) {
    Ok(value) => {
      headers.append(header::SET_COOKIE, value);
    }
    Err(err) => tracing::warn!(error = %err, "locale cookie is not a valid header value"),
  }
}
