/* demo/backend/rust/src/main.rs */

use std::collections::HashSet;
use std::path::Path;

use axum::Router;
use axum::extract::{OriginalUri, State};
use axum::http::uri::PathAndQuery;
use axum::response::Html;
use axum::routing::get;
use seam_locale::{
  CurrentRoute, LocaleParts, LocaleServer, MessageFragment, RouteNode, find_i18n_config,
  load_i18n_config,
};
use seam_locale_axum::{IntoAxumRouter, ResolvedLocale};
use serde_json::json;
use tracing::info;

fn routes() -> Vec<RouteNode> {
  vec![
    RouteNode::new("index", "/"),
    RouteNode::new("about", "/about").path_for("fr", "/a-propos"),
    RouteNode::new("blog", "/blog/:slug"),
  ]
}

fn server(dir: &Path) -> anyhow::Result<LocaleServer> {
  let config = load_i18n_config(&find_i18n_config(dir)?)?;
  let codes: Vec<String> = config.codes().map(str::to_string).collect();

  let mut server = LocaleServer::new(config).routes(routes());
  for code in codes {
    let file = dir.join("locales").join(format!("{code}.json"));
    server = server
      .fragment(code.clone(), MessageFragment::file(file))
      .fragment(
        code,
        MessageFragment::loader("build", |locale| Ok(json!({ "build": { "locale": locale } }))),
      );
  }
  Ok(server)
}

async fn page(
  State(parts): State<LocaleParts>,
  OriginalUri(uri): OriginalUri,
  locale: ResolvedLocale,
) -> Html<String> {
  let route = CurrentRoute::parse(uri.path_and_query().map_or(uri.path(), PathAndQuery::as_str));
  let head = parts.head(&route, &locale.code);
  let messages = parts.merger.messages(&locale.code).await;

  let nav: String = [("index", "home"), ("about", "about")]
    .iter()
    .map(|&(name, key)| {
      let label = messages["nav"][key].as_str().unwrap_or(name);
      format!(r#"<a href="{}">{label}</a> "#, parts.switcher.locale_path(name, &locale.code))
    })
    .collect();
  let switch: String = parts
    .config
    .codes()
    .map(|code| format!(r#"<a href="{}">{code}</a> "#, parts.switcher.switch_path(&route, code)))
    .collect();
  let section = match parts.switcher.route_base_name(&route).as_deref() {
    Some("about") => "about",
    Some("blog") => "blog",
    _ => "home",
  };
  let title = messages[section]["title"].as_str().unwrap_or_default();

  let lang = head.html_attrs.lang.as_deref().unwrap_or(&locale.code);
  let dir = head.html_attrs.dir.as_str();
  let tags = head.to_html();
  Html(format!(
    r#"<!doctype html><html lang="{lang}" dir="{dir}"><head>{tags}</head><body><nav>{nav}</nav><h1>{title}</h1><p>{switch}</p></body></html>"#
  ))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
  tracing_subscriber::fmt()
    .with_env_filter(
      tracing_subscriber::EnvFilter::from_default_env().add_directive("seam_locale=debug".parse()?),
    )
    .init();

  let dir = Path::new(env!("CARGO_MANIFEST_DIR"));
  let parts = server(dir)?.into_parts();

  let mut app = Router::new();
  let mut seen = HashSet::new();
  for entry in parts.routes.entries() {
    if !seen.insert(entry.path.as_str()) {
      continue;
    }
    info!(name = %entry.name, path = %entry.path, "page");
    app = app.route(&axum_path(&entry.path), get(page));
  }
  let app = app.with_state(parts.clone());

  parts.serve(app, "0.0.0.0:3000").await.map_err(|e| anyhow::anyhow!("{e}"))
}

/// `/blog/:slug` -> `/blog/{slug}`
fn axum_path(path: &str) -> String {
  path
    .split('/')
    .map(|seg| match seg.strip_prefix(':') {
      Some(name) => format!("{{{}}}", name.trim_end_matches('?')),
      None => seg.to_string(),
    })
    .collect::<Vec<_>>()
    .join("/")
}
