/* src/server/adapter/axum/src/lib.rs */

mod error;
mod handler;


use seam_locale::{LocaleParts, LocaleServer};

pub use error::AxumError;
pub use handler::{CURRENT_LOCALE_HEADER, ResolvedLocale};
/// Re-export seam-locale core for convenience
pub use seam_locale;

/// Extension trait that wires a `LocaleServer` into an Axum application.
pub trait IntoAxumRouter {
  /// Router that only serves `/_seam/i18n/{locale}`.
  fn into_axum_router(self) -> axum::Router;

  /// Run locale detection in front of `app` and mount the messages endpoint.
  fn localize(self, app: axum::Router) -> axum::Router;

  fn serve(
    self,
    app: axum::Router,
    addr: &str,
  ) -> impl std::future::Future<Output = Result<(), Box<dyn std::error::Error>>> + Send;
}

impl IntoAxumRouter for LocaleParts {
  fn into_axum_router(self) -> axum::Router {
    self.localize(axum::Router::new())
  }

  fn localize(self, app: axum::Router) -> axum::Router {
    handler::build_router(self, app)
  }

  async fn serve(self, app: axum::Router, addr: &str) -> Result<(), Box<dyn std::error::Error>> {
    let router = self.localize(app);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    let local_addr = listener.local_addr()?;
    tracing::info!("i18n server running on http://localhost:{}", local_addr.port());
    axum::serve(listener, router).await?;
    Ok(())
  }
}

impl IntoAxumRouter for LocaleServer {
  fn into_axum_router(self) -> axum::Router {
    self.into_parts().into_axum_router()
  }

  fn localize(self, app: axum::Router) -> axum::Router {
    self.into_parts().localize(app)
  }

  async fn serve(self, app: axum::Router, addr: &str) -> Result<(), Box<dyn std::error::Error>> {
    self.into_parts().serve(app, addr).await
  }
}
