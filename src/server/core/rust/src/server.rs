/* src/server/core/rust/src/server.rs */

use std::sync::Arc;

use crate::config::I18nConfig;
use crate::head::{LocaleHead, locale_head};
use crate::messages::{MessageFragment, MessageMerger, MessageRegistry};
use crate::resolve::{LocaleResolver, ResolveStrategy};
use crate::routes::{RouteNode, RouteTable};
use crate::switch::{CurrentRoute, PathInterceptor, PathSwitcher};

/// Framework-agnostic parts extracted from `LocaleServer`.
/// Adapter crates consume this to build framework-specific routers.
#[derive(Clone)]
pub struct LocaleParts {
  pub config: Arc<I18nConfig>,
  pub routes: Arc<RouteTable>,
  pub resolver: Arc<LocaleResolver>,
  pub merger: Arc<MessageMerger>,
  pub switcher: PathSwitcher,
}

impl LocaleParts {
  pub fn head(&self, route: &CurrentRoute, locale: &str) -> LocaleHead {
    locale_head(&self.config, &self.switcher, route, locale)
  }
}

pub struct LocaleServer {
  config: I18nConfig,
  routes: Vec<RouteNode>,
  registry: MessageRegistry,
  strategies: Option<Vec<Box<dyn ResolveStrategy>>>,
  interceptor: Option<PathInterceptor>,
}

impl LocaleServer {
  pub fn new(config: I18nConfig) -> Self {
    Self {
      config,
      routes: Vec::new(),
      registry: MessageRegistry::new(),
      strategies: None,
      interceptor: None,
    }
  }

  pub fn route(mut self, node: RouteNode) -> Self {
    self.routes.push(node);
    self
  }

  pub fn routes(mut self, nodes: impl IntoIterator<Item = RouteNode>) -> Self {
    self.routes.extend(nodes);
    self
  }

  pub fn fragment(mut self, locale: impl Into<String>, fragment: MessageFragment) -> Self {
    self.registry.register(locale, fragment);
    self
  }

  /// Replace every registered fragment.
  pub fn messages(mut self, registry: MessageRegistry) -> Self {
    self.registry = registry;
    self
  }

  pub fn resolve_strategies(mut self, strategies: Vec<Box<dyn ResolveStrategy>>) -> Self {
    self.strategies = Some(strategies);
    self
  }

  pub fn path_interceptor(mut self, interceptor: PathInterceptor) -> Self {
    self.interceptor = Some(interceptor);
    self
  }

  /// Consume the builder, localizing routes once and wiring the shared,
  /// read-only tables into every component.
  pub fn into_parts(self) -> LocaleParts {
    let config = Arc::new(self.config);
    let routes = Arc::new(RouteTable::build(&self.routes, &config));

    let mut resolver = LocaleResolver::new(config.clone(), routes.clone());
    if let Some(strategies) = self.strategies {
      resolver = resolver.with_strategies(strategies);
    }

    let merger = MessageMerger::new(self.registry).with_fallback(config.fallback_locale.clone());

    let mut switcher = PathSwitcher::new(config.clone(), routes.clone());
    if let Some(interceptor) = self.interceptor {
      switcher = switcher.with_interceptor(interceptor);
    }

    tracing::info!(
      locales = config.locales.len(),
      routes = routes.len(),
      strategy = ?config.strategy,
      "i18n ready"
    );

    LocaleParts {
      config,
      routes,
      resolver: Arc::new(resolver),
      merger: Arc::new(merger),
      switcher,
    }
  }
}
