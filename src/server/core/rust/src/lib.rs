/* src/server/core/rust/src/lib.rs */

pub mod config;
pub mod cookie;
pub mod errors;
pub mod head;
pub mod locale;
pub mod matcher;
pub mod messages;
pub mod resolve;
pub mod routes;
pub mod runtime;
pub mod server;
pub mod switch;

// Re-exports for ergonomic use
pub use config::{
  CONFIG_FILE, DetectBrowserLanguage, I18nConfig, I18nOptions, RedirectOn, Strategy,
  find_i18n_config, load_i18n_config, parse_i18n_config,
};
pub use cookie::{LOCALE_COOKIE_MAX_AGE, LocaleCookie, parse_cookie};
pub use errors::LocaleError;
pub use head::{HeadLink, HeadMeta, HtmlAttrs, LocaleHead, locale_head};
pub use locale::{
  Direction, Locale, LocaleCodec, LocaleInput, LocaleObject, locale_for_host, normalize_host,
  normalize_locales,
};
pub use matcher::{
  BrowserLocaleMatch, compare_browser_locale, find_browser_locale, match_browser_locale,
  parse_accept_language,
};
pub use messages::{
  BoxFuture, FallbackLocale, FragmentSource, LoadResult, MessageFragment, MessageMerger,
  MessageRegistry, Messages, deep_merge, read_message_file,
};
pub use resolve::{
  Detection, LocaleResolver, ResolveData, ResolveStrategy, default_strategies,
  from_accept_language, from_cookie, resolve_chain,
};
pub use routes::{
  LocalizedRoute, PathOverride, RouteEntry, RouteLocalizer, RouteNode, RouteParams, RouteTable,
  localize,
};
pub use runtime::{MemoryRuntime, TranslationRuntime, activate_locale};
pub use server::{LocaleParts, LocaleServer};
pub use switch::{CurrentRoute, PathInterceptor, PathSwitcher};
