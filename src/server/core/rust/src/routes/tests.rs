/* src/server/core/rust/src/routes/tests.rs */

use proptest::prelude::*;

use super::*;
use crate::config::{I18nOptions, Strategy};

fn config(strategy: Strategy) -> I18nConfig {
  I18nConfig::from_options(I18nOptions::new(&["en", "fr"], "en").strategy(strategy)).unwrap()
}

fn flat(routes: &[LocalizedRoute]) -> Vec<(String, String)> {
  routes.iter().map(|r| (r.name.clone(), r.path.clone())).collect()
}

fn pairs(list: &[(&str, &str)]) -> Vec<(String, String)> {
  list.iter().map(|(n, p)| (n.to_string(), p.to_string())).collect()
}

#[test]
fn prefix_strategy() {
  let routes = localize(&[RouteNode::new("R", "/R")], &config(Strategy::Prefix));
  assert_eq!(flat(&routes), pairs(&[("R___en", "/en/R"), ("R___fr", "/fr/R")]));
}

#[test]
fn prefix_except_default_strategy() {
  let routes = localize(&[RouteNode::new("R", "/R")], &config(Strategy::PrefixExceptDefault));
  assert_eq!(flat(&routes), pairs(&[("R___en", "/R"), ("R___fr", "/fr/R")]));
}

#[test]
fn prefix_and_default_strategy() {
  let routes = localize(&[RouteNode::new("R", "/R")], &config(Strategy::PrefixAndDefault));
  assert_eq!(
    flat(&routes),
    pairs(&[("R___en", "/en/R"), ("R___en___default", "/R"), ("R___fr", "/fr/R")])
  );
  assert!(routes[1].default_variant);
  assert_eq!(routes[1].base_name, "R");
}

#[test]
fn no_prefix_strategy() {
  let routes = localize(&[RouteNode::new("about", "/about")], &config(Strategy::NoPrefix));
  assert_eq!(flat(&routes), pairs(&[("about___en", "/about"), ("about___fr", "/about")]));
}

#[test]
fn root_route() {
  let routes = localize(&[RouteNode::new("index", "/")], &config(Strategy::PrefixExceptDefault));
  assert_eq!(flat(&routes), pairs(&[("index___en", "/"), ("index___fr", "/fr")]));
}

#[test]
fn trailing_slash() {
  let mut opts = I18nOptions::new(&["en", "fr"], "en").strategy(Strategy::PrefixExceptDefault);
  opts.trailing_slash = true;
  let config = I18nConfig::from_options(opts).unwrap();
  let routes =
    localize(&[RouteNode::new("index", "/"), RouteNode::new("about", "/about//")], &config);
  assert_eq!(
    flat(&routes),
    pairs(&[
      ("index___en", "/"),
      ("index___fr", "/fr/"),
      ("about___en", "/about/"),
      ("about___fr", "/fr/about/"),
    ])
  );
}

#[test]
fn trailing_slash_disabled_strips() {
  let routes = localize(&[RouteNode::new("about", "/about/")], &config(Strategy::Prefix));
  assert_eq!(flat(&routes), pairs(&[("about___en", "/en/about"), ("about___fr", "/fr/about")]));
}

#[test]
fn children_are_not_prefixed() {
  let node = RouteNode::new("user", "/user/:id")
    .child(RouteNode::new("user-profile", "profile"))
    .child(RouteNode { path: Some("settings".into()), ..Default::default() });
  let routes = localize(&[node], &config(Strategy::PrefixExceptDefault));

  let fr = &routes[1];
  assert_eq!(fr.path, "/fr/user/:id");
  assert_eq!(
    flat(&fr.children),
    pairs(&[("user-profile___fr", "profile"), ("user-settings___fr", "settings")])
  );
  assert!(fr.children.iter().all(|c| c.locale == "fr"));

  let table = RouteTable::new(routes);
  assert_eq!(table.by_name("user-profile___fr").unwrap().path, "/fr/user/:id/profile");
  assert_eq!(table.by_name("user-settings___en").unwrap().path, "/user/:id/settings");
}

#[test]
fn child_default_variant_inherits_suffix() {
  let node = RouteNode::new("blog", "/blog").child(RouteNode::new("blog-post", ":slug"));
  let routes = localize(&[node], &config(Strategy::PrefixAndDefault));
  let default = routes.iter().find(|r| r.default_variant).unwrap();
  assert_eq!(default.children[0].name, "blog-post___en___default");
  assert!(default.children[0].default_variant);
}

#[test]
fn disabled_locale_is_skipped() {
  let node = RouteNode::new("about", "/about").disable("fr");
  let routes = localize(&[node], &config(Strategy::Prefix));
  assert_eq!(flat(&routes), pairs(&[("about___en", "/en/about")]));
}

#[test]
fn include_list_restricts_locales() {
  let node = RouteNode::new("about", "/about").only(&["fr"]);
  let routes = localize(&[node], &config(Strategy::PrefixExceptDefault));
  assert_eq!(flat(&routes), pairs(&[("about___fr", "/fr/about")]));
}

#[test]
fn disabled_child_is_skipped() {
  let node =
    RouteNode::new("shop", "/shop").child(RouteNode::new("shop-cart", "cart").disable("fr"));
  let routes = localize(&[node], &config(Strategy::PrefixExceptDefault));
  assert_eq!(routes[0].children.len(), 1);
  assert!(routes[1].children.is_empty());
}

#[test]
fn custom_paths_keep_prefix_logic() {
  let node = RouteNode::new("about", "/about").path_for("fr", "/a-propos");
  let routes = localize(&[node], &config(Strategy::PrefixExceptDefault));
  assert_eq!(flat(&routes), pairs(&[("about___en", "/about"), ("about___fr", "/fr/a-propos")]));

  let node = RouteNode::new("about", "/about").path_for("fr", "a-propos");
  let routes = localize(&[node], &config(Strategy::Prefix));
  assert_eq!(routes[1].path, "/fr/a-propos");
}

#[test]
fn unknown_override_is_ignored() {
  let node = RouteNode::new("about", "/about").path_for("de", "/uber");
  let routes = localize(&[node], &config(Strategy::Prefix));
  assert_eq!(flat(&routes), pairs(&[("about___en", "/en/about"), ("about___fr", "/fr/about")]));
}

#[test]
fn different_domains_suppresses_prefix() {
  let mut opts = I18nOptions::new(&["en", "fr"], "en").strategy(Strategy::PrefixAndDefault);
  opts.different_domains = true;
  let config = I18nConfig::from_options(opts).unwrap();
  let routes = localize(&[RouteNode::new("about", "/about")], &config);
  assert_eq!(flat(&routes), pairs(&[("about___en", "/about"), ("about___fr", "/about")]));
}

#[test]
fn name_derived_from_path() {
  let nodes = [
    RouteNode { path: Some("/user/:id".into()), ..Default::default() },
    RouteNode { path: Some("/".into()), ..Default::default() },
  ];
  let routes = localize(&nodes, &config(Strategy::NoPrefix));
  let names: Vec<&str> = routes.iter().map(|r| r.name.as_str()).collect();
  assert_eq!(names, ["user-id___en", "user-id___fr", "index___en", "index___fr"]);
}

#[test]
fn missing_path_defaults_to_name() {
  let node = RouteNode { name: Some("contact".into()), ..Default::default() };
  let routes = localize(&[node], &config(Strategy::PrefixExceptDefault));
  assert_eq!(flat(&routes), pairs(&[("contact___en", "/contact"), ("contact___fr", "/fr/contact")]));
}

#[test]
fn invalid_route_is_skipped() {
  let nodes = [RouteNode::default(), RouteNode::new("about", "/about")];
  let config = config(Strategy::Prefix);
  assert_eq!(localize(&nodes, &config).len(), 2);

  let err = RouteLocalizer::new(&config).localize_strict(&nodes).unwrap_err();
  assert!(matches!(err, LocaleError::InvalidRoute(_)));
}

#[test]
fn duplicate_names_are_rejected() {
  let nodes = [RouteNode::new("about", "/about"), RouteNode::new("about", "/other")];
  let config = config(Strategy::Prefix);
  let routes = localize(&nodes, &config);
  assert_eq!(flat(&routes), pairs(&[("about___en", "/en/about"), ("about___fr", "/fr/about")]));

  let err = RouteLocalizer::new(&config).localize_strict(&nodes).unwrap_err();
  assert!(err.to_string().contains("not unique"));
}

#[test]
fn table_prefers_default_variant() {
  let table = RouteTable::build(&[RouteNode::new("about", "/about")], &config(Strategy::PrefixAndDefault));
  assert_eq!(table.len(), 3);
  assert_eq!(table.get("about", "en").unwrap().path, "/about");
  assert_eq!(table.get("about", "fr").unwrap().path, "/fr/about");
  assert_eq!(table.by_name("about___en").unwrap().path, "/en/about");
  assert!(table.get("about", "de").is_none());
}

#[test]
fn table_matches_paths() {
  let node = RouteNode::new("user", "/user/:id").path_for("fr", "/utilisateur/:id");
  let table = RouteTable::build(&[node], &config(Strategy::PrefixExceptDefault));

  let (entry, params) = table.match_path("/fr/utilisateur/42?tab=1").unwrap();
  assert_eq!(entry.name, "user___fr");
  assert_eq!(params.get("id").map(String::as_str), Some("42"));

  let (entry, _) = table.match_path("/user/7").unwrap();
  assert_eq!(entry.locale, "en");
  assert!(table.match_path("/fr/user/7").is_none());
}

#[test]
fn table_prefers_static_segments_over_params() {
  // A leading dynamic segment must not swallow locale prefixes
  let nodes = [RouteNode::new("page", "/:slug"), RouteNode::new("index", "/")];
  let table = RouteTable::build(&nodes, &config(Strategy::PrefixExceptDefault));

  let (entry, params) = table.match_path("/fr").unwrap();
  assert_eq!(entry.name, "index___fr");
  assert!(params.is_empty());

  let (entry, params) = table.match_path("/hello").unwrap();
  assert_eq!(entry.name, "page___en");
  assert_eq!(params.get("slug").map(String::as_str), Some("hello"));
}

#[test]
fn table_serializes_tree() {
  let table = RouteTable::build(&[RouteNode::new("about", "/about")], &config(Strategy::Prefix));
  let json = serde_json::to_value(table.routes()).unwrap();
  assert_eq!(json[0], serde_json::json!({ "name": "about___en", "path": "/en/about", "locale": "en" }));
}

fn any_strategy() -> impl proptest::strategy::Strategy<Value = Strategy> {
  prop::sample::select(vec![
    Strategy::NoPrefix,
    Strategy::Prefix,
    Strategy::PrefixExceptDefault,
    Strategy::PrefixAndDefault,
  ])
}

proptest! {
  /// Same input, same output: no ordering depends on hashing.
  #[test]
  fn localize_is_idempotent(
    names in prop::collection::vec("[a-z]{1,8}", 1..8),
    strategy in any_strategy(),
    trailing in any::<bool>(),
  ) {
    let mut opts = I18nOptions::new(&["en", "fr", "de"], "fr").strategy(strategy);
    opts.trailing_slash = trailing;
    let config = I18nConfig::from_options(opts).unwrap();
    let nodes: Vec<RouteNode> = names
      .iter()
      .map(|n| RouteNode::new(n.clone(), format!("/{n}")).child(RouteNode::new(format!("{n}-c"), ":id")))
      .collect();

    let first = localize(&nodes, &config);
    let second = localize(&nodes, &config);
    prop_assert_eq!(first, second);
  }
}
