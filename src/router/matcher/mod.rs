pub use pattern::Pattern;

use std::collections::BTreeMap;

use super::{params::ParameterSet, Route};

mod pattern;

#[derive(Debug)]
pub struct Match<'t> {
    pub route: &'t Route,
    pub params: ParameterSet,
}

impl<'t> Match<'t> {
    fn new(route: &'t Route, params: ParameterSet) -> Self {
        Self { route, params }
    }
}

/// Matches `canonical_uri` against every route and keeps the one with the
/// lowest priority.
///
/// Routes sharing a priority overwrite each other: the last one evaluated in
/// `routes` order wins even when an earlier one matched too.
pub fn pattern_match<'t>(
    routes: &'t [Route],
    base_uri: &str,
    canonical_uri: &str,
) -> Option<Match<'t>> {
    let path = canonical_uri.strip_prefix(base_uri)?;

    let mut candidates = BTreeMap::new();
    for route in routes {
        if let Some(params) = route.pattern().captures(path) {
            candidates.insert(route.priority(), Match::new(route, params));
        }
    }

    candidates.into_values().next()
}

#[cfg(test)]
mod tests {
    use crate::router::{params::ParamKey, Registration, Route};

    use super::pattern_match;

    fn route(pattern: &str, priority: i32, handler_key: &str) -> Route {
        Route::new(
            pattern.to_owned(),
            Registration::new(pattern, handler_key).priority(priority),
        )
        .unwrap()
    }

    #[test]
    fn test_lowest_priority_wins() {
        let routes = [
            route("/widgets/:id", 0, "Widget"),
            route("/widgets/special", -1, "Special"),
        ];

        let m = pattern_match(&routes, "", "/widgets/special").unwrap();
        assert_eq!(m.route.handler_key(), "Special");
        assert!(m.params.is_empty());

        let m = pattern_match(&routes, "", "/widgets/7").unwrap();
        assert_eq!(m.route.handler_key(), "Widget");
        assert_eq!(m.params.get_name("id"), Some("7"));
    }

    #[test]
    fn test_same_priority_last_evaluated_wins() {
        let routes = [
            route("/widgets/special", 0, "Special"),
            route("/widgets/:id", 0, "Widget"),
        ];
        let m = pattern_match(&routes, "", "/widgets/special").unwrap();
        assert_eq!(m.route.handler_key(), "Widget");

        let routes = [
            route("/widgets/:id", 0, "Widget"),
            route("/widgets/special", 0, "Special"),
        ];
        let m = pattern_match(&routes, "", "/widgets/special").unwrap();
        assert_eq!(m.route.handler_key(), "Special");
    }

    #[test]
    fn test_base_uri() {
        let routes = [route(r"/files/(\d+)", 0, "File")];

        let m = pattern_match(&routes, "/api", "/api/files/3").unwrap();
        assert_eq!(m.params.get(&ParamKey::Index(0)), Some("3"));

        assert!(pattern_match(&routes, "/api", "/files/3").is_none());
        assert!(pattern_match(&routes, "", "/api/files/3").is_none());
    }

    #[test]
    fn test_no_match() {
        let routes = [route("/", 0, "Home")];
        assert!(pattern_match(&routes, "", "/hello").is_none());
        assert!(pattern_match(&[], "", "/").is_none());
    }
}
