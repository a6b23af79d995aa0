use std::fmt;

pub const HOME_ROUTE: &str = "home_screen";
pub const FEATURE_ROUTE_PREFIX: &str = "feature_screen/";

/// A navigation destination.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    Home,
    Feature(String),
}

impl Route {
    pub fn feature(feature: impl Into<String>) -> Self {
        Route::Feature(feature.into())
    }

    /// Parses a route string. Unknown routes yield `None`.
    pub fn parse(route: &str) -> Option<Route> {
        if route == HOME_ROUTE {
            return Some(Route::Home);
        }
        route
            .strip_prefix(FEATURE_ROUTE_PREFIX)
            .filter(|feature| !feature.is_empty())
            .map(Route::feature)
    }

    pub fn path(&self) -> String {
        match self {
            Route::Home => HOME_ROUTE.to_string(),
            Route::Feature(feature) => format!("{FEATURE_ROUTE_PREFIX}{feature}"),
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path())
    }
}
