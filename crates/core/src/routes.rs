//! Routed-page boundary: maps a path to exactly one page.

use std::fmt;

use once_cell::sync::Lazy;
use regex::Regex;

static POLICY_ROUTE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^/policy/([^/]+)$").expect("valid policy route pattern"));
static ILLUSTRATION_ROUTE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^/illustration/([^/]+)$").expect("valid illustration route pattern")
});

/// A page the shell can render in its content area.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    /// `/`
    Dashboard,
    /// `/policy/:id`
    PolicyDetails {
        /// Policy identifier from the path.
        id: String,
    },
    /// `/actions`
    Actions,
    /// `/coverage-calculator`
    CoverageCalculator,
    /// `/illustration/:id`
    IllustrationDetails {
        /// Illustration identifier from the path.
        id: String,
    },
}

impl Route {
    /// Resolve a path by exact pattern match. Unmatched paths yield `None`.
    pub fn resolve(path: &str) -> Option<Self> {
        match path {
            "/" => return Some(Route::Dashboard),
            "/actions" => return Some(Route::Actions),
            "/coverage-calculator" => return Some(Route::CoverageCalculator),
            _ => {}
        }
        if let Some(caps) = POLICY_ROUTE.captures(path) {
            return Some(Route::PolicyDetails {
                id: caps[1].to_string(),
            });
        }
        ILLUSTRATION_ROUTE
            .captures(path)
            .map(|caps| Route::IllustrationDetails {
                id: caps[1].to_string(),
            })
    }

    /// Path that resolves back to this route.
    pub fn path(&self) -> String {
        match self {
            Route::Dashboard => "/".to_string(),
            Route::PolicyDetails { id } => format!("/policy/{id}"),
            Route::Actions => "/actions".to_string(),
            Route::CoverageCalculator => "/coverage-calculator".to_string(),
            Route::IllustrationDetails { id } => format!("/illustration/{id}"),
        }
    }

    /// Page heading.
    pub fn title(&self) -> &'static str {
        match self {
            Route::Dashboard => "Dashboard",
            Route::PolicyDetails { .. } => "Policy Details",
            Route::Actions => "Actions",
            Route::CoverageCalculator => "Coverage Calculator",
            Route::IllustrationDetails { .. } => "Illustration Details",
        }
    }

    /// Route for a policy's detail page.
    pub fn policy(id: impl Into<String>) -> Self {
        Route::PolicyDetails { id: id.into() }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolves_static_routes() {
        assert_eq!(Route::resolve("/"), Some(Route::Dashboard));
        assert_eq!(Route::resolve("/actions"), Some(Route::Actions));
        assert_eq!(
            Route::resolve("/coverage-calculator"),
            Some(Route::CoverageCalculator)
        );
    }

    #[test]
    fn resolves_parameterized_routes() {
        assert_eq!(Route::resolve("/policy/life-001"), Some(Route::policy("life-001")));
        assert_eq!(
            Route::resolve("/illustration/ill-7"),
            Some(Route::IllustrationDetails {
                id: "ill-7".to_string()
            })
        );
    }

    #[test]
    fn unmatched_paths_render_nothing() {
        for path in [
            "",
            "/policy",
            "/policy/",
            "/policy/a/b",
            "/actions/",
            "/illustration",
            "/unknown",
            "actions",
        ] {
            assert_eq!(Route::resolve(path), None, "{path}");
        }
    }

    #[test]
    fn path_round_trips_through_resolve() {
        let route = Route::policy("term-9");
        assert_eq!(route.path(), "/policy/term-9");
        assert_eq!(Route::resolve(&route.to_string()), Some(route));
    }
}
