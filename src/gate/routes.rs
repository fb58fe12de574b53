use regex::Regex;
use serde::Serialize;
use thiserror::Error;

pub const DEFAULT_LOGIN_ROUTE: &str = "/login";
pub const DEFAULT_LANDING_ROUTE: &str = "/";
pub const DEFAULT_HOME_ROUTE: &str = "/";

pub const DEFAULT_AUTH_ROUTES: &[&str] = &[
    "/login",
    "/register",
    "/signup",
    "/verify(/.*)?",
    "/forgot-password",
    "/reset-password(/.*)?",
];

pub const DEFAULT_PUBLIC_ROUTES: &[&str] = &["/", "/about", "/contact", "/courses(/[^/]+)?"];

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RouteClass {
    Public,
    Auth,
    Protected,
}

#[derive(Debug, Error)]
pub enum RouteError {
    #[error("route pattern {0:?} must start with '/'")]
    NotAbsolute(String),
    #[error("invalid route pattern {pattern:?}: {source}")]
    Pattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },
}

/// Classifies paths. Auth patterns win over public ones and anything unmatched
/// is protected.
#[derive(Clone, Debug)]
pub struct RouteTable {
    auth: Vec<Regex>,
    public: Vec<Regex>,
    login_route: String,
    landing_route: String,
    home_route: String,
}

impl RouteTable {
    /// Builds a table from anchored patterns, e.g. `/verify(/.*)?`.
    ///
    /// # Errors
    /// Returns an error if a pattern is not absolute or is not a valid regex.
    pub fn new<S: AsRef<str>>(auth: &[S], public: &[S]) -> Result<Self, RouteError> {
        Ok(Self {
            auth: compile_all(auth)?,
            public: compile_all(public)?,
            login_route: DEFAULT_LOGIN_ROUTE.to_string(),
            landing_route: DEFAULT_LANDING_ROUTE.to_string(),
            home_route: DEFAULT_HOME_ROUTE.to_string(),
        })
    }

    /// The dashboard's route layout.
    ///
    /// # Errors
    /// Never fails for the built-in patterns; kept fallible like [`RouteTable::new`].
    pub fn standard() -> Result<Self, RouteError> {
        Self::new(DEFAULT_AUTH_ROUTES, DEFAULT_PUBLIC_ROUTES)
    }

    #[must_use]
    pub fn with_login_route(mut self, route: &str) -> Self {
        self.login_route = normalize_path(route);
        self
    }

    #[must_use]
    pub fn with_landing_route(mut self, route: &str) -> Self {
        self.landing_route = normalize_path(route);
        self
    }

    #[must_use]
    pub fn with_home_route(mut self, route: &str) -> Self {
        self.home_route = normalize_path(route);
        self
    }

    #[must_use]
    pub fn login_route(&self) -> &str {
        &self.login_route
    }

    #[must_use]
    pub fn landing_route(&self) -> &str {
        &self.landing_route
    }

    #[must_use]
    pub fn home_route(&self) -> &str {
        &self.home_route
    }

    #[must_use]
    pub fn classify(&self, path: &str) -> RouteClass {
        let path = normalize_path(path);

        if self.auth.iter().any(|re| re.is_match(&path)) {
            RouteClass::Auth
        } else if self.public.iter().any(|re| re.is_match(&path)) {
            RouteClass::Public
        } else {
            RouteClass::Protected
        }
    }
}

/// Drops query and fragment, forces a leading slash and trims trailing slashes.
#[must_use]
pub fn normalize_path(path: &str) -> String {
    let path = path
        .split(['?', '#'])
        .next()
        .unwrap_or_default()
        .trim();

    let trimmed = path.trim_matches('/');
    if trimmed.is_empty() {
        "/".to_string()
    } else {
        format!("/{trimmed}")
    }
}

fn compile_all<S: AsRef<str>>(patterns: &[S]) -> Result<Vec<Regex>, RouteError> {
    patterns.iter().map(|p| compile(p.as_ref())).collect()
}

fn compile(pattern: &str) -> Result<Regex, RouteError> {
    let pattern = pattern.trim();
    if !pattern.starts_with('/') {
        return Err(RouteError::NotAbsolute(pattern.to_string()));
    }

    Regex::new(&format!("^(?:{pattern})$")).map_err(|source| RouteError::Pattern {
        pattern: pattern.to_string(),
        source,
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn standard_classification() {
        let routes = RouteTable::standard().unwrap();

        assert_eq!(routes.classify("/login"), RouteClass::Auth);
        assert_eq!(routes.classify("/verify"), RouteClass::Auth);
        assert_eq!(routes.classify("/verify/abc123"), RouteClass::Auth);
        assert_eq!(routes.classify("/"), RouteClass::Public);
        assert_eq!(routes.classify("/courses"), RouteClass::Public);
        assert_eq!(routes.classify("/courses/rust-101"), RouteClass::Public);
        assert_eq!(routes.classify("/courses/rust-101/edit"), RouteClass::Protected);
        assert_eq!(routes.classify("/admin/users"), RouteClass::Protected);
        assert_eq!(routes.classify("/dashboard"), RouteClass::Protected);
    }

    #[test]
    fn patterns_are_anchored() {
        let routes = RouteTable::standard().unwrap();
        assert_eq!(routes.classify("/login-history"), RouteClass::Protected);
        assert_eq!(routes.classify("/admin/login"), RouteClass::Protected);
    }

    #[test]
    fn query_fragment_and_slashes_are_ignored() {
        let routes = RouteTable::standard().unwrap();
        assert_eq!(routes.classify("/login?next=/dashboard"), RouteClass::Auth);
        assert_eq!(routes.classify("/about/"), RouteClass::Public);
        assert_eq!(routes.classify("about#team"), RouteClass::Public);
        assert_eq!(routes.classify(""), RouteClass::Public);
    }

    #[test]
    fn normalize_path_rules() {
        assert_eq!(normalize_path(""), "/");
        assert_eq!(normalize_path("///"), "/");
        assert_eq!(normalize_path("home"), "/home");
        assert_eq!(normalize_path("/home/?tab=1"), "/home");
        assert_eq!(normalize_path(" /a/b/ "), "/a/b");
    }

    #[test]
    fn auth_wins_over_public() {
        let routes = RouteTable::new(&["/welcome"], &["/welcome", "/"]).unwrap();
        assert_eq!(routes.classify("/welcome"), RouteClass::Auth);
    }

    #[test]
    fn invalid_patterns_are_rejected() {
        assert!(matches!(
            RouteTable::new(&["login"], &[]),
            Err(RouteError::NotAbsolute(_))
        ));
        assert!(matches!(
            RouteTable::new(&["/login("], &[]),
            Err(RouteError::Pattern { .. })
        ));
    }

    #[test]
    fn special_routes_are_normalized() {
        let routes = RouteTable::standard()
            .unwrap()
            .with_login_route("signin/")
            .with_landing_route("/welcome/")
            .with_home_route("home");
        assert_eq!(routes.login_route(), "/signin");
        assert_eq!(routes.landing_route(), "/welcome");
        assert_eq!(routes.home_route(), "/home");
    }
}
