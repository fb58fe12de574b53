use crate::{
    cli::{actions::print_json, globals::GlobalArgs},
    gate::{
        Gate, Navigator, RouteTable,
        routes::{DEFAULT_AUTH_ROUTES, DEFAULT_PUBLIC_ROUTES},
    },
};
use anyhow::{Context, Result};
use std::sync::Arc;
use tracing::debug;

#[derive(Debug)]
pub struct Args {
    pub globals: GlobalArgs,
    pub paths: Vec<String>,
    pub auth_routes: Vec<String>,
    pub public_routes: Vec<String>,
}

/// Builds the route table from the defaults plus any extra patterns.
///
/// # Errors
/// Returns an error if an extra pattern is invalid.
pub fn route_table(auth: &[String], public: &[String]) -> Result<RouteTable> {
    let merge = |defaults: &[&str], extra: &[String]| -> Vec<String> {
        defaults
            .iter()
            .map(ToString::to_string)
            .chain(extra.iter().cloned())
            .collect()
    };

    RouteTable::new(
        &merge(DEFAULT_AUTH_ROUTES, auth),
        &merge(DEFAULT_PUBLIC_ROUTES, public),
    )
    .context("invalid route pattern")
}

/// Execute the navigate action. Paths are navigated in order and every decision
/// is printed.
/// # Errors
/// Returns an error if the client cannot be built or a route pattern is invalid.
pub async fn execute(args: Args) -> Result<()> {
    let client = Arc::new(args.globals.client()?);
    let routes = route_table(&args.auth_routes, &args.public_routes)?;
    let gate = Gate::new(client, routes);

    let mut states = gate.subscribe();
    let watcher = tokio::spawn(async move {
        while states.changed().await.is_ok() {
            let state = *states.borrow_and_update();
            debug!(?state, "gate state");
        }
    });

    let navigator = Navigator::new(Arc::new(gate));
    let mut decisions = Vec::with_capacity(args.paths.len());
    for path in &args.paths {
        decisions.push(navigator.navigate(path).await);
    }
    drop(navigator);

    // The watcher stops once the gate (and its sender) is dropped.
    let _ = watcher.await;

    if let [decision] = decisions.as_slice() {
        print_json(decision)
    } else {
        print_json(&decisions)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::gate::RouteClass;

    #[test]
    fn extra_patterns_extend_defaults() {
        let routes = route_table(&["/sso(/.*)?".to_string()], &["/pricing".to_string()]).unwrap();
        assert_eq!(routes.classify("/sso/callback"), RouteClass::Auth);
        assert_eq!(routes.classify("/pricing"), RouteClass::Public);
        assert_eq!(routes.classify("/login"), RouteClass::Auth);
        assert_eq!(routes.classify("/dashboard"), RouteClass::Protected);
    }

    #[test]
    fn bad_pattern_is_reported() {
        assert!(route_table(&["sso".to_string()], &[]).is_err());
    }
}
