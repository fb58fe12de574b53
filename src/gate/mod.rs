//! Route authorization gate.
//!
//! Every navigation resolves identity from scratch:
//!
//! 1. hydrate the session store,
//! 2. look for an access token,
//! 3. resolve `GET user/me` (raced against the navigation's cancellation token),
//! 4. run the policy table and either render or redirect.
//!
//! Progress is published on a `watch` channel so a front end can show a loading
//! state. A navigation cancelled part way returns [`Decision::Superseded`] and
//! leaves the state, the session and history untouched.
//!
//! This is a UX guard. The API remains the authority on every request.

pub mod navigation;
pub mod policy;
pub mod routes;

pub use navigation::Navigator;
pub use routes::{RouteClass, RouteError, RouteTable};

use crate::{
    api::ApiClient,
    features::auth::{Role, User, client::fetch_me},
    session::SessionStore,
};
use policy::{Facts, Outcome, Target};
use routes::normalize_path;
use serde::Serialize;
use std::sync::Arc;
use tokio::sync::watch;
use tokio_util::sync::CancellationToken;
use tracing::{Instrument, debug, info, info_span, warn};
use ulid::Ulid;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum GateState {
    Idle,
    Initializing,
    CheckingToken,
    ResolvingIdentity,
    Authorized,
    Redirecting,
}

impl GateState {
    /// True while a navigation is still being decided.
    #[must_use]
    pub fn is_pending(self) -> bool {
        matches!(
            self,
            Self::Initializing | Self::CheckingToken | Self::ResolvingIdentity
        )
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RedirectReason {
    MissingSession,
    IdentityUnavailable,
    Unverified,
    PendingApproval,
    AlreadyAuthenticated,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "decision", rename_all = "snake_case")]
pub enum Decision {
    Render {
        path: String,
        route: RouteClass,
        identity: Option<User>,
    },
    /// Navigate to `to`, replacing the current history entry.
    Redirect {
        from: String,
        to: String,
        reason: RedirectReason,
        replace: bool,
    },
    Superseded {
        path: String,
    },
}

impl Decision {
    #[must_use]
    pub fn is_render(&self) -> bool {
        matches!(self, Self::Render { .. })
    }

    #[must_use]
    pub fn redirect_target(&self) -> Option<&str> {
        match self {
            Self::Redirect { to, .. } => Some(to),
            _ => None,
        }
    }
}

pub struct Gate {
    client: Arc<ApiClient>,
    routes: RouteTable,
    state: watch::Sender<GateState>,
}

impl Gate {
    #[must_use]
    pub fn new(client: Arc<ApiClient>, routes: RouteTable) -> Self {
        let (state, _) = watch::channel(GateState::Idle);
        Self {
            client,
            routes,
            state,
        }
    }

    #[must_use]
    pub fn routes(&self) -> &RouteTable {
        &self.routes
    }

    #[must_use]
    pub fn client(&self) -> &Arc<ApiClient> {
        &self.client
    }

    #[must_use]
    pub fn state(&self) -> GateState {
        *self.state.borrow()
    }

    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<GateState> {
        self.state.subscribe()
    }

    /// Landing route for a signed-in role. Every role currently shares one home.
    #[must_use]
    pub fn home_for(&self, _role: Role) -> &str {
        self.routes.home_route()
    }

    /// Decides whether `path` may render for the current session.
    pub async fn check(&self, path: &str, cancel: &CancellationToken) -> Decision {
        let navigation = Ulid::new();
        let path = normalize_path(path);
        let span = info_span!("gate.check", %navigation, path = %path);

        self.run(path, cancel).instrument(span).await
    }

    async fn run(&self, path: String, cancel: &CancellationToken) -> Decision {
        let route = self.routes.classify(&path);

        if !self.publish(GateState::Initializing, cancel) {
            return superseded(path);
        }

        let session = self.client.session();
        if let Err(err) = session.hydrate() {
            warn!("failed to hydrate session store: {err}");
        }

        if !self.publish(GateState::CheckingToken, cancel) {
            return superseded(path);
        }

        let token = session.get_token().unwrap_or_else(|err| {
            warn!("failed to read access token: {err}");
            None
        });

        if token.is_none() {
            debug!("no session token");
            return match route {
                RouteClass::Protected => self.redirect(
                    path,
                    self.routes.login_route(),
                    RedirectReason::MissingSession,
                    cancel,
                ),
                RouteClass::Public | RouteClass::Auth => self.render(path, route, None, cancel),
            };
        }

        if !self.publish(GateState::ResolvingIdentity, cancel) {
            return superseded(path);
        }

        let identity = tokio::select! {
            biased;
            () = cancel.cancelled() => return superseded(path),
            result = fetch_me(&self.client) => result,
        };

        if cancel.is_cancelled() {
            return superseded(path);
        }

        let user = match identity {
            Ok(user) => user,
            Err(err) => {
                warn!(code = err.code(), "identity resolution failed: {err}");

                if let Err(err) = session.clear_token() {
                    warn!("failed to clear session tokens: {err}");
                }

                return match route {
                    RouteClass::Protected => self.redirect(
                        path,
                        self.routes.login_route(),
                        RedirectReason::IdentityUnavailable,
                        cancel,
                    ),
                    RouteClass::Public | RouteClass::Auth => {
                        self.render(path, route, None, cancel)
                    }
                };
            }
        };

        match policy::evaluate(&Facts::from(&user), route) {
            Outcome::Render => self.render(path, route, Some(user), cancel),
            Outcome::Redirect(target, reason) => {
                let to = match target {
                    Target::NeutralLanding => self.routes.landing_route(),
                    Target::RoleHome => self.home_for(user.role),
                };

                if to == path {
                    debug!("redirect target equals requested path, rendering");
                    self.render(path, route, Some(user), cancel)
                } else {
                    self.redirect(path, to, reason, cancel)
                }
            }
        }
    }

    /// Publishes `state` unless the navigation was cancelled.
    fn publish(&self, state: GateState, cancel: &CancellationToken) -> bool {
        if cancel.is_cancelled() {
            return false;
        }
        self.state.send_replace(state);
        true
    }

    fn render(
        &self,
        path: String,
        route: RouteClass,
        identity: Option<User>,
        cancel: &CancellationToken,
    ) -> Decision {
        if !self.publish(GateState::Authorized, cancel) {
            return superseded(path);
        }

        info!(?route, anonymous = identity.is_none(), "render");

        Decision::Render {
            path,
            route,
            identity,
        }
    }

    fn redirect(
        &self,
        from: String,
        to: &str,
        reason: RedirectReason,
        cancel: &CancellationToken,
    ) -> Decision {
        if !self.publish(GateState::Redirecting, cancel) {
            return superseded(from);
        }

        info!(to, ?reason, "redirect");

        Decision::Redirect {
            from,
            to: to.to_string(),
            reason,
            replace: true,
        }
    }
}

impl std::fmt::Debug for Gate {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Gate")
            .field("client", &self.client)
            .field("state", &self.state())
            .finish_non_exhaustive()
    }
}

fn superseded(path: String) -> Decision {
    debug!("navigation superseded");
    Decision::Superseded { path }
}
