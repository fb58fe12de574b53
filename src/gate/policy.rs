//! Authorization policy as data. Rules are checked top to bottom and the first
//! match decides; [`evaluate`] has no side effects.

use super::{RedirectReason, routes::RouteClass};
use crate::features::auth::{AccountStatus, Role, User};

/// The identity attributes the policy looks at.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Facts {
    pub verified: bool,
    pub role: Role,
    pub status: Option<AccountStatus>,
}

impl From<&User> for Facts {
    fn from(user: &User) -> Self {
        Self {
            verified: user.verified,
            role: user.role,
            status: user.status,
        }
    }
}

/// Matches a single attribute.
#[derive(Clone, Copy, Debug)]
pub enum Pattern<T> {
    Any,
    Is(T),
    /// Matches every value other than `T`, including an absent one.
    Not(T),
}

impl<T: PartialEq + Copy> Pattern<T> {
    fn matches(&self, value: T) -> bool {
        match self {
            Self::Any => true,
            Self::Is(expected) => *expected == value,
            Self::Not(excluded) => *excluded != value,
        }
    }

    fn matches_optional(&self, value: Option<T>) -> bool {
        match (self, value) {
            (Self::Any, _) | (Self::Not(_), None) => true,
            (_, Some(value)) => self.matches(value),
            (Self::Is(_), None) => false,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Target {
    NeutralLanding,
    RoleHome,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Outcome {
    Render,
    Redirect(Target, RedirectReason),
}

#[derive(Clone, Copy, Debug)]
pub struct Rule {
    pub verified: Pattern<bool>,
    pub role: Pattern<Role>,
    pub status: Pattern<AccountStatus>,
    pub route: Pattern<RouteClass>,
    pub outcome: Outcome,
}

impl Rule {
    fn matches(&self, facts: &Facts, route: RouteClass) -> bool {
        self.verified.matches(facts.verified)
            && self.role.matches(facts.role)
            && self.status.matches_optional(facts.status)
            && self.route.matches(route)
    }
}

pub const RULES: &[Rule] = &[
    Rule {
        verified: Pattern::Is(false),
        role: Pattern::Any,
        status: Pattern::Any,
        route: Pattern::Any,
        outcome: Outcome::Redirect(Target::NeutralLanding, RedirectReason::Unverified),
    },
    Rule {
        verified: Pattern::Any,
        role: Pattern::Is(Role::Admin),
        status: Pattern::Not(AccountStatus::Approved),
        route: Pattern::Any,
        outcome: Outcome::Redirect(Target::NeutralLanding, RedirectReason::PendingApproval),
    },
    Rule {
        verified: Pattern::Any,
        role: Pattern::Is(Role::User),
        status: Pattern::Any,
        route: Pattern::Is(RouteClass::Auth),
        outcome: Outcome::Redirect(Target::RoleHome, RedirectReason::AlreadyAuthenticated),
    },
    Rule {
        verified: Pattern::Any,
        role: Pattern::Any,
        status: Pattern::Any,
        route: Pattern::Is(RouteClass::Auth),
        outcome: Outcome::Redirect(Target::RoleHome, RedirectReason::AlreadyAuthenticated),
    },
    Rule {
        verified: Pattern::Any,
        role: Pattern::Any,
        status: Pattern::Any,
        route: Pattern::Any,
        outcome: Outcome::Render,
    },
];

#[must_use]
pub fn evaluate(facts: &Facts, route: RouteClass) -> Outcome {
    RULES
        .iter()
        .find(|rule| rule.matches(facts, route))
        .map_or(Outcome::Render, |rule| rule.outcome)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn facts(verified: bool, role: Role, status: Option<AccountStatus>) -> Facts {
        Facts {
            verified,
            role,
            status,
        }
    }

    #[test]
    fn unverified_is_always_sent_to_landing() {
        for role in [Role::User, Role::Admin, Role::SuperAdmin] {
            for route in [RouteClass::Public, RouteClass::Auth, RouteClass::Protected] {
                assert_eq!(
                    evaluate(&facts(false, role, Some(AccountStatus::Approved)), route),
                    Outcome::Redirect(Target::NeutralLanding, RedirectReason::Unverified)
                );
            }
        }
    }

    #[test]
    fn admin_needs_approval() {
        let expected =
            Outcome::Redirect(Target::NeutralLanding, RedirectReason::PendingApproval);

        for status in [
            Some(AccountStatus::Pending),
            Some(AccountStatus::Suspended),
            None,
        ] {
            assert_eq!(
                evaluate(&facts(true, Role::Admin, status), RouteClass::Protected),
                expected
            );
        }

        assert_eq!(
            evaluate(
                &facts(true, Role::Admin, Some(AccountStatus::Approved)),
                RouteClass::Protected
            ),
            Outcome::Render
        );
    }

    #[test]
    fn signed_in_users_leave_auth_pages() {
        let expected = Outcome::Redirect(Target::RoleHome, RedirectReason::AlreadyAuthenticated);

        assert_eq!(
            evaluate(&facts(true, Role::User, None), RouteClass::Auth),
            expected
        );
        assert_eq!(
            evaluate(
                &facts(true, Role::Admin, Some(AccountStatus::Approved)),
                RouteClass::Auth
            ),
            expected
        );
        assert_eq!(
            evaluate(&facts(true, Role::SuperAdmin, None), RouteClass::Auth),
            expected
        );
    }

    #[test]
    fn verified_users_render_elsewhere() {
        for route in [RouteClass::Public, RouteClass::Protected] {
            assert_eq!(
                evaluate(&facts(true, Role::User, Some(AccountStatus::Active)), route),
                Outcome::Render
            );
            assert_eq!(
                evaluate(&facts(true, Role::SuperAdmin, None), route),
                Outcome::Render
            );
        }
    }

    #[test]
    fn table_ends_with_catch_all() {
        let last = RULES.last().map(|rule| rule.outcome);
        assert_eq!(last, Some(Outcome::Render));
    }

    #[test]
    fn pattern_not_matches_absent_value() {
        let pattern = Pattern::Not(AccountStatus::Approved);
        assert!(pattern.matches_optional(None));
        assert!(!pattern.matches_optional(Some(AccountStatus::Approved)));
        assert!(!Pattern::Is(AccountStatus::Approved).matches_optional(None));
    }
}
