//! # Coursedesk (Session, API & Route Authorization Core)
//!
//! `coursedesk` is the client-side core of the course platform dashboard. It owns
//! the encrypted session store, the REST client every feature screen goes
//! through, and the gate that decides whether a route may render.
//!
//! ## Session Storage
//!
//! Tokens and a few local profile fields live in a key/value store whose values
//! are sealed with `ChaCha20-Poly1305`. The key name is bound as associated data,
//! so a value copied under another key fails to open.
//!
//! ## API Client
//!
//! Every call resolves to an [`api::Envelope`]. HTTP failure statuses never raise;
//! transport failures and undecodable bodies do. A `401` on an authenticated call
//! triggers one silent refresh and at most one replay.
//!
//! ## Route Gate
//!
//! Routes are classified as `public`, `auth` or `protected`. Each navigation
//! resolves the identity through `GET user/me` and evaluates a declarative policy
//! table. Identity failures fail closed. A newer navigation cancels the previous
//! one, and a superseded navigation never commits a redirect.

pub mod api;
pub mod cli;
pub mod features;
pub mod gate;
pub mod session;

pub const GIT_COMMIT_HASH: &str = env!("COURSEDESK_GIT_SHA");

pub const APP_USER_AGENT: &str = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"),);
