//! Identity and email verification. `GET user/me` is the only source of identity
//! for the route gate; its payload is decoded here so unknown roles or statuses
//! fail fast instead of leaking untyped data into authorization decisions.

pub mod client;
pub mod types;

pub use types::{AccountStatus, Role, User};
