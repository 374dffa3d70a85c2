//! Outbound action gateway.
//!
//! # Modules
//!
//! - [`intent`]: [`Intent`]s and the [`TraceContext`] they carry
//! - [`rest`]: The [`RestClient`] and [`Authenticator`] seams
//! - [`handler`]: The [`Gateway`] that guards, calls and reports back

pub mod handler;
pub mod intent;
pub mod rest;

#[cfg(test)]
pub(crate) mod fake;

pub use handler::Gateway;
pub use intent::{Intent, TraceContext};
pub use rest::{Authenticator, RestClient};
