//! Generator strategies selectable through the registry.
//!
//! The set of strategies is closed: character-class expansion, fixed-length
//! passwords, and remote-sourced values. Each strategy module exposes a
//! `register` function that the registry bootstrap calls in a fixed order.

pub mod expression;
pub mod password;
pub mod remote;

use crate::error::GenerationError;
use crate::random::RandomSource;

pub use remote::{
    DEFAULT_FETCH_TIMEOUT, DEFAULT_FETCH_TIMEOUT_SECS, DEFAULT_USER_AGENT, RemoteValueGenerator,
};

/// A value generation strategy.
#[derive(Debug, Clone)]
pub enum Generator {
    /// Expands character-class tokens in place.
    Expression,
    /// Produces an eight-character alphanumeric password.
    Password,
    /// Replaces `[GET:<url>]` tokens with fetched response bodies.
    Remote(RemoteValueGenerator),
}

impl Generator {
    /// Returns a short name for the strategy, used in logs.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Expression => "expression",
            Self::Password => "password",
            Self::Remote(_) => "remote",
        }
    }

    /// Produces a value from `expression` using the shared random source.
    ///
    /// # Errors
    ///
    /// Returns whatever [`GenerationError`] the selected strategy raises.
    pub fn generate<R>(&self, expression: &str, rng: &mut R) -> Result<String, GenerationError>
    where
        R: RandomSource + ?Sized,
    {
        match self {
            Self::Expression => crate::expression::expand(expression, rng),
            Self::Password => password::generate(rng),
            Self::Remote(remote) => remote.generate(expression),
        }
    }
}
