//! Fixed-shape password strategy.
//!
//! The keyword `password` yields eight random alphanumeric characters, for
//! example `"password" => "hW4yQU5i"`.

use std::sync::OnceLock;

use regex::Regex;

use super::Generator;
use crate::error::GenerationError;
use crate::expression::expand;
use crate::random::RandomSource;
use crate::registry::GeneratorRegistry;

/// Number of characters in a generated password.
pub const PASSWORD_LENGTH: usize = 8;

static PASSWORD_RE: OnceLock<Regex> = OnceLock::new();

pub(crate) fn password_regex() -> &'static Regex {
    PASSWORD_RE.get_or_init(|| {
        Regex::new("^password$")
            .unwrap_or_else(|error| panic!("password regex failed to compile: {error}"))
    })
}

/// Registers the password strategy for the exact keyword `password`.
pub fn register(registry: &mut GeneratorRegistry) {
    registry.register(password_regex().clone(), Generator::Password);
}

/// Generates a password by expanding `[\a]{8}`.
///
/// The input keyword carries no information, so only the random source is
/// consulted.
///
/// # Errors
///
/// Propagates expansion errors, which cannot occur for the fixed pattern.
pub fn generate<R>(rng: &mut R) -> Result<String, GenerationError>
where
    R: RandomSource + ?Sized,
{
    expand(&format!("[\\a]{{{PASSWORD_LENGTH}}}"), rng)
}
