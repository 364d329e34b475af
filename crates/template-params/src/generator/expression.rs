//! Registration of the character-class expansion strategy.

use std::sync::OnceLock;

use regex::Regex;

use super::Generator;
use crate::registry::GeneratorRegistry;

static TOKEN_RE: OnceLock<Regex> = OnceLock::new();

/// Matches any bracketed class followed by an opening quantifier brace.
///
/// Broken tokens such as `[Z-A]{4}` still match here and are reported as
/// malformed by the engine.
pub(crate) fn token_regex() -> &'static Regex {
    TOKEN_RE.get_or_init(|| {
        Regex::new(r"\[[^\[\]]*\]\{")
            .unwrap_or_else(|error| panic!("expression token regex failed to compile: {error}"))
    })
}

/// Registers the expansion engine for expressions containing a class token.
pub fn register(registry: &mut GeneratorRegistry) {
    registry.register(token_regex().clone(), Generator::Expression);
}
