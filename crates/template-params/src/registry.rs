//! Generator registry and dispatcher.
//!
//! The registry associates match predicates with generator strategies. It is
//! built once at start-up and then shared read-only with every resolution
//! pass. Predicates are tested in registration order and the first match
//! wins, so overlapping predicates resolve deterministically.

use regex::Regex;
use tracing::debug;

use crate::error::GenerationError;
use crate::generator::{Generator, RemoteValueGenerator, expression, password, remote};
use crate::random::RandomSource;

/// A predicate paired with the strategy it selects.
#[derive(Debug, Clone)]
pub struct Registration {
    predicate: Regex,
    generator: Generator,
}

impl Registration {
    /// Returns the match predicate.
    #[must_use]
    pub const fn predicate(&self) -> &Regex {
        &self.predicate
    }

    /// Returns the selected strategy.
    #[must_use]
    pub const fn generator(&self) -> &Generator {
        &self.generator
    }
}

/// Ordered collection of generator registrations.
///
/// # Example
///
/// ```
/// use std::time::Duration;
///
/// use rand::SeedableRng;
/// use rand_chacha::ChaCha8Rng;
/// use template_params::{GeneratorRegistry, RemoteValueGenerator};
///
/// let remote = RemoteValueGenerator::new(Duration::from_secs(5)).expect("client builds");
/// let registry = GeneratorRegistry::standard(remote);
/// let mut rng = ChaCha8Rng::seed_from_u64(1337);
///
/// let value = registry.generate_value("admin[A-Z0-9]{3}", &mut rng).expect("generates");
/// assert!(value.starts_with("admin"));
/// assert_eq!(value.len(), 8);
/// ```
#[derive(Debug, Clone, Default)]
pub struct GeneratorRegistry {
    registrations: Vec<Registration>,
}

impl GeneratorRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            registrations: Vec::new(),
        }
    }

    /// Creates a registry holding the built-in strategies.
    ///
    /// Strategies are registered remote first, then password, then
    /// character-class expansion.
    #[must_use]
    pub fn standard(remote_generator: RemoteValueGenerator) -> Self {
        let mut registry = Self::new();
        remote::register(&mut registry, remote_generator);
        password::register(&mut registry);
        expression::register(&mut registry);
        registry
    }

    /// Appends a registration. Earlier registrations take precedence.
    pub fn register(&mut self, predicate: Regex, generator: Generator) {
        debug!(
            generator = generator.name(),
            predicate = predicate.as_str(),
            "registering generator"
        );
        self.registrations.push(Registration {
            predicate,
            generator,
        });
    }

    /// Returns the registrations in precedence order.
    #[must_use]
    pub fn registrations(&self) -> &[Registration] {
        &self.registrations
    }

    /// Returns `true` when nothing has been registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.registrations.is_empty()
    }

    /// Returns the first strategy whose predicate matches `expression`.
    #[must_use]
    pub fn find(&self, expression: &str) -> Option<&Generator> {
        self.registrations
            .iter()
            .find(|registration| registration.predicate.is_match(expression))
            .map(|registration| &registration.generator)
    }

    /// Generates a value for `expression` with the matching strategy.
    ///
    /// The strategy's result is returned unmodified.
    ///
    /// # Errors
    ///
    /// Returns [`GenerationError::NoGeneratorsRegistered`] for an empty
    /// registry, [`GenerationError::NoMatchFound`] when no predicate matches,
    /// and otherwise any error raised by the selected strategy.
    pub fn generate_value<R>(&self, expression: &str, rng: &mut R) -> Result<String, GenerationError>
    where
        R: RandomSource + ?Sized,
    {
        if self.is_empty() {
            return Err(GenerationError::NoGeneratorsRegistered);
        }

        let generator = self
            .find(expression)
            .ok_or_else(|| GenerationError::NoMatchFound {
                expression: expression.to_owned(),
            })?;
        debug!(generator = generator.name(), "matched generator");
        generator.generate(expression, rng)
    }
}
