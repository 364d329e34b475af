//! Create-only template storage.
//!
//! Creating a template stamps it, resolves its pending parameters, and
//! substitutes the resolved values into container environments. Templates
//! are processed on the way through and never persisted, so every other
//! storage operation is rejected.

use std::sync::Arc;

use mockable::Clock;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use tracing::{debug, info};

use crate::error::StorageError;
use crate::random::RandomSource;
use crate::registry::GeneratorRegistry;
use crate::resolution::{generate_parameter_values, process_env_parameters};
use crate::template::TemplateConfig;

/// Processes templates as they are created.
pub struct TemplateConfigStorage {
    registry: GeneratorRegistry,
    clock: Arc<dyn Clock>,
}

impl TemplateConfigStorage {
    /// Creates storage backed by `registry` and timestamped by `clock`.
    #[must_use]
    pub fn new(registry: GeneratorRegistry, clock: Arc<dyn Clock>) -> Self {
        Self { registry, clock }
    }

    /// Creates a template with a freshly seeded random source.
    ///
    /// # Errors
    ///
    /// See [`TemplateConfigStorage::create_with_rng`].
    pub fn create(&self, template: TemplateConfig) -> Result<TemplateConfig, StorageError> {
        let seed: u64 = rand::rng().random();
        debug!(seed, "seeded parameter generation");
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        self.create_with_rng(template, &mut rng)
    }

    /// Creates a template, drawing generated values from `rng`.
    ///
    /// # Errors
    ///
    /// Returns [`StorageError::MissingId`] when the template has no id and
    /// [`StorageError::Resolution`] when a parameter cannot be generated.
    pub fn create_with_rng<R>(
        &self,
        mut template: TemplateConfig,
        rng: &mut R,
    ) -> Result<TemplateConfig, StorageError>
    where
        R: RandomSource + ?Sized,
    {
        if template.id.trim().is_empty() {
            return Err(StorageError::MissingId);
        }

        template.creation_timestamp = Some(self.clock.utc());
        generate_parameter_values(&mut template, &self.registry, rng)?;
        process_env_parameters(&mut template);

        info!(
            template_id = %template.id,
            parameters = template.parameters.len(),
            "template created"
        );
        Ok(template)
    }

    /// Always fails; templates are not retained.
    ///
    /// # Errors
    ///
    /// Always returns [`StorageError::CreateOnly`].
    pub const fn get(&self, _id: &str) -> Result<TemplateConfig, StorageError> {
        Err(StorageError::CreateOnly { operation: "get" })
    }

    /// Always fails; templates are not retained.
    ///
    /// # Errors
    ///
    /// Always returns [`StorageError::CreateOnly`].
    pub const fn list(&self) -> Result<Vec<TemplateConfig>, StorageError> {
        Err(StorageError::CreateOnly { operation: "list" })
    }

    /// Always fails; templates are not retained.
    ///
    /// # Errors
    ///
    /// Always returns [`StorageError::CreateOnly`].
    pub const fn update(
        &self,
        _template: &TemplateConfig,
    ) -> Result<TemplateConfig, StorageError> {
        Err(StorageError::CreateOnly {
            operation: "update",
        })
    }

    /// Always fails; templates are not retained.
    ///
    /// # Errors
    ///
    /// Always returns [`StorageError::CreateOnly`].
    pub const fn delete(&self, _id: &str) -> Result<(), StorageError> {
        Err(StorageError::CreateOnly {
            operation: "delete",
        })
    }
}
