//! Parameter value generation for deployment templates.
//!
//! A template declares parameters whose values are produced from small
//! generate expressions, then referenced as `${NAME}` placeholders in
//! container environments. This crate resolves those parameters and
//! substitutes the results.
//!
//! # Overview
//!
//! The crate supports:
//!
//! - Character-class expressions such as `admin[A-Z0-9]{3}`
//! - The `password` keyword for eight-character alphanumeric passwords
//! - `[GET:<url>]` tokens replaced by the body of an HTTP GET
//! - Seeded, reproducible resolution through a shared random source
//! - Create-only template storage that stamps, resolves, and substitutes
//!
//! # Example
//!
//! ```
//! use std::time::Duration;
//!
//! use rand::SeedableRng;
//! use rand_chacha::ChaCha8Rng;
//! use template_params::{
//!     GeneratorRegistry, RemoteValueGenerator, TemplateConfig, generate_parameter_values,
//!     process_env_parameters,
//! };
//!
//! let json = r#"{
//!     "id": "guestbook",
//!     "parameters": [{"name": "ADMIN_PASSWORD", "generate": "[a-zA-Z0-9]{8}"}],
//!     "pods": [{"desiredState": {"manifest": {"containers": [{
//!         "env": [{"name": "ADMIN_PASSWORD", "value": "${ADMIN_PASSWORD}"}]
//!     }]}}}]
//! }"#;
//!
//! let mut template = TemplateConfig::from_json(json).expect("valid template");
//! let remote = RemoteValueGenerator::new(Duration::from_secs(5)).expect("client builds");
//! let registry = GeneratorRegistry::standard(remote);
//! let mut rng = ChaCha8Rng::seed_from_u64(1337);
//!
//! generate_parameter_values(&mut template, &registry, &mut rng).expect("resolves");
//! process_env_parameters(&mut template);
//!
//! let password = &template.parameter("ADMIN_PASSWORD").expect("declared").value;
//! assert_eq!(password.len(), 8);
//! ```

mod config;
mod error;
mod expression;
pub mod generator;
mod random;
mod registry;
mod resolution;
mod storage;
mod template;

pub use config::ProcessorSettings;
pub use error::{GenerationError, ResolutionError, StorageError, TemplateError};
pub use expression::{MAX_REPETITIONS, expand};
pub use generator::{Generator, RemoteValueGenerator};
pub use random::RandomSource;
pub use registry::{GeneratorRegistry, Registration};
pub use resolution::{generate_parameter_values, process_env_parameters, substitute_placeholders};
pub use storage::TemplateConfigStorage;
pub use template::{
    Container, ContainerManifest, EnvVar, Parameter, Pod, PodState, PodTemplate,
    ReplicationController, ReplicationControllerState, TemplateConfig,
};
