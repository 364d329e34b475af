//! Parameter resolution and placeholder substitution.
//!
//! Resolution fills in every parameter that declares a generate expression
//! but has no value yet. Substitution then rewrites `${NAME}` placeholders in
//! container environment values with the resolved parameter values.

use std::collections::BTreeMap;
use std::sync::OnceLock;

use regex::{Captures, Regex};
use tracing::debug;

use crate::error::ResolutionError;
use crate::random::RandomSource;
use crate::registry::GeneratorRegistry;
use crate::template::TemplateConfig;

static PLACEHOLDER_RE: OnceLock<Regex> = OnceLock::new();

fn placeholder_regex() -> &'static Regex {
    PLACEHOLDER_RE.get_or_init(|| {
        Regex::new(r"\$\{([a-zA-Z0-9_]+)\}")
            .unwrap_or_else(|error| panic!("placeholder regex failed to compile: {error}"))
    })
}

/// Generates values for every pending parameter of `template`.
///
/// Parameters are visited in declared order and share `rng`, so a seeded
/// source reproduces the same values. Parameters that already carry a value,
/// or have no generate expression, are left alone.
///
/// The pass is all-or-nothing: values are committed only once every pending
/// parameter has been generated.
///
/// # Errors
///
/// Returns [`ResolutionError::Parameter`] for the first parameter whose
/// expression fails. No parameter is modified in that case.
pub fn generate_parameter_values<R>(
    template: &mut TemplateConfig,
    registry: &GeneratorRegistry,
    rng: &mut R,
) -> Result<(), ResolutionError>
where
    R: RandomSource + ?Sized,
{
    let mut generated = Vec::new();
    for (index, parameter) in template.parameters.iter().enumerate() {
        if !parameter.needs_generation() {
            continue;
        }
        let value = registry
            .generate_value(&parameter.generate, rng)
            .map_err(|source| ResolutionError::Parameter {
                name: parameter.name.clone(),
                source,
            })?;
        debug!(parameter = %parameter.name, "generated parameter value");
        generated.push((index, value));
    }

    for (index, value) in generated {
        if let Some(parameter) = template.parameters.get_mut(index) {
            parameter.value = value;
        }
    }
    Ok(())
}

/// Replaces `${NAME}` placeholders in container environment values.
///
/// Both pod containers and replication controller pod template containers
/// are rewritten. Placeholders naming an unknown parameter are kept as they
/// are.
pub fn process_env_parameters(template: &mut TemplateConfig) {
    let values: BTreeMap<String, String> = template
        .parameters
        .iter()
        .map(|parameter| (parameter.name.clone(), parameter.value.clone()))
        .collect();

    let mut rewritten = 0_usize;
    for env in template.env_blocks_mut() {
        for var in env.iter_mut() {
            let substituted = substitute_placeholders(&var.value, &values);
            if substituted != var.value {
                var.value = substituted;
                rewritten += 1;
            }
        }
    }
    debug!(rewritten, "substituted environment placeholders");
}

/// Rewrites every `${NAME}` in `text` whose name is in `values`.
///
/// Replacement is a single left-to-right pass; inserted values are never
/// rescanned. This differs from replacing one parameter at a time over the
/// whole text: with `A = "${B}"` and `B = "2"`, `"${A}${B}"` becomes
/// `"${B}2"` here, where name-by-name replacement would yield `"2${B}"`.
///
/// # Example
///
/// ```
/// use std::collections::BTreeMap;
///
/// use template_params::substitute_placeholders;
///
/// let values = BTreeMap::from([("USER".to_owned(), "admin".to_owned())]);
///
/// assert_eq!(
///     substitute_placeholders("${USER}:${OTHER}", &values),
///     "admin:${OTHER}"
/// );
/// ```
#[must_use]
pub fn substitute_placeholders(text: &str, values: &BTreeMap<String, String>) -> String {
    placeholder_regex()
        .replace_all(text, |captures: &Captures<'_>| {
            let whole = captures.get(0).map_or("", |m| m.as_str());
            captures
                .get(1)
                .and_then(|name| values.get(name.as_str()))
                .map_or_else(|| whole.to_owned(), Clone::clone)
        })
        .into_owned()
}
