//! Resolve template parameters and print the processed template as JSON.
#![cfg_attr(not(any(test, doctest)), deny(clippy::unwrap_used))]
#![cfg_attr(not(any(test, doctest)), deny(clippy::expect_used))]

use std::ffi::OsString;
use std::io::{self, Write};
use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use mockable::DefaultClock;
use ortho_config::OrthoConfig;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use template_params::{Parameter, ProcessorSettings, TemplateConfig, TemplateConfigStorage};
use tracing::warn;
use tracing_subscriber::{EnvFilter, fmt};

/// `template-process` command arguments.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "template-process",
    about = "Generate template parameter values and substitute them into container environments",
    version
)]
struct CliArgs {
    /// Path to the template JSON file.
    #[arg(long = "template", value_name = "path")]
    template: PathBuf,
    /// Custom parameter as `NAME=VALUE`. May be repeated.
    #[arg(long = "param", value_name = "NAME=VALUE", value_parser = parse_custom_parameter)]
    params: Vec<Parameter>,
    /// Fixed seed for generated values. Overrides `TEMPLATE_PARAMS_SEED`.
    #[arg(long = "seed", value_name = "u64")]
    seed: Option<u64>,
}

fn main() -> io::Result<()> {
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .with_writer(io::stderr)
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let args = CliArgs::try_parse().map_err(io::Error::other)?;
    let settings = ProcessorSettings::load_from_iter([OsString::from("template-process")])
        .map_err(|error| io::Error::other(format!("load settings: {error}")))?;
    let registry = settings
        .build_registry()
        .map_err(|error| io::Error::other(format!("build HTTP client: {error}")))?;

    let mut template = TemplateConfig::from_file(&args.template).map_err(io::Error::other)?;
    for parameter in args.params {
        template.add_custom_parameter(parameter);
    }

    let storage = TemplateConfigStorage::new(registry, Arc::new(DefaultClock));
    let created = match args.seed.or(settings.seed) {
        Some(seed) => storage.create_with_rng(template, &mut ChaCha8Rng::seed_from_u64(seed)),
        None => storage.create(template),
    }
    .map_err(|error| io::Error::other(format!("create template: {error}")))?;

    let json = created.to_json_pretty().map_err(io::Error::other)?;
    writeln!(io::stdout().lock(), "{json}")
}

fn parse_custom_parameter(raw: &str) -> Result<Parameter, String> {
    let (name, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("custom parameter '{raw}' must be NAME=VALUE"))?;
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(format!("custom parameter '{raw}' has an empty name"));
    }
    Ok(Parameter::new(trimmed).with_value(value))
}
