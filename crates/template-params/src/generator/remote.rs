//! Remote-sourced value strategy.
//!
//! Every `[GET:<url>]` token in an expression is replaced by the trimmed body
//! returned by an HTTP GET of `<url>`, for example
//! `"[GET:http://api.example.com/generateRandomValue]"`.
//!
//! Substitution is atomic: every token is fetched, first to last, before any
//! replacement is made. The first failed fetch aborts the remaining fetches
//! and the whole expression fails, so callers never observe a partially
//! substituted value.

use std::sync::OnceLock;
use std::time::Duration;

use regex::{Captures, Regex};
use reqwest::blocking::{Client, Response};
use tracing::{debug, warn};

use super::Generator;
use crate::error::GenerationError;
use crate::registry::GeneratorRegistry;

/// Request timeout in seconds used when none is configured.
pub const DEFAULT_FETCH_TIMEOUT_SECS: u64 = 30;

/// Request timeout used when none is configured.
pub const DEFAULT_FETCH_TIMEOUT: Duration = Duration::from_secs(DEFAULT_FETCH_TIMEOUT_SECS);

/// User agent sent with remote value requests when none is configured.
pub const DEFAULT_USER_AGENT: &str = "template-params/0.1";

static REMOTE_VALUE_RE: OnceLock<Regex> = OnceLock::new();

pub(crate) fn remote_value_regex() -> &'static Regex {
    REMOTE_VALUE_RE.get_or_init(|| {
        Regex::new(r"\[GET:(https?://[^\]\s]+)\]")
            .unwrap_or_else(|error| panic!("remote value regex failed to compile: {error}"))
    })
}

/// Registers the remote strategy for expressions containing `[GET:<url>]`.
pub fn register(registry: &mut GeneratorRegistry, generator: RemoteValueGenerator) {
    registry.register(remote_value_regex().clone(), Generator::Remote(generator));
}

/// Fetches values from remote HTTP endpoints with a blocking client.
#[derive(Debug, Clone)]
pub struct RemoteValueGenerator {
    client: Client,
}

impl RemoteValueGenerator {
    /// Build a generator whose requests give up after `timeout`.
    ///
    /// # Errors
    ///
    /// Returns an error when the reqwest client cannot be constructed.
    pub fn new(timeout: Duration) -> Result<Self, reqwest::Error> {
        Self::with_user_agent(timeout, DEFAULT_USER_AGENT)
    }

    /// Build a generator with an explicit timeout and user agent.
    ///
    /// # Errors
    ///
    /// Returns an error when the reqwest client cannot be constructed.
    pub fn with_user_agent(timeout: Duration, user_agent: &str) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(user_agent)
            .build()?;
        Ok(Self { client })
    }

    /// Replaces every `[GET:<url>]` token with its fetched, trimmed body.
    ///
    /// # Errors
    ///
    /// Returns [`GenerationError::NoMatchFound`] when the expression has no
    /// remote token, and [`GenerationError::RemoteFetch`] for the first
    /// request or body read that fails.
    pub fn generate(&self, expression: &str) -> Result<String, GenerationError> {
        let urls: Vec<&str> = remote_value_regex()
            .captures_iter(expression)
            .filter_map(|captures| captures.get(1))
            .map(|url| url.as_str())
            .collect();
        if urls.is_empty() {
            return Err(GenerationError::NoMatchFound {
                expression: expression.to_owned(),
            });
        }

        let bodies = urls
            .into_iter()
            .map(|url| self.fetch(url))
            .collect::<Result<Vec<_>, _>>()?;

        let mut replacements = bodies.into_iter();
        let replaced = remote_value_regex().replace_all(expression, |_: &Captures<'_>| {
            replacements.next().unwrap_or_default()
        });
        Ok(replaced.into_owned())
    }

    fn fetch(&self, url: &str) -> Result<String, GenerationError> {
        debug!(url, "fetching remote value");
        let body = self
            .client
            .get(url)
            .send()
            .and_then(Response::error_for_status)
            .and_then(Response::text)
            .map_err(|error| {
                warn!(url, error = %error, "remote value fetch failed");
                GenerationError::RemoteFetch {
                    url: url.to_owned(),
                    message: error.to_string(),
                }
            })?;
        Ok(body.trim().to_owned())
    }
}
