//! Publisher configuration: raw options and their canonical form.
//!
//! [`Options`] is the loosely-typed surface users supply (YAML file or struct
//! literal); [`Config::from_options`] merges it with environment-sourced
//! credentials and defaults into the canonical [`Config`] the publisher holds
//! for its lifetime. Credential presence is not validated here: missing keys
//! surface later as authentication errors from the storage backend.

use regex::Regex;
use serde::Deserialize;
use std::env;
use tracing::{debug, info};

/// Environment variable consulted when `access_key_id` is absent.
pub const ENV_ACCESS_KEY_ID: &str = "OSS_PUBLISH_ACCESS_KEY_ID";
/// Environment variable consulted when `access_key_secret` is absent.
pub const ENV_ACCESS_KEY_SECRET: &str = "OSS_PUBLISH_ACCESS_KEY_SECRET";
/// Environment variable consulted when `bucket` is absent.
pub const ENV_BUCKET: &str = "OSS_PUBLISH_BUCKET";
/// Environment variable consulted when `region` is absent.
pub const ENV_REGION: &str = "OSS_PUBLISH_REGION";

/// Raw publisher options as supplied by the user.
///
/// Everything except `prefix` is optional; an options file without `prefix`
/// fails deserialization, and the struct cannot be built without it.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Options {
    #[serde(default)]
    pub access_key_id: Option<String>,
    #[serde(default)]
    pub access_key_secret: Option<String>,
    #[serde(default)]
    pub bucket: Option<String>,
    #[serde(default)]
    pub region: Option<String>,
    /// Remote key prefix; a trailing `/` is appended when missing.
    pub prefix: String,
    /// Regex pattern; assets whose name matches are not uploaded.
    #[serde(default)]
    pub exclude: Option<String>,
    /// Do not surface upload failures to the build's error sink.
    #[serde(default)]
    pub ignore_error: Option<bool>,
    /// Toggle human-readable progress output. On unless disabled.
    #[serde(default)]
    pub enable_log: Option<bool>,
    /// Historical name for remove mode: evict successfully uploaded assets
    /// from the build output. On unless disabled.
    #[serde(default)]
    pub delete_mode: Option<bool>,
    /// Purge all remote objects under the prefix before uploading.
    #[serde(default)]
    pub delete_all: Option<bool>,
}

/// Storage credentials and bucket location.
///
/// Fields left empty are not passed to the backend, which then issues
/// unsigned requests the provider rejects.
#[derive(Debug, Clone)]
pub struct Auth {
    pub access_key_id: String,
    pub access_key_secret: String,
    pub bucket: String,
    pub region: String,
}

/// Canonical publisher configuration. Built once per publisher, never mutated.
#[derive(Debug, Clone)]
pub struct Config {
    pub auth: Auth,
    /// Never empty, always ends with `/`.
    pub prefix: String,
    pub exclude: Option<Regex>,
    pub ignore_error: bool,
    pub enable_log: bool,
    pub remove_mode: bool,
    pub delete_all: bool,
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid exclude pattern: {0}")]
    InvalidExclude(#[from] regex::Error),
}

impl Config {
    /// Normalize raw options into the canonical configuration.
    pub fn from_options(options: Options) -> Result<Self, ConfigError> {
        let auth = Auth {
            access_key_id: fallback(options.access_key_id, ENV_ACCESS_KEY_ID),
            access_key_secret: fallback(options.access_key_secret, ENV_ACCESS_KEY_SECRET),
            bucket: fallback(options.bucket, ENV_BUCKET),
            region: fallback(options.region, ENV_REGION),
        };

        let prefix = if options.prefix.ends_with('/') {
            options.prefix
        } else {
            format!("{}/", options.prefix)
        };

        let exclude = match options.exclude.as_deref() {
            Some(pattern) if !pattern.is_empty() => Some(Regex::new(pattern)?),
            _ => None,
        };

        Ok(Config {
            auth,
            prefix,
            exclude,
            ignore_error: options.ignore_error.unwrap_or(false),
            enable_log: options.enable_log.unwrap_or(true),
            remove_mode: options.delete_mode.unwrap_or(true),
            delete_all: options.delete_all.unwrap_or(false),
        })
    }

    pub fn trace_loaded(&self) {
        info!(
            bucket = %self.auth.bucket,
            region = %self.auth.region,
            prefix = %self.prefix,
            exclude = self.exclude.as_ref().map(|r| r.as_str()),
            ignore_error = self.ignore_error,
            remove_mode = self.remove_mode,
            delete_all = self.delete_all,
            "Loaded publish configuration"
        );
        debug!(
            key_id_set = !self.auth.access_key_id.is_empty(),
            secret_set = !self.auth.access_key_secret.is_empty(),
            "Credential presence"
        );
    }
}

fn fallback(explicit: Option<String>, var: &str) -> String {
    explicit.or_else(|| env::var(var).ok()).unwrap_or_default()
}
