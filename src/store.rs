//! # store: the object-storage client seam
//!
//! This module defines a single trait ([`ObjectStore`]) covering exactly the
//! three remote operations the publish workflow consumes: listing keys under a
//! prefix, batch deletion, and single-object upload.
//!
//! ## Interface & Extensibility
//! - Implement [`ObjectStore`] to target a new provider; the production
//!   implementation lives in [`crate::oss`].
//! - All methods are async and return [`StoreError`], the provider's
//!   `{name, code, message}` error shape.
//!
//! ## Mocking & Testing
//! - The trait is annotated for `mockall` so consumers can generate
//!   deterministic mocks for unit/integration tests.

use async_trait::async_trait;

use mockall::automock;

/// Result alias for storage calls.
pub type StoreResult<T> = Result<T, StoreError>;

/// Error returned by a failed storage call.
///
/// Mirrors the provider's error document: a short error `name`, a provider
/// `code`, and the human-readable `message`.
#[derive(Debug, Clone, thiserror::Error)]
#[error("{name}-{code}: {message}")]
pub struct StoreError {
    pub name: String,
    pub code: String,
    pub message: String,
}

impl StoreError {
    pub fn new(
        name: impl Into<String>,
        code: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            code: code.into(),
            message: message.into(),
        }
    }
}

/// Client handle for a remote object-storage bucket.
///
/// Constructed once per publisher and reused across builds and across all
/// calls within a build. Implementors own transport, signing and timeout
/// behavior; no retry or backoff is expected at this seam.
#[cfg_attr(any(test, feature = "test-export-mocks"), automock)]
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// List the keys of all remote objects under `prefix`.
    async fn list(&self, prefix: &str) -> StoreResult<Vec<String>>;

    /// Delete `keys` in one best-effort batch. With `quiet`, per-object
    /// failures are suppressed rather than reported.
    async fn delete_multi(&self, keys: Vec<String>, quiet: bool) -> StoreResult<()>;

    /// Upload `content` as the object named `key`.
    async fn put(&self, key: &str, content: Vec<u8>) -> StoreResult<()>;
}
