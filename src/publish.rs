//! Post-emit publishing: the upload batch and the optional prefix purge.
//!
//! [`OssPublisher`] is the plugin instance: it holds the canonical
//! configuration and the storage client for its whole lifetime, spanning
//! builds. Each finished build hands its [`Compilation`] to
//! [`OssPublisher::after_emit`], which purges the remote prefix when
//! configured, selects the uploadable assets, uploads them concurrently and
//! routes any failure into the compilation's error sink. Returning from the
//! hook resumes the build pipeline; the hook itself never fails the caller.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use futures::future::join_all;
use tracing::{error, info};

use crate::compilation::Compilation;
use crate::config::Config;
use crate::select::select_assets;
use crate::store::{ObjectStore, StoreResult};

/// Publishes emitted build artifacts to a remote bucket.
pub struct OssPublisher<S> {
    config: Config,
    store: Arc<S>,
}

impl<S> OssPublisher<S>
where
    S: ObjectStore + 'static,
{
    /// The store handle is constructed once, outside, and reused for every
    /// build this publisher sees.
    pub fn new(config: Config, store: S) -> Self {
        Self {
            config,
            store: Arc::new(store),
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Post-emit hook. Invoked once per build after asset generation.
    ///
    /// On upload failure the error lands in the compilation's error sink
    /// unless `ignore_error` is set; either way the hook returns and the
    /// build continues.
    pub async fn after_emit(&self, compilation: &Compilation) {
        if self.config.delete_all {
            // Fired without being awaited: the purge races the upload batch,
            // and its failure never reaches the compilation's error sink.
            let store = Arc::clone(&self.store);
            let prefix = self.config.prefix.clone();
            tokio::spawn(async move {
                if let Err(e) = purge_prefix(store.as_ref(), &prefix).await {
                    error!(prefix = %prefix, error = %e, "Failed to purge remote prefix");
                }
            });
        }

        if let Err(e) = self.upload_assets(compilation).await {
            error!(
                name = %e.name,
                code = %e.code,
                message = %e.message,
                "OSS upload failed"
            );
            if !self.config.ignore_error {
                compilation.push_error(e);
            }
        }
    }

    /// Upload every selected asset under `prefix + name`, concurrently and
    /// unordered. Resolves after every upload has settled; the first failure
    /// in batch order becomes the batch error. Nothing is cancelled or
    /// rolled back.
    async fn upload_assets(&self, compilation: &Compilation) -> StoreResult<()> {
        let files = select_assets(compilation, self.config.exclude.as_ref());
        let total = files.len();
        let completed = AtomicUsize::new(0);

        let uploads = files.iter().map(|asset| {
            let key = format!("{}{}", self.config.prefix, asset.name);
            let completed = &completed;
            async move {
                self.store.put(&key, asset.content.clone()).await?;

                // Start and end notices hang off the completion counter, so
                // each is emitted at most once regardless of settle order.
                let done = completed.fetch_add(1, Ordering::SeqCst);
                if done == 0 {
                    self.log_info("OSS upload starting...");
                }
                self.log_info(&format!("Uploaded: {}", asset.name));
                if done + 1 == total {
                    self.log_info("OSS upload complete");
                }

                if self.config.remove_mode {
                    compilation.remove_asset(&asset.name);
                }
                Ok(())
            }
        });

        let results: Vec<StoreResult<()>> = join_all(uploads).await;
        for result in results {
            result?;
        }
        Ok(())
    }

    fn log_info(&self, msg: &str) {
        if self.config.enable_log {
            info!("{msg}");
        }
    }
}

/// Remove every remote object under `prefix` in one quiet batch delete.
pub async fn purge_prefix<S>(store: &S, prefix: &str) -> StoreResult<()>
where
    S: ObjectStore + ?Sized,
{
    let objects = store.list(prefix).await?;
    if objects.is_empty() {
        return Ok(());
    }
    store.delete_multi(objects, true).await
}
