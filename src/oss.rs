//! Aliyun OSS implementation of [`ObjectStore`], backed by an OpenDAL
//! operator.
//!
//! The operator is created once from the publisher's credentials and reused
//! for every call. Credentials left empty are not set on the builder, so the
//! backend sends unsigned requests and the provider's authentication error
//! comes back at call time rather than at construction.

use futures::TryStreamExt;
use futures::future::{join_all, try_join_all};
use opendal::{Operator, services};
use tracing::debug;

use crate::config::Auth;
use crate::store::{ObjectStore, StoreError, StoreResult};

/// OSS-backed object store.
#[derive(Clone)]
pub struct OssStore {
    op: Operator,
}

impl OssStore {
    /// Build the client handle from bucket credentials.
    pub fn new(auth: &Auth) -> StoreResult<Self> {
        let mut builder = services::Oss::default().bucket(&auth.bucket);
        if !auth.region.is_empty() {
            builder = builder.endpoint(&format!("https://{}.aliyuncs.com", auth.region));
        }
        if !auth.access_key_id.is_empty() {
            builder = builder.access_key_id(&auth.access_key_id);
        }
        if !auth.access_key_secret.is_empty() {
            builder = builder.access_key_secret(&auth.access_key_secret);
        }

        let op = Operator::new(builder).map_err(StoreError::from)?.finish();
        Ok(Self { op })
    }
}

#[async_trait::async_trait]
impl ObjectStore for OssStore {
    async fn list(&self, prefix: &str) -> StoreResult<Vec<String>> {
        debug!(prefix = %prefix, "Listing remote objects");
        let entries: Vec<_> = self
            .op
            .lister_with(prefix)
            .recursive(true)
            .await
            .map_err(StoreError::from)?
            .try_collect()
            .await
            .map_err(StoreError::from)?;

        Ok(entries
            .into_iter()
            .map(|entry| entry.path().to_string())
            .filter(|path| !path.ends_with('/'))
            .collect())
    }

    async fn delete_multi(&self, keys: Vec<String>, quiet: bool) -> StoreResult<()> {
        debug!(count = keys.len(), quiet, "Deleting remote objects");
        let deletions = keys.iter().map(|key| self.op.delete(key));
        if quiet {
            // Best-effort: individual failures are swallowed.
            let _ = join_all(deletions).await;
        } else {
            try_join_all(deletions).await.map_err(StoreError::from)?;
        }
        Ok(())
    }

    async fn put(&self, key: &str, content: Vec<u8>) -> StoreResult<()> {
        debug!(key = %key, size = content.len(), "Uploading object");
        self.op.write(key, content).await.map_err(StoreError::from)?;
        Ok(())
    }
}

impl From<opendal::Error> for StoreError {
    fn from(err: opendal::Error) -> Self {
        StoreError::new("OssError", format!("{:?}", err.kind()), err.to_string())
    }
}
