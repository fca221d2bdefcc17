use std::collections::HashMap;
use std::io;
use std::path::PathBuf;

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::release::{Release, ReleaseStatus};

#[async_trait]
pub trait ReleaseStorage: Send + Sync {
    async fn get(&self, title: &str) -> anyhow::Result<Option<Release>>;
    /// Creates or overwrites the release under `title`. Titles are
    /// user-supplied, so a colliding title silently replaces the old record.
    async fn upsert(&self, title: &str, release: Release) -> anyhow::Result<()>;
    /// Sets the status of an existing release and returns the updated record,
    /// or `None` when the title is unknown.
    async fn set_status(
        &self,
        title: &str,
        status: ReleaseStatus,
    ) -> anyhow::Result<Option<Release>>;
}

/// Release map persisted as a single pretty-printed JSON object keyed by
/// title. Same whole-file load/overwrite contract as [`JsonRoleStorage`],
/// including the cross-process lost-update caveat.
///
/// [`JsonRoleStorage`]: crate::storage::JsonRoleStorage
pub struct JsonReleaseStorage {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl JsonReleaseStorage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    async fn load(&self) -> anyhow::Result<HashMap<String, Release>> {
        match tokio::fs::read(&self.path).await {
            Ok(bytes) => Ok(serde_json::from_slice(&bytes)?),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(HashMap::new()),
            Err(err) => Err(err.into()),
        }
    }

    async fn save(&self, releases: &HashMap<String, Release>) -> anyhow::Result<()> {
        tokio::fs::write(&self.path, serde_json::to_string_pretty(releases)?).await?;
        Ok(())
    }
}

#[async_trait]
impl ReleaseStorage for JsonReleaseStorage {
    async fn get(&self, title: &str) -> anyhow::Result<Option<Release>> {
        let releases = self.load().await?;
        Ok(releases.get(title).cloned())
    }

    async fn upsert(&self, title: &str, release: Release) -> anyhow::Result<()> {
        let _guard = self.write_lock.lock().await;
        let mut releases = self.load().await?;
        releases.insert(title.to_string(), release);
        self.save(&releases).await
    }

    async fn set_status(
        &self,
        title: &str,
        status: ReleaseStatus,
    ) -> anyhow::Result<Option<Release>> {
        let _guard = self.write_lock.lock().await;
        let mut releases = self.load().await?;
        let Some(release) = releases.get_mut(title) else {
            return Ok(None);
        };
        release.status = status;
        let updated = release.clone();
        self.save(&releases).await?;
        Ok(Some(updated))
    }
}
