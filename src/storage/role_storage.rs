use std::collections::HashMap;
use std::io;
use std::path::PathBuf;

use async_trait::async_trait;
use tokio::sync::Mutex;

use crate::release::Role;

#[async_trait]
pub trait RoleStorage: Send + Sync {
    async fn get(&self, user_id: u64) -> anyhow::Result<Option<Role>>;
    async fn set(&self, user_id: u64, role: Role) -> anyhow::Result<()>;
}

/// Role map persisted as a single pretty-printed JSON object,
/// `{"<user_id>": "manager" | "artist"}`. Every access loads the whole file;
/// every mutation rewrites it. The mutex serializes read-modify-write cycles
/// within this process only; a second process writing the same file can still
/// lose updates.
pub struct JsonRoleStorage {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl JsonRoleStorage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    async fn load(&self) -> anyhow::Result<HashMap<String, Role>> {
        match tokio::fs::read(&self.path).await {
            Ok(bytes) => Ok(serde_json::from_slice(&bytes)?),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(HashMap::new()),
            Err(err) => Err(err.into()),
        }
    }

    async fn save(&self, roles: &HashMap<String, Role>) -> anyhow::Result<()> {
        tokio::fs::write(&self.path, serde_json::to_string_pretty(roles)?).await?;
        Ok(())
    }
}

#[async_trait]
impl RoleStorage for JsonRoleStorage {
    async fn get(&self, user_id: u64) -> anyhow::Result<Option<Role>> {
        let roles = self.load().await?;
        Ok(roles.get(&user_id.to_string()).copied())
    }

    async fn set(&self, user_id: u64, role: Role) -> anyhow::Result<()> {
        let _guard = self.write_lock.lock().await;
        let mut roles = self.load().await?;
        roles.insert(user_id.to_string(), role);
        self.save(&roles).await
    }
}
