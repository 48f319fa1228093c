//! JSON-file backend.
//!
//! The whole table lives in one file. A write goes to `<path>.tmp` first and
//! is renamed over the table, so a crash mid-write leaves the previous
//! version intact. The in-memory copy is only swapped after the rename.

use crate::error::Result;
use crate::table::{StackEntry, StackTable};
use crate::StackStore;
use async_trait::async_trait;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::sync::Mutex;
use tracing::debug;

pub struct FileStore {
    path: PathBuf,
    table: Mutex<StackTable>,
}

impl FileStore {
    /// Load the table at `path`; a missing file starts an empty table.
    pub async fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let table = match fs::read(&path).await {
            Ok(bytes) => serde_json::from_slice(&bytes)?,
            Err(e) if e.kind() == ErrorKind::NotFound => StackTable::default(),
            Err(e) => return Err(e.into()),
        };
        debug!(path = %path.display(), rows = table.rows.len(), "opened stack table");
        Ok(Self { path, table: Mutex::new(table) })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn commit(&self, table: &StackTable) -> Result<()> {
        if let Some(dir) = self.path.parent().filter(|d| !d.as_os_str().is_empty()) {
            fs::create_dir_all(dir).await?;
        }
        let mut tmp = self.path.clone().into_os_string();
        tmp.push(".tmp");
        let tmp = PathBuf::from(tmp);
        fs::write(&tmp, serde_json::to_vec_pretty(table)?).await?;
        fs::rename(&tmp, &self.path).await?;
        debug!(path = %self.path.display(), next_id = table.next_id, "committed stack table");
        Ok(())
    }
}

#[async_trait]
impl StackStore for FileStore {
    async fn create(&self, tokens: &[String]) -> Result<u64> {
        let mut guard = self.table.lock().await;
        let mut next = guard.clone();
        let id = next.insert(tokens);
        self.commit(&next).await?;
        *guard = next;
        Ok(id)
    }

    async fn get(&self, stack_id: u64) -> Result<Option<Vec<String>>> {
        Ok(self.table.lock().await.get(stack_id))
    }

    async fn list_all(&self) -> Result<Vec<StackEntry>> {
        Ok(self.table.lock().await.entries())
    }

    async fn update(&self, stack_id: u64, tokens: &[String]) -> Result<Option<Vec<String>>> {
        let mut guard = self.table.lock().await;
        let mut next = guard.clone();
        let Some(stored) = next.replace(stack_id, tokens) else {
            return Ok(None);
        };
        self.commit(&next).await?;
        *guard = next;
        Ok(Some(stored))
    }

    async fn delete(&self, stack_id: u64) -> Result<u64> {
        let mut guard = self.table.lock().await;
        let mut next = guard.clone();
        if next.remove(stack_id) {
            self.commit(&next).await?;
            *guard = next;
        }
        Ok(stack_id)
    }
}
