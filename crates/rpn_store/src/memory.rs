use crate::error::Result;
use crate::table::{StackEntry, StackTable};
use crate::StackStore;
use async_trait::async_trait;
use tokio::sync::Mutex;

/// Table kept in process memory. Lost on restart.
#[derive(Default)]
pub struct MemoryStore {
    table: Mutex<StackTable>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl StackStore for MemoryStore {
    async fn create(&self, tokens: &[String]) -> Result<u64> {
        Ok(self.table.lock().await.insert(tokens))
    }

    async fn get(&self, stack_id: u64) -> Result<Option<Vec<String>>> {
        Ok(self.table.lock().await.get(stack_id))
    }

    async fn list_all(&self) -> Result<Vec<StackEntry>> {
        Ok(self.table.lock().await.entries())
    }

    async fn update(&self, stack_id: u64, tokens: &[String]) -> Result<Option<Vec<String>>> {
        Ok(self.table.lock().await.replace(stack_id, tokens))
    }

    async fn delete(&self, stack_id: u64) -> Result<u64> {
        self.table.lock().await.remove(stack_id);
        Ok(stack_id)
    }
}
