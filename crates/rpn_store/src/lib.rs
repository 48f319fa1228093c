//! Stack Store: persists stack id -> tokens.
//!
//! Every call is its own transaction: take the table lock, apply one change,
//! commit, release. Nothing is held between calls, so two requests that each
//! read-then-write the same stack can interleave and lose an update.

pub mod error;
pub mod file;
pub mod memory;
pub mod table;

use async_trait::async_trait;

pub use error::{Result, StoreError};
pub use file::FileStore;
pub use memory::MemoryStore;
pub use table::{StackEntry, StackRow, StackTable};

#[async_trait]
pub trait StackStore: Send + Sync {
    /// Store the tokens as given and return the new stack id.
    async fn create(&self, tokens: &[String]) -> Result<u64>;

    /// Filtered tokens of a stack, or `None` if the id is unknown.
    async fn get(&self, stack_id: u64) -> Result<Option<Vec<String>>>;

    async fn list_all(&self) -> Result<Vec<StackEntry>>;

    /// Replace a stack's tokens. Returns the filtered tokens that were
    /// stored, or `None` if the id is unknown.
    async fn update(&self, stack_id: u64, tokens: &[String]) -> Result<Option<Vec<String>>>;

    /// Remove a stack. Returns `stack_id` whether or not it existed.
    async fn delete(&self, stack_id: u64) -> Result<u64>;
}
