use crate::utils::error::Result;
use async_trait::async_trait;

/// Destination for exported content artifacts.
#[async_trait]
pub trait Storage: Send + Sync {
    async fn read_file(&self, path: &str) -> Result<Vec<u8>>;
    async fn write_file(&self, path: &str, data: &[u8]) -> Result<()>;
}
