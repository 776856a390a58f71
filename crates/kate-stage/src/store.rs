//! The stage storage trait.

use async_trait::async_trait;
use bytes::Bytes;

use kate_core::Result;

/// Read-only access to a remote document stage.
#[async_trait]
pub trait StageStore: Send + Sync {
    /// Relative paths of the files on the stage, at most `limit` of them.
    async fn list_file_names(&self, limit: usize) -> Result<Vec<String>>;

    /// Download one staged file by its relative path.
    async fn fetch_document(&self, path: &str) -> Result<Bytes>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trait_is_object_safe() {
        fn assert_object_safe(_: &dyn StageStore) {}
        let _ = assert_object_safe;
    }
}
