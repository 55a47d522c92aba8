//! 图片资产模块
//!
//! 各实体的图片都存放在一个远端对象存储中，本模块是唯一的图片子系统：
//!
//! - [`reconcile`] - 图片集合合并规则 (保留 + 新增 → 新集合 + 孤儿)
//! - [`public_id`] - 从资产 URL 提取删除用标识符
//! - [`store`] - 对象存储客户端 (trait 注入，可替换)
//! - [`cleanup`] - 孤儿资产的 fail-open 并发删除

pub mod cleanup;
pub mod public_id;
pub mod reconcile;
pub mod store;

pub use cleanup::{PurgeOutcome, purge_assets};
pub use public_id::extract_public_id;
pub use reconcile::{Reconciled, reconcile, slice_flat_batch};
pub use store::{HttpObjectStore, MediaConfig, ObjectStore, StoreError, StoredAsset};

#[cfg(test)]
pub(crate) mod testing {
    //! In-memory object store double for tests

    use super::store::{ObjectStore, StoreError, StoredAsset};
    use async_trait::async_trait;
    use std::collections::HashSet;
    use std::sync::Mutex;

    pub struct MemoryStore {
        uploads: Mutex<Vec<StoredAsset>>,
        deletes: Mutex<Vec<String>>,
        fail_deletes: HashSet<String>,
    }

    impl MemoryStore {
        pub fn new() -> Self {
            Self {
                uploads: Mutex::new(Vec::new()),
                deletes: Mutex::new(Vec::new()),
                fail_deletes: HashSet::new(),
            }
        }

        /// Make deletes of this identifier fail
        pub fn failing_on(mut self, public_id: &str) -> Self {
            self.fail_deletes.insert(public_id.to_string());
            self
        }

        pub fn uploads(&self) -> Vec<StoredAsset> {
            self.uploads.lock().unwrap().clone()
        }

        pub fn deletes(&self) -> Vec<String> {
            self.deletes.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl ObjectStore for MemoryStore {
        async fn upload(
            &self,
            _bytes: Vec<u8>,
            _filename: &str,
            folder: &str,
        ) -> Result<StoredAsset, StoreError> {
            let mut uploads = self.uploads.lock().unwrap();
            let public_id = format!("{}/img{}", folder, uploads.len() + 1);
            let asset = StoredAsset {
                url: format!("https://assets.test/image/upload/v1/{public_id}.jpg"),
                public_id,
            };
            uploads.push(asset.clone());
            Ok(asset)
        }

        async fn delete(&self, public_id: &str) -> Result<(), StoreError> {
            if self.fail_deletes.contains(public_id) {
                return Err(StoreError::Rejected("simulated failure".to_string()));
            }
            self.deletes.lock().unwrap().push(public_id.to_string());
            Ok(())
        }
    }
}
