//! Orphan asset cleanup
//!
//! 一次请求产生的全部孤儿引用作为一个无序并发批次删除：
//! 等待全部完成、逐项收集结果。单个删除失败只记录日志，
//! 从不中断其余删除或记录变更 (fail-open)。

use crate::media::public_id::extract_public_id;
use crate::media::store::ObjectStore;

/// Per-batch deletion accounting
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct PurgeOutcome {
    /// 成功删除的资产数
    pub deleted: usize,
    /// 远端删除失败的资产数 (已记录日志)
    pub failed: usize,
    /// URL 无法提取标识符而跳过的引用数
    pub skipped: usize,
}

/// Delete every referenced asset, fail-open.
///
/// 无法提取标识符的引用直接跳过 (不是错误)；其余删除并发执行。
pub async fn purge_assets(store: &dyn ObjectStore, urls: &[String]) -> PurgeOutcome {
    let mut ids: Vec<String> = Vec::new();
    let mut skipped = 0usize;

    // 同一标识符只发一次删除 (按集合并集处理)
    for url in urls {
        match extract_public_id(url) {
            Some(id) => {
                if !ids.contains(&id) {
                    ids.push(id);
                }
            }
            None => {
                skipped += 1;
                tracing::debug!(url = %url, "No asset identifier in URL, skipping delete");
            }
        }
    }

    let results = futures::future::join_all(ids.iter().map(|id| store.delete(id))).await;

    let mut deleted = 0usize;
    let mut failed = 0usize;
    for (id, result) in ids.iter().zip(results) {
        match result {
            Ok(()) => deleted += 1,
            Err(e) => {
                failed += 1;
                tracing::warn!(public_id = %id, error = %e, "Failed to delete orphan asset");
            }
        }
    }

    if deleted > 0 {
        tracing::info!(count = deleted, "Orphan assets cleaned up");
    }

    PurgeOutcome {
        deleted,
        failed,
        skipped,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::media::testing::MemoryStore;

    #[tokio::test]
    async fn deletes_every_extractable_reference() {
        let store = MemoryStore::new();
        let urls = vec![
            "https://host/upload/v1/packages/a.jpg".to_string(),
            "https://host/upload/v1/packages/b.jpg".to_string(),
        ];

        let outcome = purge_assets(&store, &urls).await;
        assert_eq!(outcome.deleted, 2);
        assert_eq!(outcome.failed, 0);
        assert_eq!(outcome.skipped, 0);

        let deletes = store.deletes();
        assert!(deletes.contains(&"packages/a".to_string()));
        assert!(deletes.contains(&"packages/b".to_string()));
    }

    #[tokio::test]
    async fn unextractable_urls_issue_no_delete_calls() {
        let store = MemoryStore::new();
        let urls = vec!["https://host/files/a.jpg".to_string()];

        let outcome = purge_assets(&store, &urls).await;
        assert_eq!(outcome.deleted, 0);
        assert_eq!(outcome.skipped, 1);
        assert!(store.deletes().is_empty());
    }

    #[tokio::test]
    async fn failures_are_counted_but_do_not_abort_the_batch() {
        let store = MemoryStore::new().failing_on("packages/bad");
        let urls = vec![
            "https://host/upload/v1/packages/good.jpg".to_string(),
            "https://host/upload/v1/packages/bad.jpg".to_string(),
            "https://host/upload/v1/packages/also-good.jpg".to_string(),
        ];

        let outcome = purge_assets(&store, &urls).await;
        assert_eq!(outcome.deleted, 2);
        assert_eq!(outcome.failed, 1);
    }
}
