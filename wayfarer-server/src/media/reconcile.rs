//! Image-set reconciliation
//!
//! 所有实体 (套餐/酒店/签证/航班) 的图片合并走同一条规则：
//! 调用方声明要保留的旧图，新上传的图追加在后，
//! 旧集合中未被保留的图成为孤儿，由调用方负责远端删除。

/// Result of reconciling one image set
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reconciled {
    /// 新的权威有序图片列表 (保留在前，新增在后)
    pub new_set: Vec<String>,
    /// 旧集合中未被保留的图片，待远端删除 (按首次出现顺序去重)
    pub orphaned: Vec<String>,
}

/// Compute the new authoritative image set and the orphaned references.
///
/// - `existing`: 当前持久化的图片集 (创建路径为空)
/// - `retained`: 调用方声明保留的子序列，原样信任 —— 不校验其确实属于
///   `existing`，未知条目静默保留
/// - `newly_uploaded`: 新上传资产的 URL，按上传顺序
/// - `capacity`: 最终集合长度上限
///
/// 纯函数，无副作用；孤儿删除与持久化由调用方完成。
///
/// 注意：超出 `capacity` 被截断的尾部条目不会进入 `orphaned`，
/// 它们仍是远端的有效资产，只是不再被引用。
pub fn reconcile(
    existing: &[String],
    retained: &[String],
    newly_uploaded: Vec<String>,
    capacity: Option<usize>,
) -> Reconciled {
    let mut new_set: Vec<String> = retained.to_vec();
    new_set.extend(newly_uploaded);
    if let Some(cap) = capacity {
        new_set.truncate(cap);
    }

    // orphaned = existing − retained (按标识符的集合差)
    let mut orphaned: Vec<String> = Vec::new();
    for img in existing {
        if !retained.contains(img) && !orphaned.contains(img) {
            orphaned.push(img.clone());
        }
    }

    Reconciled { new_set, orphaned }
}

/// Split one flat upload batch into per-sub-item slices.
///
/// 行程活动的图片以单个扁平批次上传，按活动声明的数量依序切片：
/// 活动 *i* 从批次头部消费 `counts[i]` 个 (未声明默认 1)。
/// 批次耗尽后余下的活动得到空切片。
pub fn slice_flat_batch<T>(counts: &[usize], batch: Vec<T>) -> Vec<Vec<T>> {
    let mut remaining = batch.into_iter();
    counts
        .iter()
        .map(|&count| remaining.by_ref().take(count).collect())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn urls(v: &[&str]) -> Vec<String> {
        v.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn new_set_is_retained_then_new() {
        let result = reconcile(
            &urls(&["a", "b", "c"]),
            &urls(&["c", "a"]),
            urls(&["x", "y"]),
            None,
        );
        assert_eq!(result.new_set, urls(&["c", "a", "x", "y"]));
        assert_eq!(result.orphaned, urls(&["b"]));
    }

    #[test]
    fn capacity_truncates_without_orphaning_overflow() {
        let result = reconcile(&urls(&["a"]), &urls(&["a"]), urls(&["x", "y", "z"]), Some(2));
        assert_eq!(result.new_set, urls(&["a", "x"]));
        // 被截掉的 y/z 不进孤儿集
        assert!(result.orphaned.is_empty());
    }

    #[test]
    fn orphans_are_set_difference_independent_of_retained_order_and_duplicates() {
        let existing = urls(&["a", "b", "c", "b"]);
        let a = reconcile(&existing, &urls(&["c", "a", "c"]), vec![], None);
        let b = reconcile(&existing, &urls(&["a", "c"]), vec![], None);
        assert_eq!(a.orphaned, urls(&["b"]));
        assert_eq!(a.orphaned, b.orphaned);
        // retained 中的重复按原样保留
        assert_eq!(a.new_set, urls(&["c", "a", "c"]));
    }

    #[test]
    fn unknown_retained_entries_are_silently_kept() {
        let result = reconcile(&urls(&["a"]), &urls(&["a", "ghost"]), vec![], None);
        assert_eq!(result.new_set, urls(&["a", "ghost"]));
        assert!(result.orphaned.is_empty());
    }

    #[test]
    fn idempotent_when_everything_retained_and_nothing_new() {
        let existing = urls(&["a", "b", "b", "c"]);
        let result = reconcile(&existing, &existing, vec![], None);
        assert_eq!(result.new_set, existing);
        assert!(result.orphaned.is_empty());
    }

    #[test]
    fn create_path_with_empty_existing() {
        let result = reconcile(&[], &[], urls(&["u1", "u2"]), Some(10));
        assert_eq!(result.new_set, urls(&["u1", "u2"]));
        assert!(result.orphaned.is_empty());
    }

    #[test]
    fn retaining_nothing_orphans_everything() {
        let result = reconcile(&urls(&["a", "b"]), &[], vec![], None);
        assert!(result.new_set.is_empty());
        assert_eq!(result.orphaned, urls(&["a", "b"]));
    }

    #[test]
    fn slices_consume_declared_counts_from_front() {
        let slices = slice_flat_batch(&[2, 1, 3], urls(&["a", "b", "c", "d", "e", "f"]));
        assert_eq!(slices, vec![urls(&["a", "b"]), urls(&["c"]), urls(&["d", "e", "f"])]);
    }

    #[test]
    fn exhausted_batch_yields_short_and_empty_slices() {
        let slices = slice_flat_batch(&[2, 2, 1], urls(&["a", "b", "c"]));
        assert_eq!(slices, vec![urls(&["a", "b"]), urls(&["c"]), vec![]]);
    }

    #[test]
    fn empty_counts_consume_nothing() {
        let slices: Vec<Vec<String>> = slice_flat_batch(&[], urls(&["a"]));
        assert!(slices.is_empty());
    }
}
