//! Asset identifier extraction
//!
//! 远端存储返回的 URL 在路径中编码了资产标识符。纯字符串解析：
//! 去掉查询串，取 `/upload/` 标记之后 (可选跳过一个版本段 `v<digits>`)
//! 到文件扩展名之前的部分。

const UPLOAD_MARKER: &str = "/upload/";

/// Extract the opaque asset identifier from a stored asset URL.
///
/// 返回 `None` 表示 URL 不符合远端存储的形状，
/// 调用方必须跳过该引用的删除，而不是报错。
pub fn extract_public_id(url: &str) -> Option<String> {
    // 去掉查询参数
    let path = url.split('?').next().unwrap_or(url);

    let marker_at = path.find(UPLOAD_MARKER)?;
    let mut rest = &path[marker_at + UPLOAD_MARKER.len()..];

    // 可选的版本段: "v" + 纯数字
    if let Some((first, tail)) = rest.split_once('/')
        && let Some(digits) = first.strip_prefix('v')
        && !digits.is_empty()
        && digits.bytes().all(|b| b.is_ascii_digit())
    {
        rest = tail;
    }

    // 去掉最后的文件扩展名；没有扩展名视为不匹配
    let dot_at = rest.rfind('.')?;
    if dot_at == 0 || dot_at + 1 == rest.len() {
        return None;
    }
    let public_id = &rest[..dot_at];

    if public_id.is_empty() {
        None
    } else {
        Some(public_id.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_id_with_version_and_query() {
        assert_eq!(
            extract_public_id("https://host/upload/v123/destinations/abc123.jpg?x=1"),
            Some("destinations/abc123".to_string())
        );
    }

    #[test]
    fn extracts_id_without_version_segment() {
        assert_eq!(
            extract_public_id("https://host/image/upload/hotels/room42.png"),
            Some("hotels/room42".to_string())
        );
    }

    #[test]
    fn non_numeric_version_like_segment_is_part_of_the_id() {
        assert_eq!(
            extract_public_id("https://host/upload/v12abc/file.jpg"),
            Some("v12abc/file".to_string())
        );
    }

    #[test]
    fn url_without_upload_marker_yields_none() {
        assert_eq!(extract_public_id("https://host/files/abc123.jpg"), None);
    }

    #[test]
    fn url_without_extension_yields_none() {
        assert_eq!(extract_public_id("https://host/upload/v1/destinations/abc"), None);
        assert_eq!(extract_public_id("https://host/upload/v1/trailingdot."), None);
    }

    #[test]
    fn empty_remainder_yields_none() {
        assert_eq!(extract_public_id("https://host/upload/"), None);
        assert_eq!(extract_public_id("https://host/upload/.jpg"), None);
    }
}
