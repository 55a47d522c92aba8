//! Multipart form collection
//!
//! CRUD 接口的 create/update 都是带文件的多段表单。
//! 本模块把一次表单收集成文本字段 + 文件列表，并做图片校验。
//!
//! JSON 编码的子字段 (如 `existingImages`) 按宽松策略解析：
//! 格式错误时回退为空默认值，而不是让整个请求失败。

use axum::extract::Multipart;
use serde::de::DeserializeOwned;
use std::collections::HashMap;
use std::path::PathBuf;

use crate::media::{ObjectStore, StoreError};
use crate::utils::{AppError, AppResult};

/// Maximum file size (5MB)
const MAX_FILE_SIZE: usize = 5 * 1024 * 1024;

/// Supported image formats
const SUPPORTED_FORMATS: &[&str] = &["png", "jpg", "jpeg", "webp"];

/// One uploaded file from a multipart form
#[derive(Debug, Clone)]
pub struct UploadedFile {
    /// 表单字段名 (thumbnail / images / activityImages / ...)
    pub field: String,
    pub filename: String,
    pub bytes: Vec<u8>,
}

/// A fully collected multipart form: text fields plus validated files
#[derive(Debug, Default)]
pub struct CollectedForm {
    pub(crate) texts: HashMap<String, String>,
    pub(crate) files: Vec<UploadedFile>,
}

impl CollectedForm {
    /// Drain a multipart request into memory, validating each file
    pub async fn from_multipart(mut multipart: Multipart) -> AppResult<Self> {
        let mut texts = HashMap::new();
        let mut files = Vec::new();

        while let Some(field) = multipart.next_field().await? {
            let name = field.name().unwrap_or_default().to_string();

            if let Some(filename) = field.file_name().map(|s| s.to_string()) {
                let bytes = field.bytes().await?.to_vec();
                // 空文件槽位直接忽略 (浏览器会提交空的 file input)
                if bytes.is_empty() {
                    continue;
                }
                validate_image(&bytes, &filename)?;
                files.push(UploadedFile {
                    field: name,
                    filename,
                    bytes,
                });
            } else {
                let value = field.text().await?;
                texts.insert(name, value);
            }
        }

        Ok(Self { texts, files })
    }

    /// Text field value, if present
    pub fn text(&self, name: &str) -> Option<&str> {
        self.texts.get(name).map(String::as_str)
    }

    /// Validate that every listed field is present and non-empty.
    ///
    /// 失败时一次性列出所有缺失字段。
    pub fn require_fields(&self, fields: &[&str]) -> AppResult<()> {
        let missing: Vec<&str> = fields
            .iter()
            .copied()
            .filter(|f| self.text(f).map(|v| v.trim().is_empty()).unwrap_or(true))
            .collect();

        if missing.is_empty() {
            Ok(())
        } else {
            Err(AppError::validation(format!(
                "Missing required fields: {}",
                missing.join(", ")
            )))
        }
    }

    /// Parse a numeric field; present-but-malformed is a validation error
    pub fn f64_field(&self, name: &str) -> AppResult<Option<f64>> {
        match self.text(name) {
            None => Ok(None),
            Some(raw) => raw
                .trim()
                .parse::<f64>()
                .map(Some)
                .map_err(|_| AppError::validation(format!("{name} must be a number"))),
        }
    }

    /// Parse an integer field; present-but-malformed is a validation error
    pub fn i32_field(&self, name: &str) -> AppResult<Option<i32>> {
        match self.text(name) {
            None => Ok(None),
            Some(raw) => raw
                .trim()
                .parse::<i32>()
                .map(Some)
                .map_err(|_| AppError::validation(format!("{name} must be an integer"))),
        }
    }

    /// Lenient JSON sub-field parsing: absent or malformed JSON yields the
    /// type's default instead of failing the whole request
    pub fn json_field<T: DeserializeOwned + Default>(&self, name: &str) -> T {
        match self.text(name) {
            Some(raw) => serde_json::from_str(raw).unwrap_or_else(|e| {
                tracing::debug!(field = %name, error = %e, "Malformed JSON form field, using default");
                T::default()
            }),
            None => T::default(),
        }
    }

    /// Files uploaded under the given field name, in submission order
    pub fn files(&self, name: &str) -> Vec<&UploadedFile> {
        self.files.iter().filter(|f| f.field == name).collect()
    }
}

/// Validate image file (size, extension allow-list, decodable)
fn validate_image(data: &[u8], filename: &str) -> AppResult<()> {
    if data.len() > MAX_FILE_SIZE {
        return Err(AppError::validation(format!(
            "File too large. Maximum size is {} bytes ({}MB)",
            MAX_FILE_SIZE,
            MAX_FILE_SIZE / 1024 / 1024
        )));
    }

    let ext = PathBuf::from(filename)
        .extension()
        .and_then(|ext| ext.to_str().map(|s| s.to_lowercase()))
        .ok_or_else(|| {
            AppError::validation(format!("Invalid file extension for: {}", filename))
        })?;

    if !SUPPORTED_FORMATS.contains(&ext.as_str()) {
        return Err(AppError::validation(format!(
            "Unsupported file format '{}'. Supported: {}",
            ext,
            SUPPORTED_FORMATS.join(", ")
        )));
    }

    // Verify it's actually an image by trying to load it
    if let Err(e) = image::load_from_memory(data) {
        return Err(AppError::validation(format!(
            "Invalid image file ({}): {}",
            ext, e
        )));
    }

    Ok(())
}

/// Upload files to the object store in submission order, returning URLs.
///
/// 顺序上传：活动图片的切片规则依赖上传顺序。
pub async fn upload_files(
    store: &dyn ObjectStore,
    files: &[&UploadedFile],
    folder: &str,
) -> AppResult<Vec<String>> {
    let mut urls = Vec::with_capacity(files.len());
    for file in files {
        let asset = store
            .upload(file.bytes.clone(), &file.filename, folder)
            .await
            .map_err(|e: StoreError| AppError::upstream(format!("Image upload failed: {e}")))?;
        urls.push(asset.url);
    }
    Ok(urls)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form_with(texts: &[(&str, &str)]) -> CollectedForm {
        CollectedForm {
            texts: texts
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
            files: Vec::new(),
        }
    }

    #[test]
    fn require_fields_lists_every_missing_field() {
        let form = form_with(&[("title", "Goa"), ("price", "")]);
        let err = form
            .require_fields(&["title", "price", "days"])
            .unwrap_err();
        let message = format!("{err}");
        assert!(message.contains("price"));
        assert!(message.contains("days"));
        assert!(!message.contains("title"));
    }

    #[test]
    fn malformed_json_field_falls_back_to_default() {
        let form = form_with(&[("existingImages", "not-json[")]);
        let images: Vec<String> = form.json_field("existingImages");
        assert!(images.is_empty());

        let form = form_with(&[("existingImages", r#"["u1","u2"]"#)]);
        let images: Vec<String> = form.json_field("existingImages");
        assert_eq!(images, vec!["u1", "u2"]);
    }

    #[test]
    fn numeric_fields_reject_garbage_but_allow_absence() {
        let form = form_with(&[("price", "12.5"), ("days", "abc")]);
        assert_eq!(form.f64_field("price").unwrap(), Some(12.5));
        assert_eq!(form.f64_field("missing").unwrap(), None);
        assert!(form.i32_field("days").is_err());
    }

    #[test]
    fn validate_image_rejects_unknown_extension_and_garbage() {
        assert!(validate_image(&[0u8; 10], "file.gif").is_err());
        assert!(validate_image(&[0u8; 10], "noext").is_err());
        // 合法扩展名但不是图片内容
        assert!(validate_image(&[0u8; 10], "fake.png").is_err());
    }
}
