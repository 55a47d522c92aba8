//! Remote object store client
//!
//! 图片资产存放在外部图片主机上：上传返回稳定 URL，
//! 按标识符删除是幂等的 (删除未知标识符不报错)。
//! 通过 trait 注入，测试中可替换为内存实现。

use async_trait::async_trait;
use serde::Deserialize;
use sha2::{Digest, Sha256};
use thiserror::Error;
use uuid::Uuid;

/// 远端存储配置
///
/// | 环境变量 | 默认值 | 说明 |
/// |----------|--------|------|
/// | MEDIA_API_BASE | https://api.cloudinary.com/v1_1 | 存储 API 基地址 |
/// | MEDIA_CLOUD_NAME | wayfarer | 账户名 (URL 路径段) |
/// | MEDIA_API_KEY | (空) | API key |
/// | MEDIA_API_SECRET | (空) | 签名密钥 |
#[derive(Debug, Clone)]
pub struct MediaConfig {
    pub api_base: String,
    pub cloud_name: String,
    pub api_key: String,
    pub api_secret: String,
}

impl Default for MediaConfig {
    fn default() -> Self {
        Self {
            api_base: std::env::var("MEDIA_API_BASE")
                .unwrap_or_else(|_| "https://api.cloudinary.com/v1_1".into()),
            cloud_name: std::env::var("MEDIA_CLOUD_NAME").unwrap_or_else(|_| "wayfarer".into()),
            api_key: std::env::var("MEDIA_API_KEY").unwrap_or_default(),
            api_secret: std::env::var("MEDIA_API_SECRET").unwrap_or_default(),
        }
    }
}

/// One stored asset: stable URL plus its opaque identifier
#[derive(Debug, Clone)]
pub struct StoredAsset {
    pub public_id: String,
    pub url: String,
}

/// Object store errors
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Object store request failed: {0}")]
    Request(String),

    #[error("Object store rejected the operation: {0}")]
    Rejected(String),
}

/// Remote object store capability
///
/// 上传与删除都是单次往返；无重试队列。
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Upload one asset into the given logical folder, returning its
    /// stable URL and identifier
    async fn upload(
        &self,
        bytes: Vec<u8>,
        filename: &str,
        folder: &str,
    ) -> Result<StoredAsset, StoreError>;

    /// Delete an asset by identifier. Idempotent: deleting an unknown
    /// identifier succeeds.
    async fn delete(&self, public_id: &str) -> Result<(), StoreError>;
}

/// Sign request params: SHA-256 hex over the alphabetically sorted
/// `key=value` pairs joined with `&`, followed by the API secret
fn sign_params(params: &[(&str, &str)], api_secret: &str) -> String {
    let mut sorted: Vec<(&str, &str)> = params.to_vec();
    sorted.sort_by_key(|(k, _)| *k);
    let joined = sorted
        .iter()
        .map(|(k, v)| format!("{k}={v}"))
        .collect::<Vec<_>>()
        .join("&");
    hex::encode(Sha256::digest(format!("{joined}{api_secret}").as_bytes()))
}

/// HTTP implementation of [`ObjectStore`]
#[derive(Clone)]
pub struct HttpObjectStore {
    config: MediaConfig,
    client: reqwest::Client,
}

impl HttpObjectStore {
    pub fn new(config: MediaConfig) -> Self {
        Self {
            config,
            client: reqwest::Client::new(),
        }
    }

    fn endpoint(&self, op: &str) -> String {
        format!(
            "{}/{}/image/{}",
            self.config.api_base, self.config.cloud_name, op
        )
    }
}

#[async_trait]
impl ObjectStore for HttpObjectStore {
    async fn upload(
        &self,
        bytes: Vec<u8>,
        filename: &str,
        folder: &str,
    ) -> Result<StoredAsset, StoreError> {
        let timestamp = chrono::Utc::now().timestamp().to_string();
        let public_id = Uuid::new_v4().simple().to_string();

        let signature = sign_params(
            &[
                ("folder", folder),
                ("public_id", &public_id),
                ("timestamp", &timestamp),
            ],
            &self.config.api_secret,
        );

        let mime = mime_guess::from_path(filename).first_or_octet_stream();
        let part = reqwest::multipart::Part::bytes(bytes)
            .file_name(filename.to_string())
            .mime_str(mime.essence_str())
            .map_err(|e| StoreError::Request(format!("Invalid mime type: {e}")))?;

        let form = reqwest::multipart::Form::new()
            .part("file", part)
            .text("folder", folder.to_string())
            .text("public_id", public_id)
            .text("timestamp", timestamp)
            .text("api_key", self.config.api_key.clone())
            .text("signature", signature);

        let resp = self
            .client
            .post(self.endpoint("upload"))
            .multipart(form)
            .send()
            .await
            .map_err(|e| StoreError::Request(e.to_string()))?;

        if !resp.status().is_success() {
            return Err(StoreError::Rejected(format!(
                "upload returned {}",
                resp.status()
            )));
        }

        #[derive(Deserialize)]
        struct UploadResponse {
            public_id: String,
            secure_url: String,
        }

        let body: UploadResponse = resp
            .json()
            .await
            .map_err(|e| StoreError::Request(format!("Invalid upload response: {e}")))?;

        tracing::debug!(public_id = %body.public_id, "Asset uploaded to remote store");

        Ok(StoredAsset {
            public_id: body.public_id,
            url: body.secure_url,
        })
    }

    async fn delete(&self, public_id: &str) -> Result<(), StoreError> {
        let timestamp = chrono::Utc::now().timestamp().to_string();
        let signature = sign_params(
            &[("public_id", public_id), ("timestamp", &timestamp)],
            &self.config.api_secret,
        );

        let form = reqwest::multipart::Form::new()
            .text("public_id", public_id.to_string())
            .text("timestamp", timestamp)
            .text("api_key", self.config.api_key.clone())
            .text("signature", signature);

        let resp = self
            .client
            .post(self.endpoint("destroy"))
            .multipart(form)
            .send()
            .await
            .map_err(|e| StoreError::Request(e.to_string()))?;

        if !resp.status().is_success() {
            return Err(StoreError::Rejected(format!(
                "destroy returned {}",
                resp.status()
            )));
        }

        #[derive(Deserialize)]
        struct DestroyResponse {
            result: String,
        }

        let body: DestroyResponse = resp
            .json()
            .await
            .map_err(|e| StoreError::Request(format!("Invalid destroy response: {e}")))?;

        // "not found" 也算成功：按标识符删除是幂等的
        match body.result.as_str() {
            "ok" | "not found" => Ok(()),
            other => Err(StoreError::Rejected(format!("destroy result: {other}"))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn signature_is_stable_under_param_order() {
        let a = sign_params(&[("folder", "hotels"), ("timestamp", "123")], "secret");
        let b = sign_params(&[("timestamp", "123"), ("folder", "hotels")], "secret");
        assert_eq!(a, b);
        // 与手工计算的 SHA-256("folder=hotels&timestamp=123secret") 一致
        assert_eq!(a.len(), 64);
    }

    #[test]
    fn signature_depends_on_secret() {
        let a = sign_params(&[("public_id", "x"), ("timestamp", "1")], "secret-a");
        let b = sign_params(&[("public_id", "x"), ("timestamp", "1")], "secret-b");
        assert_ne!(a, b);
    }
}
