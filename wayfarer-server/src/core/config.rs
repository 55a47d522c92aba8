use crate::auth::JwtConfig;
use crate::media::MediaConfig;

/// 服务器配置 - 全部配置项
///
/// # 环境变量
///
/// 所有配置项都可以通过环境变量覆盖：
///
/// | 环境变量 | 默认值 | 说明 |
/// |----------|--------|------|
/// | WORK_DIR | /var/lib/wayfarer | 工作目录 (数据库、日志) |
/// | HTTP_PORT | 3000 | HTTP 服务端口 |
/// | ENVIRONMENT | development | 运行环境 |
/// | ADMIN_USERNAME | admin | 管理员种子用户名 |
/// | ADMIN_PASSWORD | changeme | 管理员种子密码 (仅首次播种时使用) |
/// | JWT_SECRET | (开发环境自动生成) | 会话令牌签名密钥 |
/// | MEDIA_API_BASE | https://api.cloudinary.com/v1_1 | 远端图片存储 API |
/// | MEDIA_CLOUD_NAME / MEDIA_API_KEY / MEDIA_API_SECRET | - | 存储凭证 |
///
/// # 示例
///
/// ```ignore
/// WORK_DIR=/data/wayfarer HTTP_PORT=8080 cargo run
/// ```
#[derive(Debug, Clone)]
pub struct Config {
    /// 工作目录，存储数据库和日志文件
    pub work_dir: String,
    /// HTTP API 服务端口
    pub http_port: u16,
    /// 运行环境: development | staging | production
    pub environment: String,
    /// JWT 认证配置
    pub jwt: JwtConfig,
    /// 远端图片存储配置
    pub media: MediaConfig,
    /// 管理员种子用户名
    pub admin_username: String,
    /// 管理员种子密码
    pub admin_password: String,
}

impl Config {
    /// 从环境变量加载配置
    ///
    /// 如果环境变量未设置，使用默认值
    pub fn from_env() -> Self {
        Self {
            work_dir: std::env::var("WORK_DIR").unwrap_or_else(|_| "/var/lib/wayfarer".into()),
            http_port: std::env::var("HTTP_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(3000),
            environment: std::env::var("ENVIRONMENT").unwrap_or_else(|_| "development".into()),
            jwt: JwtConfig::default(),
            media: MediaConfig::default(),
            admin_username: std::env::var("ADMIN_USERNAME").unwrap_or_else(|_| "admin".into()),
            admin_password: std::env::var("ADMIN_PASSWORD").unwrap_or_else(|_| "changeme".into()),
        }
    }

    /// 使用自定义值覆盖部分配置
    ///
    /// 常用于测试场景
    pub fn with_overrides(work_dir: impl Into<String>, http_port: u16) -> Self {
        let mut config = Self::from_env();
        config.work_dir = work_dir.into();
        config.http_port = http_port;
        config
    }

    /// 是否生产环境
    pub fn is_production(&self) -> bool {
        self.environment == "production"
    }

    /// 是否开发环境
    pub fn is_development(&self) -> bool {
        self.environment == "development"
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_env()
    }
}
