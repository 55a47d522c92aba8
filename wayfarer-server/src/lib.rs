//! Wayfarer Admin Server - 旅行预订站点管理后端
//!
//! # 架构概述
//!
//! 本模块是管理后端的主入口，提供以下核心功能：
//!
//! - **数据库** (`db`): 嵌入式 SurrealDB 文档存储
//! - **认证** (`auth`): JWT + Argon2 管理员凭证门
//! - **图片资产** (`media`): 图片集合并 + 远端对象存储 + 孤儿清理
//! - **HTTP API** (`api`): RESTful CRUD / 搜索 / 统计接口
//!
//! # 模块结构
//!
//! ```text
//! wayfarer-server/src/
//! ├── core/          # 配置、状态、服务器
//! ├── auth/          # JWT 认证
//! ├── db/            # 数据库层 (models + repositories)
//! ├── media/         # 图片集合并、标识符提取、对象存储、清理
//! ├── api/           # HTTP 路由和处理器
//! └── utils/         # 错误、日志、校验工具
//! ```

pub mod api;
pub mod auth;
pub mod core;
pub mod db;
pub mod media;
pub mod utils;

// Re-export 公共类型
pub use auth::{CurrentAdmin, JwtService};
pub use core::{Config, Server, ServerState};
pub use media::{ObjectStore, Reconciled, extract_public_id, purge_assets, reconcile};
pub use utils::{AppError, AppResponse, AppResult};

// Re-export logger functions
pub use utils::logger::{init_logger, init_logger_with_file};

// Security logging macro - 支持 tracing 格式说明符
#[macro_export]
macro_rules! security_log {
    ($level:expr, $event:expr, $($key:ident = $value:expr),*) => {
        tracing::info!(
            target: "security",
            level = $level,
            event = $event,
            $($key = $value),*
        );
    };
}

/// 设置环境 (dotenv, 工作目录, 日志)
pub fn setup_environment() -> anyhow::Result<()> {
    dotenv::dotenv().ok();

    let work_dir = std::env::var("WORK_DIR").unwrap_or_else(|_| "/var/lib/wayfarer".into());
    std::fs::create_dir_all(&work_dir)?;

    let log_dir = std::path::Path::new(&work_dir).join("logs");
    std::fs::create_dir_all(&log_dir)?;

    let log_level = std::env::var("LOG_LEVEL").ok();
    utils::logger::init_logger_with_file(log_level.as_deref(), log_dir.to_str());

    Ok(())
}

pub fn print_banner() {
    println!(
        r#"
 _       __            ____
| |     / /___ ___  __/ __/___ _________  _____
| | /| / / __ `/ / / / /_/ __ `/ ___/ _ \/ ___/
| |/ |/ / /_/ / /_/ / __/ /_/ / /  /  __/ /
|__/|__/\__,_/\__, /_/  \__,_/_/   \___/_/
             /____/
    "#
    );
}
