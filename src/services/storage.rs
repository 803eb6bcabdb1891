//! # 统计文档存储后端
//!
//! `AnalyticsStore` 不直接接触文件系统，而是通过 `AnalyticsBackend` 读写统计文档的原始文本。
//! 这样解析失败、写入失败等错误语义统一由 store 处理，后端只负责搬运字节。
//!
//! 提供两种实现：
//! - `JsonFileBackend`：写入固定路径的 JSON 文件（生产环境）
//! - `MemoryBackend`：保存在内存中（测试）
//!
//! 两种实现都不加锁：并发的 load/save 会交错，最后写入者覆盖整份文档。

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::sync::Mutex;

/// 统计文档存储后端
#[async_trait]
pub trait AnalyticsBackend: Send + Sync {
    /// 读取文档原始文本
    ///
    /// # 返回值
    /// - `Ok(Some(text))` - 文档存在
    /// - `Ok(None)` - 文档尚不存在（视为空统计）
    ///
    /// # 错误
    /// 文档存在但无法读取时返回错误信息
    async fn load(&self) -> Result<Option<String>, String>;

    /// 用新文本覆盖整份文档
    async fn save(&self, content: &str) -> Result<(), String>;
}

/// 基于单个 JSON 文件的存储后端
pub struct JsonFileBackend {
    path: PathBuf,
}

impl JsonFileBackend {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl AnalyticsBackend for JsonFileBackend {
    async fn load(&self) -> Result<Option<String>, String> {
        match tokio::fs::read_to_string(&self.path).await {
            Ok(content) => Ok(Some(content)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(format!("读取统计文件 {} 失败: {}", self.path.display(), e)),
        }
    }

    async fn save(&self, content: &str) -> Result<(), String> {
        tokio::fs::write(&self.path, content)
            .await
            .map_err(|e| format!("写入统计文件 {} 失败: {}", self.path.display(), e))
    }
}

/// 内存存储后端
#[derive(Default)]
pub struct MemoryBackend {
    content: Mutex<Option<String>>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// 以给定文本作为初始文档（可用于模拟损坏的文件）
    pub fn with_content(content: impl Into<String>) -> Self {
        Self {
            content: Mutex::new(Some(content.into())),
        }
    }

    /// 当前保存的原始文本
    pub async fn raw(&self) -> Option<String> {
        self.content.lock().await.clone()
    }
}

#[async_trait]
impl AnalyticsBackend for MemoryBackend {
    async fn load(&self) -> Result<Option<String>, String> {
        Ok(self.content.lock().await.clone())
    }

    async fn save(&self, content: &str) -> Result<(), String> {
        *self.content.lock().await = Some(content.to_string());
        Ok(())
    }
}
