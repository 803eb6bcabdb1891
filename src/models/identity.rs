//! # 匿名客户端标识
//!
//! 前端首次访问时生成一个匿名标识并保存在本地存储中，之后每次上报都携带它。
//! 服务端不生成也不校验标识，只把它当作统计文档中的用户键。

use std::fmt;

use chrono::Utc;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// 请求体缺少 `userId` 时使用的标识
pub const ANONYMOUS: &str = "anonymous";

/// 展示时保留的字符数
const DISPLAY_PREFIX_CHARS: usize = 8;

const BASE36: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// 匿名客户端标识
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ClientIdentity(String);

impl ClientIdentity {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// 生成新标识：`u_<毫秒时间戳的 36 进制>_<9 位随机 36 进制字符>`
    pub fn generate() -> Self {
        let millis = Utc::now().timestamp_millis().max(0) as u64;
        let mut rng = rand::thread_rng();
        let suffix: String = (0..9)
            .map(|_| BASE36[rng.gen_range(0..BASE36.len())] as char)
            .collect();
        Self(format!("u_{}_{}", to_base36(millis), suffix))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// 面板展示用的截断标识（按字符而非字节截断）
    pub fn display_id(&self) -> String {
        truncate_for_display(&self.0)
    }
}

impl fmt::Display for ClientIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<Option<String>> for ClientIdentity {
    fn from(id: Option<String>) -> Self {
        match id {
            Some(id) if !id.is_empty() => Self(id),
            _ => Self(ANONYMOUS.to_string()),
        }
    }
}

/// 取前 8 个字符并追加省略号
pub fn truncate_for_display(id: &str) -> String {
    let prefix: String = id.chars().take(DISPLAY_PREFIX_CHARS).collect();
    format!("{}...", prefix)
}

fn to_base36(mut n: u64) -> String {
    if n == 0 {
        return "0".to_string();
    }
    let mut digits = Vec::new();
    while n > 0 {
        digits.push(BASE36[(n % 36) as usize]);
        n /= 36;
    }
    digits.reverse();
    String::from_utf8(digits).unwrap_or_default()
}
