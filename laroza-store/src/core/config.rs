use crate::sync::SyncCapabilities;

/// 引擎配置 - 存储源的所有配置项
///
/// # 环境变量
///
/// 所有配置项都可以通过环境变量覆盖：
///
/// | 环境变量 | 默认值 | 说明 |
/// |----------|--------|------|
/// | LAROZA_STORE_PATH | laroza.redb | 存储文件路径 (`:memory:` 使用内存后端) |
/// | LOG_LEVEL | info | 日志级别 |
/// | LOG_DIR | (无) | 日志文件目录，设置后启用按天滚动的文件输出 |
/// | SYNC_CHANNEL_CAPACITY | 1024 | 广播通道容量 |
/// | ENVIRONMENT | development | 运行环境 |
/// | SEED_ON_START | true | 启动时为缺失的集合写入初始数据 |
/// | DISABLE_BROADCAST_CHANNEL | false | 模拟广播通道缺失的环境 |
/// | DISABLE_STORAGE_NOTICES | false | 模拟存储通知缺失的环境 |
///
/// # 示例
///
/// ```ignore
/// LAROZA_STORE_PATH=/data/laroza.redb LOG_LEVEL=debug cargo run
/// ```
#[derive(Debug, Clone)]
pub struct Config {
    /// 存储文件路径；`:memory:` 选择内存后端
    pub store_path: String,
    /// 日志级别: trace | debug | info | warn | error
    pub log_level: String,
    /// 日志文件目录 (可选)
    pub log_dir: Option<String>,
    /// 广播通道容量
    pub sync_channel_capacity: usize,
    /// 运行环境: development | staging | production
    pub environment: String,
    /// 启动时是否写入初始数据
    pub seed_on_start: bool,
    /// 是否禁用广播通道传输 (用于降级环境测试)
    pub disable_broadcast_channel: bool,
    /// 是否禁用存储通知传输 (用于降级环境测试)
    pub disable_storage_notices: bool,
}

/// In-memory store path sentinel
pub const IN_MEMORY_STORE: &str = ":memory:";

impl Config {
    /// 从环境变量加载配置
    ///
    /// 如果环境变量未设置，使用默认值
    pub fn from_env() -> Self {
        Self {
            store_path: std::env::var("LAROZA_STORE_PATH")
                .unwrap_or_else(|_| "laroza.redb".to_string()),
            log_level: std::env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string()),
            log_dir: std::env::var("LOG_DIR").ok(),
            sync_channel_capacity: std::env::var("SYNC_CHANNEL_CAPACITY")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(1024),
            environment: std::env::var("ENVIRONMENT")
                .unwrap_or_else(|_| "development".to_string()),
            seed_on_start: std::env::var("SEED_ON_START")
                .map(|v| v != "false" && v != "0")
                .unwrap_or(true),
            disable_broadcast_channel: env_flag("DISABLE_BROADCAST_CHANNEL"),
            disable_storage_notices: env_flag("DISABLE_STORAGE_NOTICES"),
        }
    }

    /// Transport capabilities derived from the disable flags
    pub fn capabilities(&self) -> SyncCapabilities {
        SyncCapabilities {
            broadcast_channel: !self.disable_broadcast_channel,
            storage_notices: !self.disable_storage_notices,
        }
    }

    /// Whether the in-memory backend was requested
    pub fn is_in_memory(&self) -> bool {
        self.store_path == IN_MEMORY_STORE
    }

    /// In-memory configuration for tests and demos
    pub fn in_memory() -> Self {
        Self {
            store_path: IN_MEMORY_STORE.to_string(),
            ..Self::default()
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            store_path: "laroza.redb".to_string(),
            log_level: "info".to_string(),
            log_dir: None,
            sync_channel_capacity: 1024,
            environment: "development".to_string(),
            seed_on_start: true,
            disable_broadcast_channel: false,
            disable_storage_notices: false,
        }
    }
}

fn env_flag(name: &str) -> bool {
    std::env::var(name)
        .map(|v| v == "true" || v == "1")
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_enable_both_transports() {
        let config = Config::default();
        let caps = config.capabilities();
        assert!(caps.broadcast_channel);
        assert!(caps.storage_notices);
    }

    #[test]
    fn in_memory_sentinel() {
        assert!(Config::in_memory().is_in_memory());
        assert!(!Config::default().is_in_memory());
    }
}
