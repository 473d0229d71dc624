use shared::error::AppResult;
use std::sync::Arc;
use uuid::Uuid;

use crate::core::Config;
use crate::store::{DurableStore, seed};
use crate::sync::{SyncChannel, SyncTransport, TabContext, select_transport};

/// 存储源状态 - 一个存储源上所有共享资源的单例引用
///
/// `StoreState` 对应一个"存储源"：打开的持久化存储、以其为作用域的
/// 广播通道、以及初始化时按环境能力选定的传输层。所有 tab 通过
/// [`StoreState::open_tab`] 挂接到同一个状态上。
///
/// 生命周期是显式的：在应用启动时构造一次，在单元测试里可以构造多个
/// 独立实例来模拟多个存储源；tab 的卸载通过 [`TabContext::close`] 或
/// drop 完成。
///
/// # 使用示例
///
/// ```ignore
/// let config = Config::in_memory();
/// let state = StoreState::initialize(&config)?;
///
/// let admin_tab = state.open_tab();
/// let shop_tab = state.open_tab();
/// ```
#[derive(Clone)]
pub struct StoreState {
    /// 引擎配置
    pub config: Config,
    /// 持久化存储
    store: DurableStore,
    /// 广播通道 (以存储源为作用域)
    channel: SyncChannel,
    /// 选定的跨 tab 传输
    transport: Arc<dyn SyncTransport>,
}

impl StoreState {
    /// 初始化存储源状态
    ///
    /// 按顺序：
    /// 1. 打开存储 (文件或内存后端)
    /// 2. 创建广播通道
    /// 3. 按环境能力选择传输层
    /// 4. 为缺失的集合写入初始数据 (可配置)
    pub fn initialize(config: &Config) -> AppResult<Self> {
        let store = if config.is_in_memory() {
            DurableStore::open_in_memory()?
        } else {
            DurableStore::open(&config.store_path)?
        };

        let channel = SyncChannel::new(config.sync_channel_capacity);
        let transport = select_transport(&channel, &store, config.capabilities());

        if config.seed_on_start {
            // Seeding is initialization, not a tab mutation: nil origin,
            // no broadcasts
            seed::seed_if_empty(&store, Uuid::nil())?;
        }

        tracing::info!(
            store = %config.store_path,
            transport = transport.name(),
            "Store state initialized"
        );

        Ok(Self {
            config: config.clone(),
            store,
            channel,
            transport,
        })
    }

    /// 挂接一个新 tab (需要在 tokio runtime 内调用，pump 是后台任务)
    pub fn open_tab(&self) -> TabContext {
        TabContext::attach(self.store.clone(), Arc::clone(&self.transport))
    }

    /// 持久化存储句柄
    pub fn store(&self) -> &DurableStore {
        &self.store
    }

    /// 广播通道句柄
    pub fn channel(&self) -> &SyncChannel {
        &self.channel
    }

    /// 选定的传输层名称 (日志、诊断)
    pub fn transport_name(&self) -> &'static str {
        self.transport.name()
    }
}

impl std::fmt::Debug for StoreState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StoreState")
            .field("store_path", &self.config.store_path)
            .field("transport", &self.transport.name())
            .finish()
    }
}
