//! Laroza Store Engine - 灯具商城的本地存储与跨 tab 同步引擎
//!
//! # 架构概述
//!
//! 本 crate 是商城的数据引擎：一个嵌入式键值存储承载全部持久化状态，
//! 多个 tab（独立执行上下文）挂接在同一存储上，并通过变更广播收敛到
//! 一致视图。
//!
//! - **存储** (`store`): 嵌入式 redb 键值库，整集合覆盖写
//! - **同步核心** (`sync`): 变更广播、订阅注册表、auto-refresh、跨 tab 传输
//! - **服务** (`services`): 商品目录、订单、促销、评价、会话、总览
//! - **核心** (`core`): 配置与存储源状态
//!
//! # 模块结构
//!
//! ```text
//! laroza-store/src/
//! ├── core/          # 配置、存储源状态
//! ├── store/         # 持久化存储、初始数据
//! ├── sync/          # 同步核心 (广播/注册表/传输/auto-refresh)
//! ├── services/      # 业务操作
//! └── utils/         # 日志等工具
//! ```
//!
//! # 并发模型
//!
//! 一个 tab 内全部读写是同步的；tab 之间没有任何顺序保证。整集合覆盖
//! 是唯一的写原语，并发保存按 last-writer-wins 解决。这是有意保留的
//! 设计，不是缺陷。

pub mod core;
pub mod services;
pub mod store;
pub mod sync;
pub mod utils;

// Re-export 公共类型
pub use core::{Config, StoreState};
pub use store::{DurableStore, StoreError};
pub use sync::{AutoRefresh, Subscription, TabContext};

// Re-export unified error types from shared
pub use utils::{AppError, AppResult, ErrorCategory, ErrorCode};

// Re-export logger functions
pub use utils::logger::{init_logger, init_logger_with_file};

// Re-export sync event types from shared
pub use shared::sync::{ChangeAction, Collection, SyncEvent};
