//! 核心模块 - 引擎配置与状态定义
//!
//! # 模块结构
//!
//! - [`Config`] - 引擎配置
//! - [`StoreState`] - 存储源状态

pub mod config;
pub mod state;

pub use config::Config;
pub use state::StoreState;
