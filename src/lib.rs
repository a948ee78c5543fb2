//! # danci-recall - 间隔重复调度核心库
//!
//! 本 crate 提供基于 Beta 分布的贝叶斯记忆衰减模型与复习队列排序:
//!
//! - **Beta-Decay Model** - 半衰期不确定性建模、回忆概率预测、单次作答后验更新
//! - **Recall Model** - 每个 (用户, 条目) 的记忆状态与首次作答初始化策略
//! - **Progress Tracker** - 读取/更新/保存记录，回答预测与队列查询
//! - **Review Queue** - 线性到期预筛选 + 贝叶斯回忆概率排序
//!
//! ## 模块结构
//!
//! - [`decay`] - (α, β, halflife) 纯函数算法 (预测、更新、百分位半衰期)
//! - [`model`] - `RecallModel` 状态与作答转换
//! - [`tracker`] - `ProgressTracker` 入口
//! - [`queue`] - 复习队列、到期预测、新条目抽样
//! - [`store`] - 存储边界 (`ProgressStore` trait 与内存实现)
//! - [`config`] - 初始间隔表与先验配置
//! - [`math`] - Beta 函数、对数空间运算、求根
//! - [`sanitize`] - 数值稳定性与校验
//! - [`language`] - 支持的学习语言
//! - [`logging`] - tracing 初始化
//! - [`types`] - 公共类型和常量
//!
//! ## 使用示例
//!
//! ```rust
//! use std::sync::Arc;
//! use danci_recall::{InMemoryProgressStore, ProgressTracker, SchedulerConfig};
//!
//! let config = SchedulerConfig::default();
//! let _log_guard = danci_recall::logging::init_tracing(&config);
//!
//! let tracker = ProgressTracker::new(config, Arc::new(InMemoryProgressStore::new())).unwrap();
//!
//! tracker.attempt("user-1", "task-42", true, None).unwrap();
//! let queue = tracker.review_queue("user-1", None, None, Some(20)).unwrap();
//! assert!(queue.len() <= 20);
//! ```

// ============================================================================
// 模块声明
// ============================================================================

pub mod config;
pub mod decay;
pub mod error;
pub mod language;
pub mod logging;
pub mod math;
pub mod model;
pub mod queue;
pub mod sanitize;
pub mod store;
pub mod tracker;
pub mod types;

// ============================================================================
// 重新导出
// ============================================================================

/// 重新导出公共类型
pub use types::*;

pub use config::{InitialInterval, SchedulerConfig};
pub use decay::{
    halflife_at_percentile, predict_recall, recall_interval, rescale_halflife, update_recall,
    BetaDecay,
};
pub use error::{RecallError, Result};
pub use language::Language;
pub use model::RecallModel;
pub use queue::{build_review_queue, due_forecast, sample_unseen, QueueEntry};
pub use store::{InMemoryProgressStore, ProgressStore, ReviewRecord};
pub use tracker::ProgressTracker;
