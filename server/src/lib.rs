//! Comanda Server - 餐厅管理后端
//!
//! # 架构概述
//!
//! 单体 HTTP 服务，SQLite 落盘，管理一家餐厅的桌台生命周期：
//!
//! - **桌台** (`services::tables`): 状态机 FREE → RESERVED/OCCUPIED → WAITING_CLEANUP
//! - **预订** (`services::reservations`): 15 分钟保留，后台任务扫描过期
//! - **订单** (`services::orders`): 占用中桌台的点单与厨房状态推进
//! - **排队** (`services::queue`): FIFO 候位，位置始终保持稠密的 1..N
//! - **广播** (`gateway`): 变更事件实时推送给订阅者
//!
//! # 模块结构
//!
//! ```text
//! server/src/
//! ├── core/          # 配置、状态、HTTP 服务器、后台任务
//! ├── api/           # HTTP 路由和处理器
//! ├── services/      # 领域服务（业务规则所在地）
//! ├── db/            # SQLite 连接池、模型、仓储
//! ├── gateway/       # 广播总线和事件推送
//! └── utils/         # 错误、日志、时间工具
//! ```

pub mod api;
pub mod core;
pub mod db;
pub mod gateway;
pub mod services;
pub mod utils;

// Re-export 公共类型
pub use api::extract::CurrentUser;
pub use core::{Config, Server, ServerState};
pub use db::DbService;
pub use gateway::{Gateway, GatewayMessage, Notifier};
pub use utils::{AppError, AppResponse, AppResult};

// Re-export logger functions
pub use utils::logger::{init_logger, init_logger_with_file};

pub fn print_banner() {
    println!(
        r#"
   ______                                 __
  / ____/___  ____ ___  ____ _____  ____/ /___ _
 / /   / __ \/ __ `__ \/ __ `/ __ \/ __  / __ `/
/ /___/ /_/ / / / / / / /_/ / / / / /_/ / /_/ /
\____/\____/_/ /_/ /_/\__,_/_/ /_/\__,_/\__,_/
    "#
    );
}
