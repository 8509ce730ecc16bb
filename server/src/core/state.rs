use std::time::Duration;

use crate::core::Config;
use crate::core::tasks::{BackgroundTasks, TaskKind};
use crate::db::DbService;
use crate::gateway::{Gateway, Notifier};
use crate::services::{OrdersService, QueueService, ReservationsService, TablesService};

/// 服务器状态 - 持有所有服务的共享引用
///
/// ServerState 是核心数据结构，浅拷贝成本极低（内部都是 Arc/池句柄）。
///
/// # 服务组件
///
/// | 字段 | 说明 |
/// |------|------|
/// | config | 配置项 (不可变) |
/// | db | SQLite 连接池 |
/// | gateway | 广播总线 |
/// | tables | 桌台注册表 |
/// | reservations | 预订管理 |
/// | orders | 订单管理 |
/// | queue | 排队管理 |
#[derive(Clone, Debug)]
pub struct ServerState {
    /// 服务器配置
    pub config: Config,
    /// 数据库服务
    pub db: DbService,
    /// 广播总线 (fan-out)
    pub gateway: Gateway,
    /// 桌台注册表
    pub tables: TablesService,
    /// 预订管理
    pub reservations: ReservationsService,
    /// 订单管理
    pub orders: OrdersService,
    /// 排队管理
    pub queue: QueueService,
}

impl ServerState {
    /// 初始化服务器状态
    ///
    /// 按顺序初始化：工作目录 → 数据库 → 广播总线 → 各服务
    ///
    /// # Panics
    ///
    /// 工作目录或数据库初始化失败时 panic
    pub async fn initialize(config: &Config) -> Self {
        config
            .ensure_work_dir()
            .expect("Failed to create work directory");

        let db_path = config.database_path();
        let db = DbService::new(&db_path.to_string_lossy())
            .await
            .expect("Failed to initialize database");

        let gateway = Gateway::new();
        let notifier = Notifier::new(db.pool.clone(), gateway.clone());

        let tables = TablesService::new(db.clone(), notifier.clone());
        let reservations = ReservationsService::new(
            db.clone(),
            notifier.clone(),
            config.reservation_ttl_minutes,
        );
        let orders = OrdersService::new(db.clone(), notifier.clone());
        let queue = QueueService::new(db.clone(), notifier);

        Self {
            config: config.clone(),
            db,
            gateway,
            tables,
            reservations,
            orders,
            queue,
        }
    }

    /// 启动后台任务
    ///
    /// 必须在 `Server::run()` 之前调用。
    ///
    /// 启动的任务：
    /// - 预订过期扫描 (Periodic, 默认 60s)
    pub fn start_background_tasks(&self, tasks: &mut BackgroundTasks) {
        let reservations = self.reservations.clone();
        let interval = Duration::from_secs(self.config.expiry_sweep_interval_secs);
        let token = tasks.shutdown_token();

        tasks.spawn("reservation_expiry", TaskKind::Periodic, async move {
            let mut ticker = tokio::time::interval(interval);
            ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
            loop {
                tokio::select! {
                    _ = token.cancelled() => break,
                    _ = ticker.tick() => {
                        match reservations.expire_sweep().await {
                            Ok(0) => {}
                            Ok(count) => {
                                tracing::info!(expired = count, "Reservation expiry sweep");
                            }
                            Err(e) => {
                                tracing::warn!(error = %e, "Reservation expiry sweep failed");
                            }
                        }
                    }
                }
            }
        });
    }
}
