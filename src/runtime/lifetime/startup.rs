use anyhow::{Context, Result};
use std::sync::Arc;
use tracing::{debug, info};

use crate::config::get_config;
use crate::services::AnalyticsService;
use crate::storage::{PageViewRepository, SeaOrmStorage, StorageFactory};
use crate::tracking::PageViewRecorder;

pub struct StartupContext {
    pub storage: Arc<SeaOrmStorage>,
    pub repository: Arc<dyn PageViewRepository>,
    pub analytics_service: Arc<AnalyticsService>,
    pub recorder: Arc<PageViewRecorder>,
    pub route_config: RouteConfig,
}

#[derive(Clone, Debug)]
pub struct RouteConfig {
    pub admin_prefix: String,
    pub health_prefix: String,
    pub track_prefix: String,
}

impl RouteConfig {
    pub fn from_config() -> Self {
        let routes = &get_config().routes;
        Self {
            admin_prefix: routes.admin_prefix.clone(),
            health_prefix: routes.health_prefix.clone(),
            track_prefix: routes.track_prefix.clone(),
        }
    }
}

/// 按配置连接数据库并执行迁移
pub async fn open_storage() -> Result<Arc<SeaOrmStorage>> {
    let config = get_config();
    let storage = StorageFactory::create(&config.database)
        .await
        .context("Failed to create storage backend")?;
    info!("Using storage backend: {}", storage.get_backend_name());
    Ok(storage)
}

/// 使用配置中的时区偏移构建统计服务
pub fn build_analytics_service(repository: Arc<dyn PageViewRepository>) -> AnalyticsService {
    let offset = get_config().analytics.timezone_offset();
    AnalyticsService::with_clock(
        repository,
        Arc::new(crate::analytics::SystemClock),
        offset,
    )
}

/// 准备服务器启动的上下文
/// 包括存储、统计服务、记录器和路由配置
pub async fn prepare_server_startup() -> Result<StartupContext> {
    let start_time = std::time::Instant::now();
    debug!("Starting pre-startup processing...");

    let storage = open_storage().await?;
    let repository: Arc<dyn PageViewRepository> = storage.clone();

    let analytics_service = Arc::new(build_analytics_service(repository.clone()));
    let recorder = Arc::new(PageViewRecorder::new(repository.clone()));

    let route_config = RouteConfig::from_config();
    debug!("Route config: {:?}", route_config);

    info!(
        "Pre-startup processing completed in {} ms",
        start_time.elapsed().as_millis()
    );

    Ok(StartupContext {
        storage,
        repository,
        analytics_service,
        recorder,
        route_config,
    })
}
