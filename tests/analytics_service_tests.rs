//! AnalyticsService integration tests
//!
//! Aggregation over events stored in a temporary SQLite database, read back
//! through the service with a fixed clock.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Duration, FixedOffset, TimeZone, Utc};
use sea_orm::EntityTrait;
use tempfile::TempDir;

use migration::entities::page_view;
use visitlog::analytics::FixedClock;
use visitlog::errors::{Result, VisitlogError};
use visitlog::services::{AnalyticsService, MAX_RECENT_LIMIT, SnapshotStatus};
use visitlog::storage::backend::new_page_view_to_active_model;
use visitlog::storage::{NewPageView, PageViewEvent, PageViewRepository, SeaOrmStorage};

fn fixed_now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2026, 3, 15, 12, 0, 0).unwrap()
}

fn utc() -> FixedOffset {
    FixedOffset::east_opt(0).unwrap()
}

async fn create_temp_storage() -> (Arc<SeaOrmStorage>, TempDir) {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let db_url = format!(
        "sqlite://{}?mode=rwc",
        temp_dir.path().join("analytics.db").display()
    );
    let storage = SeaOrmStorage::new(&db_url, "sqlite")
        .await
        .expect("Failed to create storage");
    (Arc::new(storage), temp_dir)
}

/// 直接写入带指定 created_at 的事件
async fn seed(storage: &SeaOrmStorage, path: &str, visitor: &str, created_at: DateTime<Utc>) {
    let view = NewPageView {
        visitor_id: Some(visitor.to_string()),
        device_type: Some("Desktop".to_string()),
        browser: Some("Firefox".to_string()),
        ..NewPageView::new(path)
    };
    page_view::Entity::insert(new_page_view_to_active_model(&view, created_at))
        .exec(storage.get_db())
        .await
        .expect("Failed to seed page view");
}

fn service_at(storage: Arc<SeaOrmStorage>, offset: FixedOffset) -> AnalyticsService {
    AnalyticsService::with_clock(storage, Arc::new(FixedClock(fixed_now())), offset)
}

/// 总是失败的仓库
struct FailingRepository;

#[async_trait]
impl PageViewRepository for FailingRepository {
    async fn fetch_all_page_views(&self) -> Result<Vec<PageViewEvent>> {
        Err(VisitlogError::repository("connection refused"))
    }

    async fn insert_page_view(&self, _view: NewPageView) -> Result<PageViewEvent> {
        Err(VisitlogError::repository("connection refused"))
    }

    async fn count_page_views(&self) -> Result<u64> {
        Err(VisitlogError::repository("connection refused"))
    }
}

#[tokio::test]
async fn test_reference_example_over_sqlite() {
    let (storage, _dir) = create_temp_storage().await;
    let now = fixed_now();
    seed(&storage, "/", "a", now - Duration::hours(2)).await;
    seed(&storage, "/", "a", now - Duration::hours(1)).await;
    seed(&storage, "/about", "b", now - Duration::days(8)).await;

    let summary = service_at(storage, utc()).summary().await.unwrap();

    assert_eq!(summary.today_views, 2);
    assert_eq!(summary.week_views, 2);
    assert_eq!(summary.month_views, 3);
    assert_eq!(summary.total_views, 3);
    assert_eq!(summary.unique_visitors, 2);
    assert_eq!(summary.unique_visitors_today, 1);
    assert_eq!(summary.page_counts.get("/"), Some(&2));

    let last_day = summary.views_by_day.last().unwrap();
    assert_eq!(last_day.date, "2026-03-15");
    assert_eq!(last_day.views, 2);
}

#[tokio::test]
async fn test_recent_views_follow_store_order() {
    let (storage, _dir) = create_temp_storage().await;
    let now = fixed_now();
    for i in 0..12 {
        seed(&storage, &format!("/p{}", i), "v", now - Duration::minutes(i)).await;
    }

    let summary = service_at(storage, utc()).summary().await.unwrap();
    assert_eq!(summary.recent_views.len(), 10);
    assert_eq!(summary.recent_views[0].page_path, "/p0");
    assert_eq!(summary.recent_views[9].page_path, "/p9");
}

#[tokio::test]
async fn test_offset_moves_today_boundary() {
    let (storage, _dir) = create_temp_storage().await;
    // 2026-03-15 02:00 UTC 在 UTC-05:00 仍是 3 月 14 日
    seed(
        &storage,
        "/",
        "late-night",
        Utc.with_ymd_and_hms(2026, 3, 15, 2, 0, 0).unwrap(),
    )
    .await;

    let in_utc = service_at(storage.clone(), utc()).summary().await.unwrap();
    assert_eq!(in_utc.today_views, 1);

    let new_york = FixedOffset::west_opt(5 * 3600).unwrap();
    let local = service_at(storage, new_york).summary().await.unwrap();
    assert_eq!(local.today_views, 0);
    assert_eq!(local.views_by_day[5].date, "2026-03-14");
    assert_eq!(local.views_by_day[5].views, 1);
}

#[tokio::test]
async fn test_snapshot_ready_and_unavailable() {
    let (storage, _dir) = create_temp_storage().await;
    seed(&storage, "/", "a", fixed_now()).await;

    let ready = service_at(storage, utc()).snapshot().await;
    assert_eq!(ready.status, SnapshotStatus::Ready);
    assert!(ready.error.is_none());
    assert_eq!(ready.generated_at, fixed_now());
    assert_eq!(ready.summary.total_views, 1);

    let failing = AnalyticsService::with_clock(
        Arc::new(FailingRepository),
        Arc::new(FixedClock(fixed_now())),
        utc(),
    );
    let unavailable = failing.snapshot().await;
    assert_eq!(unavailable.status, SnapshotStatus::Unavailable);
    assert_eq!(unavailable.error.as_deref(), Some("connection refused"));
    assert_eq!(unavailable.summary.total_views, 0);
    assert_eq!(unavailable.summary.views_by_day.len(), 7);
    assert!(unavailable.summary.views_by_day.iter().all(|d| d.views == 0));

    let err = failing.summary().await.unwrap_err();
    assert!(matches!(err, VisitlogError::Repository(_)));
}

#[tokio::test]
async fn test_recent_page_views_is_capped() {
    let (storage, _dir) = create_temp_storage().await;
    let now = fixed_now();
    for i in 0..(MAX_RECENT_LIMIT as i64 + 5) {
        seed(&storage, "/", "v", now - Duration::seconds(i)).await;
    }

    let service = service_at(storage, utc());
    assert_eq!(service.recent_page_views(3).await.unwrap().len(), 3);
    assert_eq!(
        service.recent_page_views(1000).await.unwrap().len(),
        MAX_RECENT_LIMIT
    );
}

#[tokio::test]
async fn test_frozen_labels_are_reported_as_stored() {
    let (storage, _dir) = create_temp_storage().await;
    let view = NewPageView {
        user_agent: Some("Mozilla/5.0 (iPad) Safari/604.1".to_string()),
        device_type: Some("Desktop".to_string()),
        browser: None,
        ..NewPageView::new("/legacy")
    };
    page_view::Entity::insert(new_page_view_to_active_model(&view, fixed_now()))
        .exec(storage.get_db())
        .await
        .unwrap();

    let summary = service_at(storage, utc()).summary().await.unwrap();
    // 标签在写入时确定，读取时不按 user_agent 重新分类
    assert_eq!(summary.device_counts.get("Desktop"), Some(&1));
    assert_eq!(summary.browser_counts.get("Unknown"), Some(&1));
}
