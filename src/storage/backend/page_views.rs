//! PageViewRepository implementation for SeaOrmStorage

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{EntityTrait, PaginatorTrait, QueryOrder};
use tracing::{debug, error};

use super::SeaOrmStorage;
use super::converters::{model_to_page_view, new_page_view_to_active_model};
use crate::errors::{Result, VisitlogError};
use crate::storage::{NewPageView, PageViewEvent, PageViewRepository};

use migration::entities::page_view;

#[async_trait]
impl PageViewRepository for SeaOrmStorage {
    async fn fetch_all_page_views(&self) -> Result<Vec<PageViewEvent>> {
        let models = page_view::Entity::find()
            .order_by_desc(page_view::Column::CreatedAt)
            .order_by_desc(page_view::Column::Id)
            .all(&self.db)
            .await
            .map_err(|e| {
                error!("Failed to load page views: {}", e);
                VisitlogError::repository(format!("Failed to load page views: {}", e))
            })?;

        debug!(
            "Loaded {} page views from {} database",
            models.len(),
            self.backend_name.to_uppercase()
        );

        Ok(models.into_iter().map(model_to_page_view).collect())
    }

    async fn insert_page_view(&self, view: NewPageView) -> Result<PageViewEvent> {
        let created_at = Utc::now();
        let active_model = new_page_view_to_active_model(&view, created_at);

        let result = page_view::Entity::insert(active_model)
            .exec(&self.db)
            .await
            .map_err(|e| {
                VisitlogError::repository(format!(
                    "Failed to insert page view for '{}': {}",
                    view.page_path, e
                ))
            })?;

        debug!(
            "Page view {} recorded for {}",
            result.last_insert_id, view.page_path
        );

        Ok(view.into_event(result.last_insert_id, created_at))
    }

    async fn count_page_views(&self) -> Result<u64> {
        page_view::Entity::find()
            .count(&self.db)
            .await
            .map_err(|e| VisitlogError::repository(format!("Failed to count page views: {}", e)))
    }
}
