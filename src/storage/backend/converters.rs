use chrono::{DateTime, Utc};

use crate::storage::{NewPageView, PageViewEvent};
use migration::entities::page_view;

/// 将 Sea-ORM Model 转换为 PageViewEvent
pub fn model_to_page_view(model: page_view::Model) -> PageViewEvent {
    PageViewEvent {
        id: model.id,
        page_path: model.page_path,
        visitor_id: model.visitor_id,
        user_agent: model.user_agent,
        referrer: model.referrer,
        device_type: model.device_type,
        browser: model.browser,
        country: model.country,
        city: model.city,
        created_at: model.created_at,
    }
}

/// 将 NewPageView 转换为 ActiveModel（id 交给数据库自增）
pub fn new_page_view_to_active_model(
    view: &NewPageView,
    created_at: DateTime<Utc>,
) -> page_view::ActiveModel {
    use sea_orm::ActiveValue::*;

    page_view::ActiveModel {
        id: NotSet,
        page_path: Set(view.page_path.clone()),
        visitor_id: Set(view.visitor_id.clone()),
        user_agent: Set(view.user_agent.clone()),
        referrer: Set(view.referrer.clone()),
        device_type: Set(view.device_type.clone()),
        browser: Set(view.browser.clone()),
        country: Set(view.country.clone()),
        city: Set(view.city.clone()),
        created_at: Set(created_at),
    }
}
