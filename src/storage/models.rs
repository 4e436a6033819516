use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// 已记录的页面访问事件（写入后不可变）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageViewEvent {
    pub id: i64,
    pub page_path: String,
    pub visitor_id: Option<String>,
    pub user_agent: Option<String>,
    pub referrer: Option<String>,
    /// 写入时分类的设备标签，读取时原样返回
    pub device_type: Option<String>,
    /// 写入时分类的浏览器标签，读取时原样返回
    pub browser: Option<String>,
    pub country: Option<String>,
    pub city: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// 待写入的页面访问，id 与 created_at 由存储层分配
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewPageView {
    pub page_path: String,
    pub visitor_id: Option<String>,
    pub user_agent: Option<String>,
    pub referrer: Option<String>,
    pub device_type: Option<String>,
    pub browser: Option<String>,
    pub country: Option<String>,
    pub city: Option<String>,
}

impl NewPageView {
    pub fn new(page_path: impl Into<String>) -> Self {
        Self {
            page_path: page_path.into(),
            ..Default::default()
        }
    }

    /// 由存储层补全 id 与创建时间
    pub fn into_event(self, id: i64, created_at: DateTime<Utc>) -> PageViewEvent {
        PageViewEvent {
            id,
            page_path: self.page_path,
            visitor_id: self.visitor_id,
            user_agent: self.user_agent,
            referrer: self.referrer,
            device_type: self.device_type,
            browser: self.browser,
            country: self.country,
            city: self.city,
            created_at,
        }
    }
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct StorageConfig {
    pub storage_type: String,
}
