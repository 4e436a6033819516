//! Page-view analytics
//!
//! - `aggregate`: pure full-recompute aggregation over recorded events
//! - `clock`: time source used for the rolling windows

pub mod aggregate;
pub mod clock;

pub use aggregate::{
    AnalyticsSummary, CategoryStats, DailyViews, RECENT_VIEWS_LIMIT, TREND_DAYS, UNKNOWN_LABEL,
    compute_analytics,
};
pub use clock::{Clock, FixedClock, SystemClock};
