pub mod admin;
pub mod health;
pub mod track;

pub use health::{AppStartTime, HealthService, health_routes};
pub use track::{TrackService, normalize_page_path, track_routes, validate_page_path};
