//! Service layer for business logic
//!
//! This module provides business logic shared between the HTTP API and CLI.

mod analytics_service;

pub use analytics_service::*;
