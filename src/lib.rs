//! visitlog - page-view tracking and analytics for a small studio website
//!
//! This library records page views at most once per browsing session,
//! keeps a stable anonymous visitor identifier, and recomputes the analytics
//! summary from the full event log on every read.
//!
//! # Architecture
//! - `tracking`: visitor identity, user-agent classification, recording
//! - `storage`: page-view repository (sea-orm backends and in-memory)
//! - `analytics`: pure aggregation over the event list
//! - `services`: analytics service binding repository, clock and offset
//! - `api`: HTTP beacon, read-only admin API and health check
//! - `config`: configuration management
//! - `runtime`: server and CLI execution modes
//! - `system`: logging setup

pub mod analytics;
pub mod api;
pub mod cli;
pub mod config;
pub mod errors;
pub mod runtime;
pub mod services;
pub mod storage;
pub mod system;
pub mod tracking;
