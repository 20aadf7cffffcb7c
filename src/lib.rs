//! Bilitrend - Bilibili video metadata collection and trend analysis.
//!
//! The pipeline runs in three phases that communicate only through flat
//! files: collection (search + enrichment), analysis (derived metrics and
//! the report), and chart-data export.

pub mod analysis;
pub mod cli;
pub mod client;
pub mod collector;
pub mod config;
pub mod models;
pub mod rate_limit;
pub mod storage;
pub mod viz;
