//! Fiitrack - Brazilian real-estate fund (FII) portfolio dashboard
//!
//! This library tracks FII holdings with weighted-average cost basis, caches
//! market price and dividend-yield data from external sources, and projects
//! long-term wealth and passive-income trajectories toward a
//! financial-independence goal.

pub mod cli;
pub mod config;
pub mod error;
pub mod portfolio;
pub mod pricing;
pub mod projection;
pub mod report;
pub mod scraping;
pub mod store;
pub mod universe;
pub mod utils;
