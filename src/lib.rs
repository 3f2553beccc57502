// Export all necessary modules
pub mod analysis;
pub mod chart;
pub mod cli;
pub mod config;
pub mod data;
pub mod error;
pub mod features;
pub mod report;
pub mod strategy;
pub mod study;
pub mod utils;
