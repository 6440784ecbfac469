pub mod breakdown;
pub mod config;
pub mod dataset;
pub mod export;
pub mod filter;
pub mod kpi;
pub mod state;
pub mod view;
