pub mod api;
pub mod config;
pub mod core;
pub mod error;
pub mod lead;
pub mod wizard;
