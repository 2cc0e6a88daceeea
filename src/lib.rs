pub mod cli;
pub mod config;
pub mod error;
pub mod loader;
pub mod pipeline;
pub mod report;
