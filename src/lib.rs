pub mod api;
pub mod cli;
pub mod config;
pub mod download;
pub mod error;
pub mod output;
pub mod progress;
