pub mod browser;
pub mod commands;
pub mod config;
pub mod duration;
pub mod git;
pub mod github;
pub mod logging;
pub mod models;
pub mod monitor;
pub mod notify;
pub mod validation;
