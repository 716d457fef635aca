pub mod cache;
pub mod client;
pub mod config;
pub mod dashboard;
pub mod domain;
pub mod logging;
pub mod monitor;
pub mod session;
pub mod tasks;
