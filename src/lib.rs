pub mod api;
pub mod cli;
pub mod config;
pub mod error;
pub mod lookup;
pub mod models;
pub mod orchestrator;
pub mod session;
pub mod tools;
pub mod ui;
