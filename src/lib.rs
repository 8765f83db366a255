pub mod aggregate;
pub mod batch;
pub mod cli;
pub mod client;
pub mod commands;
pub mod config;
pub mod csv;
pub mod dashboards;
pub mod error;
pub mod navigation;
pub mod permissions;
pub mod records;
pub mod render;
pub mod roles;
pub mod session;

pub use error::{Error, Result};
