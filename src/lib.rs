pub mod client;
pub mod config;
pub mod error;
pub mod export;
pub mod filter;
pub mod form;
pub mod loader;
pub mod models;
pub mod pages;
pub mod permissions;
pub mod seed;
pub mod session;
pub mod stats;
pub mod store;
pub mod table;
pub mod ui;

pub use error::{AppError, Result};
