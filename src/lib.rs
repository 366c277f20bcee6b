pub mod bridge;
pub mod cli;
pub mod config;
pub mod context;
pub mod discord;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod panels;
pub mod server;
pub mod session;
pub mod store;
pub mod views;

pub use context::AppContext;
pub use server::app;
