pub mod app;
pub mod auth;
pub mod client;
pub mod config;
pub mod error;
pub mod extract;
pub mod logs;
pub mod mailer;
pub mod state;
pub mod todos;
