//! Demo server exercising the recovery helpers. Not part of the library.

pub mod config;
pub mod handlers;
pub mod server;

pub use config::Config;
pub use server::run_server;
