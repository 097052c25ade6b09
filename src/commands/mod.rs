//! CLI command handlers.

mod config;
mod crawl;
mod serve;

pub use config::run_config_show_command;
pub use crawl::{render_result, run_crawl_command};
pub use serve::run_serve_command;
