//! CLI command handlers, one file per command.

mod config;
mod fetch;
mod validate;

pub use config::run_config;
pub use fetch::{run_fetch, FetchArgs};
pub use validate::run_validate;
