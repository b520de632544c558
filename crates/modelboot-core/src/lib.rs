pub mod config;
pub mod logging;

pub mod cache;
pub mod fetch;
pub mod retry;
pub mod signal;
pub mod supervisor;
