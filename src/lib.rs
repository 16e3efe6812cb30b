pub mod cli;
pub mod config;
pub mod logging;
pub mod market;
pub mod sweep;
