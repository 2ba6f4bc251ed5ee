pub mod config;
pub mod interactive;
pub mod logging;
pub mod runner;
pub mod session;
