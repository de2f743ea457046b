//! Shared test harness: config builder, in-process worker, test server

pub mod config;
pub mod server;
pub mod worker;
