#![allow(dead_code)]

pub mod config;
pub mod mock_store;
pub mod mock_telemetry;
pub mod server;
