pub mod config;
pub mod db;
pub mod engine;
pub mod error;
pub mod memory;
pub mod middleware;
pub mod models;
pub mod ports;
pub mod probe;
pub mod routes;
pub mod seed;
pub mod services;
pub mod state;
pub mod storage;
