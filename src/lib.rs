#[cfg(test)]
mod tests;

pub mod app;
pub mod cache;
pub mod config;
pub mod controller;
pub mod http;
pub mod metrics;
pub mod middleware;
pub mod model;
pub mod service;
pub mod shared;
pub mod shutdown;
pub mod upstream;
