//! HTTP server.

mod server;

pub use server::HttpServer;
