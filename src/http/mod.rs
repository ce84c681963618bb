// HTTP module: server, error mapping and query parameter helpers.

pub mod error;
pub mod params;
pub mod server;


pub use crate::middleware::middleware::Middleware;

pub use error::AppError;
pub use params::Params;
pub use server::HttpServer;

// Common controller interface
pub use crate::controller::controller::Controller;
