//! Application assembly and lifecycle.

mod app;
mod server;

pub use app::App;
pub use server::AppServer;
