pub mod config;
mod api_error;
mod http_layers;
mod info_stub;
pub mod server;
pub mod state;

pub use config::ServerConfig;
pub use http_layers::*;
pub use info_stub::make_info_stub_routes;
pub use server::{make_app, run_server};
