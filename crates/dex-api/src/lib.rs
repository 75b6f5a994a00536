//! HTTP API layer for the Glittr DEX

pub mod dto;
pub mod routes;
pub mod server;
pub mod state;

pub use server::{create_app, start_server};
pub use state::AppState;
