pub mod config;
pub mod error;
pub mod pipeline;
pub mod routes;
pub mod session;
pub mod state;
pub mod store;
pub mod types;
