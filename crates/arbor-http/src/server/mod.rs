//! HTTP server adapter

pub mod endpoint;
pub mod lifecycle;
pub mod server;

pub use endpoint::Endpoint;
pub use lifecycle::shutdown_signal;
pub use server::ArborServer;
