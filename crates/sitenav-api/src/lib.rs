// sitenav-api: Async Rust client for the sitenav website-directory backend

pub mod client;
pub mod error;
pub mod transport;
pub mod types;

pub use client::DirectoryClient;
pub use error::Error;
pub use transport::{TlsMode, TransportConfig};
