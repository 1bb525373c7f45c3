//! External service clients.

pub mod api;

pub use api::{HttpRemote, RemoteError, RemoteResult, RemoteSource};
