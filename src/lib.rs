//! KeepWatching Client Library
//!
//! A normalized, persisted cache of profiles, shows, movies and episodes,
//! kept in step with the KeepWatching API by an asynchronous sync engine.

pub mod cli;
pub mod core;
pub mod error;
pub mod models;
pub mod preflight;
pub mod services;
pub mod utils;

pub use error::{Error, Result};
