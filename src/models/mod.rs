//! Data models.

pub mod account;
pub mod config;
pub mod content;
pub mod profile;

pub use account::AccountNotification;
pub use config::{ApiConfig, Config, ViewConfig};
pub use content::{Episode, Movie, MovieWatchStatus, Show, ShowWatchStatus};
pub use profile::{Profile, ProfileCounts};
