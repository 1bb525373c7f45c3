//! Command line argument definitions.

use crate::core::views::SortKey;
use crate::models::{MovieWatchStatus, ShowWatchStatus};
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// KeepWatching - Track the shows and movies your profiles follow
#[derive(Parser, Debug)]
#[command(name = "keepwatching")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Skip preflight checks
    #[arg(long, global = true)]
    pub skip_preflight: bool,

    /// Account id (overrides account_id in config.toml)
    #[arg(long, global = true, value_name = "ACCOUNT_ID")]
    pub account: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Manage profiles
    Profiles {
        #[command(subcommand)]
        action: ProfilesAction,
    },

    /// Favorite shows of the active profile
    Shows {
        #[command(subcommand)]
        action: ShowsAction,
    },

    /// Favorite movies of the active profile
    Movies {
        #[command(subcommand)]
        action: MoviesAction,
    },

    /// Recently aired or upcoming episodes
    Episodes {
        #[command(subcommand)]
        window: WindowAction,
    },

    /// Recently released or upcoming movies
    Releases {
        #[command(subcommand)]
        window: WindowAction,
    },

    /// Statistics for the active profile
    Stats,

    /// Announcements posted to the account
    Notifications {
        #[command(subcommand)]
        action: NotificationsAction,
    },

    /// Reload everything from the server
    Refresh,

    /// Clear the local cache
    Logout,

    /// Run preflight checks only
    Check,
}

#[derive(Subcommand, Debug)]
pub enum ProfilesAction {
    /// List profiles of the account
    List,

    /// Create a profile
    Add {
        #[arg(value_name = "NAME")]
        name: String,
    },

    /// Rename a profile
    Edit {
        #[arg(value_name = "PROFILE_ID")]
        profile_id: String,

        #[arg(value_name = "NAME")]
        name: String,
    },

    /// Upload a profile image
    Image {
        #[arg(value_name = "PROFILE_ID")]
        profile_id: String,

        /// Image file (png, jpg, gif, webp)
        #[arg(value_name = "FILE")]
        file: PathBuf,
    },

    /// Delete a profile
    Delete {
        #[arg(value_name = "PROFILE_ID")]
        profile_id: String,
    },

    /// Make a profile the active one
    Use {
        #[arg(value_name = "PROFILE_ID")]
        profile_id: String,
    },
}

#[derive(Subcommand, Debug)]
pub enum ShowsAction {
    /// List favorite shows
    List {
        /// Filter by status: not-watched, watching, watched
        #[arg(long)]
        status: Option<ShowWatchStatus>,

        /// Filter by genre
        #[arg(short = 'g', long)]
        genre: Option<String>,

        /// Filter by streaming service
        #[arg(short = 's', long)]
        service: Option<String>,

        /// Sort order: insertion, title, release-date
        #[arg(long, default_value = "insertion")]
        sort: SortKey,
    },

    /// Add a show to favorites
    Favorite {
        #[arg(value_name = "TMDB_ID")]
        tmdb_id: u64,
    },

    /// Remove a show from favorites
    Unfavorite {
        #[arg(value_name = "SHOW_ID")]
        show_id: u64,
    },

    /// Set the watch status of a show
    Status {
        #[arg(value_name = "SHOW_ID")]
        show_id: u64,

        /// not-watched, watching or watched
        #[arg(value_name = "STATUS")]
        status: ShowWatchStatus,
    },
}

#[derive(Subcommand, Debug)]
pub enum MoviesAction {
    /// List favorite movies
    List {
        /// Filter by status: not-watched, watched
        #[arg(long)]
        status: Option<MovieWatchStatus>,

        /// Filter by genre
        #[arg(short = 'g', long)]
        genre: Option<String>,

        /// Filter by streaming service
        #[arg(short = 's', long)]
        service: Option<String>,

        /// Sort order: insertion, title, release-date
        #[arg(long, default_value = "insertion")]
        sort: SortKey,
    },

    /// Add a movie to favorites
    Favorite {
        #[arg(value_name = "TMDB_ID")]
        tmdb_id: u64,
    },

    /// Remove a movie from favorites
    Unfavorite {
        #[arg(value_name = "MOVIE_ID")]
        movie_id: u64,
    },

    /// Set the watch status of a movie
    Status {
        #[arg(value_name = "MOVIE_ID")]
        movie_id: u64,

        /// not-watched or watched
        #[arg(value_name = "STATUS")]
        status: MovieWatchStatus,
    },
}

#[derive(Subcommand, Debug)]
pub enum NotificationsAction {
    /// List current notifications
    List,

    /// Dismiss a notification
    Dismiss {
        #[arg(value_name = "NOTIFICATION_ID")]
        notification_id: u64,
    },
}

#[derive(Subcommand, Debug)]
pub enum WindowAction {
    /// Look back from today
    Recent {
        /// Window width in days (default from config)
        #[arg(short, long)]
        days: Option<u32>,
    },

    /// Look ahead from today
    Upcoming {
        /// Window width in days (default from config)
        #[arg(short, long)]
        days: Option<u32>,
    },
}
