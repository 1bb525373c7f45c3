//! Show and movie commands.

use super::{truncate, with_spinner, Context};
use crate::cli::args::{MoviesAction, ShowsAction};
use crate::core::views::{self, ContentFilter};
use crate::Result;
use colored::Colorize;

pub async fn run_shows(ctx: &Context, action: ShowsAction) -> Result<()> {
    let account = ctx.account()?;
    match action {
        ShowsAction::List {
            status,
            genre,
            service,
            sort,
        } => {
            with_spinner(ctx, "Loading shows...", ctx.engine.fetch_shows(account)).await?;
            let filter = ContentFilter {
                watch_status: status,
                genre,
                streaming_service: service,
            };
            ctx.engine.read(|store| {
                let shows = views::filter_shows(store, &filter, sort);
                if shows.is_empty() {
                    println!("No shows match.");
                    return;
                }
                println!();
                println!(
                    "  {:<8} {:<36} {:<12} {:<14} {:>8}",
                    "ID".bold(),
                    "Title".bold(),
                    "Premiered".bold(),
                    "Status".bold(),
                    "Episodes".bold()
                );
                println!("{}", "-".repeat(84));
                for show in shows {
                    println!(
                        "  {:<8} {:<36} {:<12} {:<14} {:>8}",
                        show.show_id,
                        truncate(&show.title, 36),
                        show.release_date.map(|d| d.to_string()).unwrap_or_default(),
                        show.watch_status.to_string(),
                        show.episode_count.map(|c| c.to_string()).unwrap_or_default()
                    );
                }
                println!();
            });
            Ok(())
        }
        ShowsAction::Favorite { tmdb_id } => {
            let show = with_spinner(
                ctx,
                "Adding favorite...",
                ctx.engine.add_show_favorite(account, tmdb_id),
            )
            .await?;
            println!("  {} (show id {})", show.title.bold(), show.show_id);
            Ok(())
        }
        ShowsAction::Unfavorite { show_id } => {
            with_spinner(
                ctx,
                "Removing favorite...",
                ctx.engine.remove_show_favorite(account, show_id),
            )
            .await
        }
        ShowsAction::Status { show_id, status } => {
            let show = with_spinner(
                ctx,
                "Updating status...",
                ctx.engine.update_show_status(account, show_id, status),
            )
            .await?;
            if show.watch_status != status {
                println!(
                    "  {} server kept {} at {}",
                    "[WARN]".yellow(),
                    show.title,
                    show.watch_status
                );
            }
            Ok(())
        }
    }
}

pub async fn run_movies(ctx: &Context, action: MoviesAction) -> Result<()> {
    let account = ctx.account()?;
    match action {
        MoviesAction::List {
            status,
            genre,
            service,
            sort,
        } => {
            with_spinner(ctx, "Loading movies...", ctx.engine.fetch_movies(account)).await?;
            let filter = ContentFilter {
                watch_status: status,
                genre,
                streaming_service: service,
            };
            ctx.engine.read(|store| {
                let movies = views::filter_movies(store, &filter, sort);
                if movies.is_empty() {
                    println!("No movies match.");
                    return;
                }
                println!();
                println!(
                    "  {:<8} {:<36} {:<12} {:<14} {:>8}",
                    "ID".bold(),
                    "Title".bold(),
                    "Released".bold(),
                    "Status".bold(),
                    "Runtime".bold()
                );
                println!("{}", "-".repeat(84));
                for movie in movies {
                    println!(
                        "  {:<8} {:<36} {:<12} {:<14} {:>8}",
                        movie.movie_id,
                        truncate(&movie.title, 36),
                        movie.release_date.map(|d| d.to_string()).unwrap_or_default(),
                        movie.watch_status.to_string(),
                        movie.runtime.map(|r| format!("{} min", r)).unwrap_or_default()
                    );
                }
                println!();
            });
            Ok(())
        }
        MoviesAction::Favorite { tmdb_id } => {
            let movie = with_spinner(
                ctx,
                "Adding favorite...",
                ctx.engine.add_movie_favorite(account, tmdb_id),
            )
            .await?;
            println!("  {} (movie id {})", movie.title.bold(), movie.movie_id);
            Ok(())
        }
        MoviesAction::Unfavorite { movie_id } => {
            with_spinner(
                ctx,
                "Removing favorite...",
                ctx.engine.remove_movie_favorite(account, movie_id),
            )
            .await
        }
        MoviesAction::Status { movie_id, status } => {
            let movie = with_spinner(
                ctx,
                "Updating status...",
                ctx.engine.update_movie_status(account, movie_id, status),
            )
            .await?;
            if movie.watch_status != status {
                println!(
                    "  {} server kept {} at {}",
                    "[WARN]".yellow(),
                    movie.title,
                    movie.watch_status
                );
            }
            Ok(())
        }
    }
}
