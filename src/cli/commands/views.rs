//! Episode, release and statistics views.

use super::{truncate, with_spinner, Context};
use crate::cli::args::WindowAction;
use crate::core::views;
use crate::Result;
use chrono::{Local, NaiveDate};
use colored::Colorize;

fn today() -> NaiveDate {
    Local::now().date_naive()
}

pub async fn episodes(ctx: &Context, window: WindowAction) -> Result<()> {
    let account = ctx.account()?;
    with_spinner(ctx, "Loading shows...", ctx.engine.fetch_shows(account)).await?;

    let today = today();
    let (title, days) = match window {
        WindowAction::Recent { days } => ("Recent Episodes", days.unwrap_or(ctx.config.views.recent_days)),
        WindowAction::Upcoming { days } => ("Upcoming Episodes", days.unwrap_or(ctx.config.views.upcoming_days)),
    };
    let recent = matches!(window, WindowAction::Recent { .. });

    println!("{} ({} days)", title.bold().cyan(), days);
    println!("{}", "=".repeat(60));
    ctx.engine.read(|store| {
        let episodes = if recent {
            views::recent_episodes(store, today, days)
        } else {
            views::upcoming_episodes(store, today, days)
        };
        if episodes.is_empty() {
            println!("Nothing in this window.");
        }
        for episode in episodes {
            println!(
                "  {} {:<28} {} {}",
                episode.air_date.map(|d| d.to_string()).unwrap_or_default(),
                truncate(&episode.show_title, 28),
                episode.code().bold(),
                episode.title
            );
        }
    });
    Ok(())
}

pub async fn releases(ctx: &Context, window: WindowAction) -> Result<()> {
    let account = ctx.account()?;
    with_spinner(ctx, "Loading movies...", ctx.engine.fetch_movies(account)).await?;

    let today = today();
    let (title, days, recent) = match window {
        WindowAction::Recent { days } => ("Recent Releases", days.unwrap_or(ctx.config.views.recent_days), true),
        WindowAction::Upcoming { days } => ("Upcoming Releases", days.unwrap_or(ctx.config.views.upcoming_days), false),
    };

    println!("{} ({} days)", title.bold().cyan(), days);
    println!("{}", "=".repeat(60));
    ctx.engine.read(|store| {
        let movies = if recent {
            views::recent_movies(store, today, days)
        } else {
            views::upcoming_movies(store, today, days)
        };
        if movies.is_empty() {
            println!("Nothing in this window.");
        }
        for movie in movies {
            println!(
                "  {} {}",
                movie.release_date.map(|d| d.to_string()).unwrap_or_default(),
                movie.title
            );
        }
    });
    Ok(())
}

/// Show statistics for the active profile.
pub async fn stats(ctx: &Context) -> Result<()> {
    let account = ctx.account()?;
    with_spinner(
        ctx,
        "Loading shows and movies...",
        ctx.engine.load_active_profile(account),
    )
    .await?;

    let today = today();
    let stats = ctx.engine.read(|store| views::profile_statistics(store, today));
    let (odd_shows, odd_movies) = ctx.engine.read(|store| {
        (
            views::inconsistent_shows(store, today).len(),
            views::inconsistent_movies(store, today).len(),
        )
    });

    println!("{}", "Profile Statistics".bold().cyan());
    println!("{}", "=".repeat(50));
    println!();

    println!("{}", "Shows:".bold());
    println!("  Total: {}", stats.shows.total);
    println!("  Watched: {}", stats.shows.watched);
    println!("  Watching: {}", stats.shows.watching);
    println!("  Not watched: {}", stats.shows.not_watched);
    println!("  Unaired: {}", stats.shows.unaired);
    println!();

    println!("{}", "Movies:".bold());
    println!("  Total: {}", stats.movies.total);
    println!("  Watched: {}", stats.movies.watched);
    println!("  Not watched: {}", stats.movies.not_watched);
    println!("  Unaired: {}", stats.movies.unaired);
    println!();

    println!("  Watched: {:.1}%", stats.watched_percentage);
    println!();

    if !stats.genres.is_empty() {
        println!("{}", "Genres:".bold());
        let mut genres: Vec<_> = stats.genres.iter().collect();
        genres.sort_by(|a, b| b.1.cmp(a.1).then(a.0.cmp(b.0)));
        for (genre, count) in genres.iter().take(10) {
            println!("  {}: {}", genre, count);
        }
        println!();
    }

    if !stats.streaming_services.is_empty() {
        println!("{}", "Streaming Services:".bold());
        for (service, count) in &stats.streaming_services {
            println!("  {}: {}", service, count);
        }
        println!();
    }

    if odd_shows + odd_movies > 0 {
        println!(
            "{}",
            format!(
                "[WARN] {} shows and {} movies are marked watched before release",
                odd_shows, odd_movies
            )
            .yellow()
        );
    }

    Ok(())
}
