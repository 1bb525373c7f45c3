//! Refresh and logout.

use super::{with_spinner, Context};
use crate::Result;
use colored::Colorize;

/// Reload profiles and, when one is active, its shows and movies.
pub async fn refresh(ctx: &Context) -> Result<()> {
    let account = ctx.account()?;
    with_spinner(ctx, "Refreshing profiles...", ctx.engine.refresh_profiles(account)).await?;

    if ctx.engine.active_profile_id().is_none() {
        println!("No active profile. Run: keepwatching profiles use <PROFILE_ID>");
        return Ok(());
    }

    // One at a time, so each outcome reaches the banner before the next replaces it.
    let shows = with_spinner(ctx, "Refreshing shows...", ctx.engine.refresh_shows(account)).await;
    let movies = with_spinner(ctx, "Refreshing movies...", ctx.engine.refresh_movies(account)).await;
    tracing::debug!("refresh: shows {:?}, movies {:?}", shows, movies);
    shows?;
    movies?;

    println!(
        "{} {} profiles, {} shows, {} movies",
        "[REFRESH]".bold().green(),
        ctx.engine.profiles().len(),
        ctx.engine.shows().len(),
        ctx.engine.movies().len()
    );
    Ok(())
}

pub fn logout(ctx: &Context) -> Result<()> {
    ctx.engine.logout();
    ctx.show_notification();
    Ok(())
}
