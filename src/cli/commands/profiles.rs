//! Profile commands.

use super::{truncate, with_spinner, Context};
use crate::cli::args::ProfilesAction;
use crate::services::api::ImageUpload;
use crate::{Error, Result};
use colored::Colorize;
use std::path::Path;

pub async fn run(ctx: &Context, action: ProfilesAction) -> Result<()> {
    match action {
        ProfilesAction::List => list(ctx).await,
        ProfilesAction::Add { name } => add(ctx, &name).await,
        ProfilesAction::Edit { profile_id, name } => edit(ctx, &profile_id, &name).await,
        ProfilesAction::Image { profile_id, file } => image(ctx, &profile_id, &file).await,
        ProfilesAction::Delete { profile_id } => delete(ctx, &profile_id).await,
        ProfilesAction::Use { profile_id } => use_profile(ctx, &profile_id).await,
    }
}

async fn list(ctx: &Context) -> Result<()> {
    let account = ctx.account()?;
    with_spinner(ctx, "Loading profiles...", ctx.engine.fetch_profiles(account)).await?;

    let profiles = ctx.engine.profiles();
    if profiles.is_empty() {
        println!("No profiles found. Create one with: keepwatching profiles add <NAME>");
        return Ok(());
    }

    let active = ctx.engine.active_profile_id();
    println!();
    println!(
        "  {:<12} {:<24} {:>8} {:>8} {:>8} {:>8}",
        "ID".bold(),
        "Name".bold(),
        "To Watch".bold(),
        "Watching".bold(),
        "Watched".bold(),
        "Movies".bold()
    );
    println!("{}", "-".repeat(76));
    for profile in profiles {
        let marker = if active.as_deref() == Some(profile.id.as_str()) {
            "*".green().bold()
        } else {
            " ".normal()
        };
        println!(
            "{} {:<12} {:<24} {:>8} {:>8} {:>8} {:>8}",
            marker,
            profile.id,
            truncate(&profile.name, 24),
            profile.counts.shows_to_watch,
            profile.counts.shows_watching,
            profile.counts.shows_watched,
            profile.counts.movies_watched + profile.counts.movies_to_watch
        );
    }
    println!();
    Ok(())
}

async fn add(ctx: &Context, name: &str) -> Result<()> {
    let account = ctx.account()?;
    let profile = with_spinner(ctx, "Creating profile...", ctx.engine.add_profile(account, name)).await?;
    println!("  Profile id: {}", profile.id);
    Ok(())
}

async fn edit(ctx: &Context, profile_id: &str, name: &str) -> Result<()> {
    let account = ctx.account()?;
    with_spinner(
        ctx,
        "Renaming profile...",
        ctx.engine.edit_profile(account, profile_id, name),
    )
    .await?;
    Ok(())
}

async fn image(ctx: &Context, profile_id: &str, file: &Path) -> Result<()> {
    let account = ctx.account()?;
    let bytes = std::fs::read(file)?;
    let file_name = file
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .ok_or_else(|| Error::other(format!("Not a file: {}", file.display())))?;
    let upload = ImageUpload::from_file_name(file_name, bytes);

    let profile = with_spinner(
        ctx,
        "Uploading image...",
        ctx.engine.update_profile_image(account, profile_id, upload),
    )
    .await?;
    if let Some(url) = profile.image {
        println!("  Image: {}", url);
    }
    Ok(())
}

async fn delete(ctx: &Context, profile_id: &str) -> Result<()> {
    let account = ctx.account()?;
    with_spinner(
        ctx,
        "Deleting profile...",
        ctx.engine.delete_profile(account, profile_id),
    )
    .await
}

/// Switch the active profile and load its favorites.
async fn use_profile(ctx: &Context, profile_id: &str) -> Result<()> {
    let account = ctx.account()?;
    with_spinner(ctx, "Loading profiles...", ctx.engine.fetch_profiles(account)).await?;
    ctx.engine.set_active_profile(profile_id)?;

    let name = ctx
        .engine
        .profile(profile_id)
        .map(|p| p.name)
        .unwrap_or_else(|| profile_id.to_string());
    println!("{} {}", "Active profile:".bold(), name.cyan());

    with_spinner(
        ctx,
        "Loading shows and movies...",
        ctx.engine.load_active_profile(account),
    )
    .await?;
    println!(
        "  {} shows, {} movies",
        ctx.engine.read(|s| s.shows.table.len()),
        ctx.engine.read(|s| s.movies.table.len())
    );
    Ok(())
}
