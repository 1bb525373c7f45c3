//! Account notification commands.

use super::{truncate, with_spinner, Context};
use crate::cli::args::NotificationsAction;
use crate::models::AccountNotification;
use crate::Result;
use colored::Colorize;

pub async fn run(ctx: &Context, action: NotificationsAction) -> Result<()> {
    let account = ctx.account()?;
    match action {
        NotificationsAction::List => {
            with_spinner(
                ctx,
                "Loading notifications...",
                ctx.engine.fetch_system_notifications(account),
            )
            .await?;
            print_notifications(&ctx.engine.system_notifications());
        }
        NotificationsAction::Dismiss { notification_id } => {
            let remaining = with_spinner(
                ctx,
                "Dismissing notification...",
                ctx.engine.dismiss_system_notification(account, notification_id),
            )
            .await?;
            print_notifications(&remaining);
        }
    }
    Ok(())
}

fn print_notifications(notifications: &[AccountNotification]) {
    if notifications.is_empty() {
        println!("No notifications.");
        return;
    }

    println!();
    println!("  {:<8} {:<12} {}", "ID".bold(), "Until".bold(), "Message".bold());
    println!("{}", "-".repeat(76));
    for notification in notifications {
        let until = notification
            .end_date
            .map(|d| d.format("%Y-%m-%d").to_string())
            .unwrap_or_else(|| "-".to_string());
        println!(
            "  {:<8} {:<12} {}",
            notification.notification_id,
            until,
            truncate(&notification.message, 54)
        );
    }
    println!();
}
