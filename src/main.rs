use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use storefront::app::AppContext;
use storefront::cli::{commands, AdminAction, CartAction, Cli, Commands};
use storefront::config::Config;
use storefront::domain::OrderStatus;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Logs go to stderr so they stay out of command output
    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();
    let mut config = Config::load().context("Failed to load configuration")?;
    if let Some(url) = cli.api_url {
        config.api.base_url = url;
    }

    let ctx = AppContext::new(None, config.api.clone())?;

    match cli.command {
        Commands::Browse => {
            storefront::tui::run(Arc::new(ctx), Arc::new(config)).await?;
        }
        Commands::List { page } => {
            commands::list_page(&ctx, page).await?;
        }
        Commands::Cart { action } => match action {
            CartAction::Show => commands::cart_show(&ctx)?,
            CartAction::Add { id } => commands::cart_add(&ctx, &id).await?,
            CartAction::Remove { id } => commands::cart_remove(&ctx, &id)?,
            CartAction::Clear => commands::cart_clear(&ctx)?,
        },
        Commands::Checkout { utr, email } => {
            commands::checkout(&ctx, &utr, &email).await?;
        }
        Commands::Order { id } => {
            commands::order_status(&ctx, &id).await?;
        }
        Commands::Lang { code } => {
            commands::language(&ctx, code.as_deref())?;
        }
        Commands::Admin { action } => match action {
            AdminAction::Login { password } => {
                commands::admin_login(&ctx, &password, config.admin.session_ttl()).await?
            }
            AdminAction::Logout => commands::admin_logout(&ctx)?,
            AdminAction::Orders { status, all } => {
                commands::admin_orders(&ctx, (!all).then_some(status)).await?
            }
            AdminAction::Approve { id } => {
                commands::admin_review(&ctx, &id, OrderStatus::Approved).await?
            }
            AdminAction::Reject { id } => {
                commands::admin_review(&ctx, &id, OrderStatus::Rejected).await?
            }
            AdminAction::Upload {
                title,
                price,
                sale_price,
                file,
                thumbnail,
            } => {
                commands::admin_upload(
                    &ctx,
                    &title,
                    price,
                    sale_price,
                    &file,
                    thumbnail.as_deref(),
                )
                .await?
            }
        },
        Commands::Forget => {
            commands::forget(&ctx)?;
        }
    }

    Ok(())
}
