pub mod app;
pub mod event;
pub mod labels;
pub mod layout;

use std::io::{self, Stdout};
use std::sync::Arc;
use std::time::Duration;

use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};

use crate::app::{AppContext, Result};
use crate::config::Config;
use crate::domain::format_price;
use crate::feed::{CatalogLoader, FetchOutcome};

use self::app::TuiApp;
use self::event::{Action, AppEvent, EventHandler};

type Tui = Terminal<CrosstermBackend<Stdout>>;

pub async fn run(ctx: Arc<AppContext>, config: Arc<Config>) -> Result<()> {
    let mut terminal = setup_terminal()?;
    let result = run_app(&mut terminal, ctx, config).await;
    restore_terminal(&mut terminal)?;
    result
}

fn setup_terminal() -> Result<Tui> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let terminal = Terminal::new(backend)?;
    Ok(terminal)
}

fn restore_terminal(terminal: &mut Tui) -> Result<()> {
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;
    Ok(())
}

async fn run_app(terminal: &mut Tui, ctx: Arc<AppContext>, config: Arc<Config>) -> Result<()> {
    let mut tui_app = TuiApp::new(ctx.carts().load()?, ctx.preferences().language()?);
    let mut loader = ctx.catalog_loader();
    let event_handler = EventHandler::new(Duration::from_millis(100));

    loader.reset(&tui_app.refresh_trigger);
    loader.fetch_next_page();

    loop {
        for outcome in loader.poll_completions() {
            report_outcome(&mut tui_app, &outcome);
        }
        tui_app.clamp_selection(loader.products().len());

        terminal.draw(|frame| layout::render(frame, &mut tui_app, &loader, &config.colors))?;
        watch_last_item(&tui_app, &mut loader);

        match event_handler.next()? {
            AppEvent::Key(key) => {
                let len = loader.products().len();
                match config.keybindings.get_action(&key) {
                    Action::Quit => {
                        tui_app.should_quit = true;
                    }
                    Action::MoveUp => {
                        tui_app.move_up();
                    }
                    Action::MoveDown => {
                        tui_app.move_down(len);
                    }
                    Action::NextPage => {
                        tui_app.next_page(len);
                    }
                    Action::PrevPage => {
                        tui_app.prev_page();
                    }
                    Action::AddToCart => {
                        if let Some(product) = tui_app.selected_product(loader.products()).cloned()
                        {
                            if tui_app.cart.add(&product) {
                                ctx.carts().save(&tui_app.cart)?;
                                tui_app.set_status(format!(
                                    "Added {}. Total: {}",
                                    product.display_title(),
                                    format_price(tui_app.cart.total())
                                ));
                            } else {
                                tui_app.set_status(format!(
                                    "{} is already in your cart",
                                    product.display_title()
                                ));
                            }
                        }
                    }
                    Action::RemoveFromCart => {
                        if let Some(product) = tui_app.selected_product(loader.products()).cloned()
                        {
                            if tui_app.cart.remove(&product.id) {
                                ctx.carts().save(&tui_app.cart)?;
                                tui_app.set_status(format!("Removed {}", product.display_title()));
                            }
                        }
                    }
                    Action::Refresh => {
                        tui_app.restart();
                        loader.reset(&tui_app.refresh_trigger);
                        loader.fetch_next_page();
                        tui_app.set_status("Reloading catalog...".to_string());
                    }
                    Action::Retry => {
                        if loader.retry().is_some() {
                            tui_app.set_status("Retrying...".to_string());
                        }
                    }
                    Action::None => {}
                }
            }
            AppEvent::Tick => {}
        }

        if tui_app.should_quit {
            break;
        }
    }

    Ok(())
}

/// Feeds the visibility of the last product row to the loader's sentinel.
fn watch_last_item(tui_app: &TuiApp, loader: &mut CatalogLoader) {
    let products = loader.products();
    let Some(last) = products.last().map(|p| p.id.clone()) else {
        loader.observe(None);
        return;
    };
    let last_index = products.len() - 1;

    loader.observe(Some(&last));
    if tui_app.is_row_visible(last_index) {
        loader.on_last_item_visible(&last);
    } else {
        loader.on_last_item_hidden(&last);
    }
}

fn report_outcome(tui_app: &mut TuiApp, outcome: &FetchOutcome) {
    match outcome {
        FetchOutcome::Merged { added, has_more, .. } => {
            if *has_more {
                tui_app.status_message = None;
            } else {
                tui_app.set_status(format!("Loaded {} more. End of catalog", added));
            }
        }
        FetchOutcome::Failed { page, error } => {
            tui_app.set_status(format!("Page {} failed: {}", page, error));
        }
        FetchOutcome::Stale { .. } => {}
    }
}
