use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span, Text},
    widgets::{Block, Borders, List, ListItem, Paragraph, Wrap},
    Frame,
};

use crate::config::ColorConfig;
use crate::domain::{format_price, Product};
use crate::feed::{CatalogLoader, Phase};
use crate::tui::app::TuiApp;
use crate::tui::labels::Labels;

pub fn render(frame: &mut Frame, app: &mut TuiApp, loader: &CatalogLoader, colors: &ColorConfig) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(10),   // Catalog + side panes
            Constraint::Length(1), // Status bar
        ])
        .split(frame.area());

    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(60), Constraint::Percentage(40)])
        .split(chunks[0]);

    let side = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(columns[1]);

    render_catalog_pane(frame, app, loader, columns[0], colors);
    render_details_pane(frame, app, loader.products(), side[0], colors);
    render_cart_pane(frame, app, side[1], colors);
    render_status_bar(frame, app, loader, chunks[1], colors);
}

fn render_catalog_pane(
    frame: &mut Frame,
    app: &mut TuiApp,
    loader: &CatalogLoader,
    area: Rect,
    colors: &ColorConfig,
) {
    let products = loader.products();
    let labels = Labels::for_language(app.language);
    app.visible_rows = area.height.saturating_sub(2) as usize;

    let mut items: Vec<ListItem> = products
        .iter()
        .map(|product| {
            let in_cart = app.cart.contains(&product.id);
            let marker = if in_cart { "✓" } else { " " };
            let price_color = if product.is_on_sale() {
                colors.sale_price
            } else {
                colors.price
            };

            let title_style = if in_cart {
                Style::default().fg(colors.in_cart)
            } else {
                Style::default()
            };

            ListItem::new(Line::from(vec![
                Span::styled(format!("{} {} ", marker, product.display_title()), title_style),
                Span::styled(
                    format_price(product.effective_price()),
                    Style::default().fg(price_color),
                ),
            ]))
        })
        .collect();

    // Footer row below the products; never the sentinel.
    let footer = match loader.phase() {
        Phase::Fetching => Some(ListItem::new(format!("  {}", labels.loading_more))),
        Phase::Exhausted if !products.is_empty() => Some(
            ListItem::new(format!("  {}", labels.end_of_catalog))
                .style(Style::default().add_modifier(Modifier::DIM)),
        ),
        Phase::Exhausted => Some(ListItem::new(format!("  {}", labels.no_products))),
        Phase::Idle => loader.state().last_error().map(|_| {
            ListItem::new(format!("  {}", labels.load_failed))
                .style(Style::default().fg(colors.error))
        }),
    };
    items.extend(footer);

    let title = format!(
        " {} ({}) [{}/{}] ",
        labels.catalog,
        products.len(),
        (app.selected + 1).min(products.len().max(1)),
        products.len().max(1)
    );

    let block = Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(Style::default().fg(colors.border));

    let list = List::new(items)
        .block(block)
        .highlight_style(
            Style::default()
                .bg(colors.selection_bg)
                .fg(colors.selection_fg)
                .add_modifier(Modifier::BOLD),
        )
        .highlight_symbol("> ");

    frame.render_stateful_widget(list, area, &mut app.list_state);
}

fn render_details_pane(
    frame: &mut Frame,
    app: &TuiApp,
    products: &[Product],
    area: Rect,
    colors: &ColorConfig,
) {
    let labels = Labels::for_language(app.language);
    let content = match app.selected_product(products) {
        Some(product) => {
            let mut lines = vec![
                Line::from(Span::styled(
                    product.display_title().to_string(),
                    Style::default().add_modifier(Modifier::BOLD),
                )),
                Line::from(""),
            ];

            if product.is_on_sale() {
                lines.push(Line::from(vec![
                    Span::styled(
                        format_price(product.effective_price()),
                        Style::default().fg(colors.sale_price),
                    ),
                    Span::raw(" "),
                    Span::styled(
                        format_price(product.price),
                        Style::default().add_modifier(Modifier::CROSSED_OUT),
                    ),
                ]));
            } else {
                lines.push(Line::from(Span::styled(
                    format_price(product.price),
                    Style::default().fg(colors.price),
                )));
            }

            lines.push(Line::from(format!(
                "{}: {}",
                labels.file_type,
                product.display_file_type()
            )));
            if let Some(created) = product.created_at {
                lines.push(Line::from(format!(
                    "{}: {}",
                    labels.added_on,
                    created.format("%Y-%m-%d")
                )));
            }
            if app.cart.contains(&product.id) {
                lines.push(Line::from(""));
                lines.push(Line::from(Span::styled(
                    labels.in_cart,
                    Style::default().fg(colors.in_cart),
                )));
            }
            Text::from(lines)
        }
        None => Text::from(labels.no_selection),
    };

    let block = Block::default()
        .title(format!(" {} ", labels.details))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(colors.border));

    let paragraph = Paragraph::new(content)
        .block(block)
        .wrap(Wrap { trim: false });

    frame.render_widget(paragraph, area);
}

fn render_cart_pane(frame: &mut Frame, app: &TuiApp, area: Rect, colors: &ColorConfig) {
    let labels = Labels::for_language(app.language);
    let mut lines: Vec<Line> = app
        .cart
        .lines()
        .iter()
        .map(|line| Line::from(format!("{}  {}", line.title, format_price(line.price))))
        .collect();

    if lines.is_empty() {
        lines.push(Line::from(labels.cart_empty));
    } else {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            format!("{}: {}", labels.total, format_price(app.cart.total())),
            Style::default().add_modifier(Modifier::BOLD),
        )));
    }

    let block = Block::default()
        .title(format!(" {} ({}) ", labels.cart, app.cart.len()))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(colors.border));

    let paragraph = Paragraph::new(Text::from(lines))
        .block(block)
        .wrap(Wrap { trim: true });

    frame.render_widget(paragraph, area);
}

fn render_status_bar(
    frame: &mut Frame,
    app: &TuiApp,
    loader: &CatalogLoader,
    area: Rect,
    colors: &ColorConfig,
) {
    let labels = Labels::for_language(app.language);
    let status = if let Some(ref msg) = app.status_message {
        msg.clone()
    } else if loader.is_loading() {
        labels.loading.to_string()
    } else {
        labels.help.to_string()
    };

    let paragraph = Paragraph::new(format!("[{}] {}", app.language.code(), status))
        .style(Style::default().fg(colors.status_fg).bg(colors.status_bg));

    frame.render_widget(paragraph, area);
}
