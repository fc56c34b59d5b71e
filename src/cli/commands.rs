use std::path::Path;

use chrono::Duration;

use crate::api::{AdminGateway, CatalogSource, OrderGateway};
use crate::app::{AppContext, Result, StorefrontError};
use crate::checkout;
use crate::domain::{
    format_price, Attachment, Language, Order, OrderReceipt, OrderStatus, Product, ProductUpload,
};
use crate::feed::{CatalogLoader, FetchOutcome};
use crate::session::{AdminSession, CartStore};
use crate::store::KeyValueStore;

pub async fn list_page(ctx: &AppContext, page: u32) -> Result<()> {
    let page = page.max(1);
    let result = ctx.api.fetch_page(page, ctx.api_config.page_limit()).await?;

    if result.products.is_empty() {
        println!("No products on page {}", page);
        return Ok(());
    }

    let cart = ctx.carts().load()?;
    for product in &result.products {
        let marker = if cart.contains(&product.id) { "*" } else { " " };
        println!("{} {}", marker, describe(product));
    }
    println!("\nPage {} of {}", result.current_page, result.total_pages);
    Ok(())
}

fn describe(product: &Product) -> String {
    let price = if product.is_on_sale() {
        format!(
            "{} (was {})",
            format_price(product.effective_price()),
            format_price(product.price)
        )
    } else {
        format_price(product.price)
    };
    format!(
        "{:<24} {} [{}] {}",
        product.id,
        product.display_title(),
        product.display_file_type(),
        price
    )
}

pub fn cart_show(ctx: &AppContext) -> Result<()> {
    let cart = ctx.carts().load()?;

    if cart.is_empty() {
        println!("Cart is empty");
        return Ok(());
    }

    for line in cart.lines() {
        println!("  {:<24} {} {}", line.product_id, line.title, format_price(line.price));
    }
    println!("Total: {}", format_price(cart.total()));
    Ok(())
}

pub async fn cart_add(ctx: &AppContext, product_id: &str) -> Result<()> {
    let carts = ctx.carts();
    let mut cart = carts.load()?;
    if cart.contains(product_id) {
        println!("Already in cart: {}", product_id);
        return Ok(());
    }

    let mut loader = ctx.catalog_loader();
    let product = find_product(&mut loader, product_id)
        .await?
        .ok_or_else(|| StorefrontError::ProductNotFound(product_id.to_string()))?;

    cart.add(&product);
    carts.save(&cart)?;
    println!(
        "Added {} ({}). Cart total: {}",
        product.display_title(),
        format_price(product.effective_price()),
        format_price(cart.total())
    );
    Ok(())
}

/// Pages through the catalog until `product_id` shows up or the catalog
/// runs out.
pub async fn find_product(loader: &mut CatalogLoader, product_id: &str) -> Result<Option<Product>> {
    loop {
        if let Some(product) = loader.products().iter().find(|p| p.id == product_id) {
            return Ok(Some(product.clone()));
        }
        if loader.fetch_next_page().is_none() {
            return Ok(None);
        }
        if let Some(FetchOutcome::Failed { page, error }) = loader.settle().await {
            return Err(StorefrontError::Other(format!(
                "Could not load catalog page {}: {}",
                page, error
            )));
        }
    }
}

pub fn cart_remove(ctx: &AppContext, product_id: &str) -> Result<()> {
    let carts = ctx.carts();
    let mut cart = carts.load()?;

    if cart.remove(product_id) {
        carts.save(&cart)?;
        println!("Removed {}", product_id);
    } else {
        println!("Not in cart: {}", product_id);
    }
    Ok(())
}

pub fn cart_clear(ctx: &AppContext) -> Result<()> {
    ctx.carts().clear()?;
    println!("Cart cleared");
    Ok(())
}

pub async fn checkout(ctx: &AppContext, utr: &str, email: &str) -> Result<()> {
    let receipt = place_order(ctx.api.as_ref(), &ctx.carts(), utr, email).await?;
    println!("Order {} placed: {}", receipt.id, receipt.status);
    println!("You will receive the files once the payment is verified.");
    Ok(())
}

/// Validates and submits the saved cart; the cart is cleared only after the
/// backend accepted the order.
pub async fn place_order<G, S>(
    gateway: &G,
    carts: &CartStore<'_, S>,
    utr: &str,
    email: &str,
) -> Result<OrderReceipt>
where
    G: OrderGateway + ?Sized,
    S: KeyValueStore + ?Sized,
{
    let cart = carts.load()?;
    let request = checkout::build_order(&cart, utr, email)?;

    let receipt = gateway.submit_order(&request).await?;
    tracing::info!("Order {} submitted with {} items", receipt.id, request.items.len());

    carts.clear()?;
    Ok(receipt)
}

pub async fn order_status(ctx: &AppContext, order_id: &str) -> Result<()> {
    let order = ctx.api.get_order(order_id).await?;
    println!("Order {}: {}", order.id, order.status);
    if let Some(total) = order.total {
        println!("  Total: {}", format_price(total));
    }
    if let Some(utr) = order.utr {
        println!("  UTR:   {}", utr);
    }
    Ok(())
}

pub fn language(ctx: &AppContext, code: Option<&str>) -> Result<()> {
    let prefs = ctx.preferences();

    match code {
        Some(code) => {
            let language: Language = code.parse()?;
            prefs.set_language(language)?;
            println!("Language set to {}", language);
        }
        None => {
            let current = prefs.language()?;
            let available: Vec<&str> = Language::all().iter().map(|l| l.code()).collect();
            println!("{} (available: {})", current, available.join(", "));
        }
    }
    Ok(())
}

/// Drops everything kept between runs.
pub fn forget(ctx: &AppContext) -> Result<()> {
    ctx.store.clear()?;
    println!("Saved cart, language and admin session cleared");
    Ok(())
}

pub async fn admin_login(ctx: &AppContext, password: &str, ttl: Duration) -> Result<()> {
    ctx.api.login(password).await?;
    let expires_at = ctx.admin_session().start(ttl)?;
    tracing::info!("Admin session started");
    println!(
        "Logged in. Session valid until {}",
        expires_at.format("%Y-%m-%d %H:%M UTC")
    );
    Ok(())
}

pub fn admin_logout(ctx: &AppContext) -> Result<()> {
    if ctx.admin_session().end()? {
        println!("Logged out");
    } else {
        println!("No admin session");
    }
    Ok(())
}

pub async fn admin_orders(ctx: &AppContext, status: Option<OrderStatus>) -> Result<()> {
    ctx.admin_session().require()?;
    let orders = ctx.api.list_orders(status).await?;

    if orders.is_empty() {
        println!("No orders");
        return Ok(());
    }

    for order in &orders {
        println!(
            "{:<24} {:<16} {:>12} UTR {} {}",
            order.id,
            order.status,
            order.total.map(format_price).unwrap_or_default(),
            order.utr.as_deref().unwrap_or("-"),
            order.email.as_deref().unwrap_or("")
        );
        for item in &order.items {
            println!("    {} {}", item.title, format_price(item.price));
        }
    }
    println!("\n{} orders", orders.len());
    Ok(())
}

pub async fn admin_review(ctx: &AppContext, order_id: &str, status: OrderStatus) -> Result<()> {
    let order = review_order(ctx.api.as_ref(), &ctx.admin_session(), order_id, status).await?;
    println!("Order {} is now {}", order.id, order.status);
    Ok(())
}

/// Moves a pending order to `status`; needs an active admin session.
pub async fn review_order<G, S>(
    gateway: &G,
    session: &AdminSession<'_, S>,
    order_id: &str,
    status: OrderStatus,
) -> Result<Order>
where
    G: AdminGateway + ?Sized,
    S: KeyValueStore + ?Sized,
{
    if status == OrderStatus::Pending {
        return Err(StorefrontError::Other(
            "An order can only be approved or rejected".into(),
        ));
    }
    session.require()?;

    let order = gateway.set_order_status(order_id, status).await?;
    tracing::info!("Order {} marked {}", order.id, order.status.code());
    Ok(order)
}

pub async fn admin_upload(
    ctx: &AppContext,
    title: &str,
    price: f64,
    sale_price: Option<f64>,
    file: &Path,
    thumbnail: Option<&Path>,
) -> Result<()> {
    ctx.admin_session().require()?;

    let mut upload = ProductUpload::new(title, price, sale_price, read_attachment(file).await?);
    if let Some(path) = thumbnail {
        upload = upload.with_thumbnail(read_attachment(path).await?);
    }

    let product = ctx.api.upload_product(&upload).await?;
    println!("Uploaded {}", describe(&product));
    Ok(())
}

async fn read_attachment(path: &Path) -> Result<Attachment> {
    let bytes = tokio::fs::read(path).await?;
    Ok(Attachment::from_path(path, bytes))
}
