pub mod commands;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::domain::OrderStatus;

#[derive(Parser)]
#[command(name = "storefront")]
#[command(about = "Browse and buy digital goods from the terminal", long_about = None)]
pub struct Cli {
    /// Override the backend base URL from the config file
    #[arg(long, global = true)]
    pub api_url: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Browse the catalog with infinite scrolling
    Browse,
    /// Print one page of the catalog
    List {
        /// Page number (1-based)
        #[arg(short, long, default_value_t = 1)]
        page: u32,
    },
    /// Inspect or edit the saved cart
    Cart {
        #[command(subcommand)]
        action: CartAction,
    },
    /// Place an order for the cart after paying via UPI
    Checkout {
        /// 12-digit UTR of the UPI payment
        #[arg(long)]
        utr: String,
        /// Email the download links are sent to
        #[arg(long)]
        email: String,
    },
    /// Show the status of an order
    Order {
        /// Order id printed at checkout
        id: String,
    },
    /// Show or set the interface language (en, hi)
    Lang {
        code: Option<String>,
    },
    /// Approve orders and upload products
    Admin {
        #[command(subcommand)]
        action: AdminAction,
    },
    /// Forget the saved cart, language and admin session
    Forget,
}

#[derive(Subcommand)]
pub enum AdminAction {
    /// Start an admin session
    Login {
        #[arg(long)]
        password: String,
    },
    /// End the admin session
    Logout,
    /// List orders awaiting review (or another status)
    Orders {
        /// pending, approved or rejected
        #[arg(long, default_value = "pending")]
        status: OrderStatus,
        /// List every order regardless of status
        #[arg(long, conflicts_with = "status")]
        all: bool,
    },
    /// Approve an order after its UTR checks out
    Approve { id: String },
    /// Reject an order
    Reject { id: String },
    /// Upload a new product
    Upload {
        #[arg(long)]
        title: String,
        #[arg(long)]
        price: f64,
        #[arg(long)]
        sale_price: Option<f64>,
        /// The file buyers download
        #[arg(long)]
        file: PathBuf,
        /// Cover image
        #[arg(long)]
        thumbnail: Option<PathBuf>,
    },
}

#[derive(Subcommand)]
pub enum CartAction {
    /// List cart contents
    Show,
    /// Add a product by id
    Add { id: String },
    /// Remove a product by id
    Remove { id: String },
    /// Empty the cart
    Clear,
}
