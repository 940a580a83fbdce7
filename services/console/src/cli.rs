//! Command-line interface definition

use std::path::PathBuf;

use api::ListFilters;
use clap::{Args, Parser, Subcommand};

/// Management console for the inventory, sales and export backend
#[derive(Parser, Debug)]
#[command(name = "console")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Path to a configuration file
    #[arg(short, long, env = "CONSOLE_CONFIG")]
    pub config: Option<PathBuf>,

    /// Log level used when RUST_LOG is not set (trace, debug, info, warn, error)
    #[arg(long, default_value = "warn")]
    pub log_level: String,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    // === Session ===
    /// Log in and keep the session for later commands
    Login {
        /// Username
        username: String,

        /// Password
        #[arg(long, env = "CONSOLE_PASSWORD", hide_env_values = true)]
        password: Option<String>,
    },

    /// End the session; theme preferences are kept
    Logout,

    /// Show the logged-in user and the areas they may use
    Whoami,

    // === Catalog ===
    /// List products
    Products {
        /// Only show products whose name or SKU contains this text
        #[arg(short, long)]
        search: Option<String>,

        #[command(flatten)]
        page: PageArgs,
    },

    /// List product categories
    Categories,

    /// List configured countries
    Countries,

    // === Sales ===
    /// List recorded sales
    Sales {
        #[command(flatten)]
        page: PageArgs,
    },

    /// Record a sale
    Sell {
        /// Items as PRODUCT_ID or PRODUCT_ID:QUANTITY
        #[arg(required = true)]
        items: Vec<String>,
    },

    // === Exports ===
    /// Export consignments
    #[command(subcommand)]
    Consignments(ConsignmentCommand),

    // === Administration ===
    /// User administration
    #[command(subcommand)]
    Users(UserCommand),

    /// Accounting ledger
    #[command(subcommand)]
    Transactions(TransactionCommand),

    /// Display preferences
    #[command(subcommand)]
    Theme(ThemeCommand),

    /// Headline figures from every area the account may see
    Overview,
}

#[derive(Subcommand, Debug)]
pub enum ConsignmentCommand {
    /// List consignments
    #[command(alias = "ls")]
    List {
        /// Only show consignments in this status
        #[arg(long)]
        status: Option<String>,

        #[command(flatten)]
        page: PageArgs,
    },

    /// Move a consignment to a new status
    SetStatus {
        /// Consignment id
        id: String,

        /// RECEIVED, PROCESSING, EXPORTED, PENDING, ACKNOWLEDGED or CANCELLED
        status: String,
    },

    /// Count consignments per status
    Summary,
}

#[derive(Subcommand, Debug)]
pub enum UserCommand {
    /// List user accounts
    #[command(alias = "ls")]
    List {
        #[command(flatten)]
        page: PageArgs,
    },

    /// Permissions that can be granted to an account
    Permissions,
}

#[derive(Subcommand, Debug)]
pub enum TransactionCommand {
    /// List ledger entries
    #[command(alias = "ls")]
    List {
        #[command(flatten)]
        page: PageArgs,
    },

    /// Money paid out, received, and the net result
    Totals,
}

#[derive(Subcommand, Debug)]
pub enum ThemeCommand {
    /// Show the current preferences
    Show,

    /// Change one or more preferences
    Set {
        /// Primary colour, e.g. #6366f1
        #[arg(long)]
        primary: Option<String>,

        /// Secondary colour
        #[arg(long)]
        secondary: Option<String>,

        /// Company name shown in the header
        #[arg(long)]
        company: Option<String>,
    },
}

/// Paging flags shared by list commands
#[derive(Args, Debug, Clone, Copy)]
pub struct PageArgs {
    /// Page number, starting at 1
    #[arg(long, default_value_t = 1)]
    pub page: u32,

    /// Entries per page
    #[arg(long, default_value_t = 20)]
    pub size: u32,
}

impl PageArgs {
    pub fn filters(self) -> ListFilters {
        ListFilters::new().page(self.page).size(self.size)
    }
}
