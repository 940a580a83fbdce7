//! Command handlers

use std::str::FromStr;

use anyhow::{Context, Result, bail};
use api::models::consignment::{ConsignmentStatus, ConsignmentSummary};
use api::models::product::{Product, search as search_products};
use api::models::transaction::{LedgerTotals, TransactionType};
use api::{ApiResult, Cart, EntityId, ListFilters, Page, Services, SessionManager};
use auth::{FeatureArea, Permission};
use chrono::Utc;
use common::preferences::{ThemePreferences, ThemeStore, ThemeUpdate};
use tracing::{debug, info};

use crate::cli::{Command, ConsignmentCommand, ThemeCommand, TransactionCommand, UserCommand};

/// Products loaded to price a sale
const SELL_CATALOG_SIZE: u32 = 500;

/// Everything a command needs, built once at start-up
pub struct Console {
    pub sessions: SessionManager,
    pub services: Services,
    pub themes: ThemeStore,
}

impl Console {
    fn require_session(&self) -> Result<()> {
        if self.sessions.current().is_none() {
            bail!("Not logged in. Run `console login <username>` first.");
        }
        Ok(())
    }

    fn require(&self, area: FeatureArea) -> Result<()> {
        self.require_session()?;
        if !self.sessions.has_permission(&area.required_permission()) {
            bail!("Your account does not have access to {}", area.label());
        }
        Ok(())
    }

    fn allows(&self, area: FeatureArea) -> bool {
        self.sessions.has_permission(&area.required_permission())
    }
}

pub async fn run(console: &Console, command: Command) -> Result<()> {
    match command {
        Command::Login { username, password } => {
            login(console, &username, password.as_deref().unwrap_or_default()).await
        }
        Command::Logout => {
            console.sessions.logout()?;
            println!("Logged out");
            Ok(())
        }
        Command::Whoami => whoami(console),
        Command::Products { search, page } => {
            console.require(FeatureArea::Products)?;
            products(console, search.as_deref(), page.filters()).await
        }
        Command::Categories => {
            console.require(FeatureArea::Products)?;
            categories(console).await
        }
        Command::Countries => {
            console.require(FeatureArea::Exports)?;
            countries(console).await
        }
        Command::Sales { page } => {
            console.require(FeatureArea::Sales)?;
            sales(console, page.filters()).await
        }
        Command::Sell { items } => {
            console.require(FeatureArea::Sales)?;
            sell(console, &items).await
        }
        Command::Consignments(command) => {
            console.require(FeatureArea::Exports)?;
            consignments(console, command).await
        }
        Command::Users(command) => {
            console.require(FeatureArea::Users)?;
            users(console, command).await
        }
        Command::Transactions(command) => {
            console.require(FeatureArea::Accounting)?;
            transactions(console, command).await
        }
        Command::Theme(command) => theme(console, command),
        Command::Overview => {
            console.require_session()?;
            overview(console).await;
            Ok(())
        }
    }
}

async fn login(console: &Console, username: &str, password: &str) -> Result<()> {
    let outcome = console.sessions.login(username, password).await?;
    let session = &outcome.session;

    println!("Logged in as {} ({})", session.username, session.role);
    if let Some(expires_in) = outcome.expires_in {
        println!("Session valid for {}s", expires_in);
    }
    print_areas(&console.sessions.visible_areas());
    Ok(())
}

fn whoami(console: &Console) -> Result<()> {
    let Some(session) = console.sessions.current() else {
        println!("Not logged in");
        return Ok(());
    };

    let theme = console.themes.load()?;
    println!("{}", banner(&theme, &session.username));
    println!("Role:        {}", session.role);
    if let Some(subject_id) = &session.subject_id {
        println!("User id:     {}", subject_id);
    }
    let permissions: Vec<&str> = session.permissions.iter().map(Permission::as_str).collect();
    println!("Permissions: {}", permissions.join(", "));
    print_areas(&console.sessions.visible_areas());
    Ok(())
}

/// `[M] MyCompany | alice`; the company part is dropped when it has no name
fn banner(theme: &ThemePreferences, username: &str) -> String {
    match theme.monogram() {
        Some(monogram) => format!("[{}] {} | {}", monogram, theme.company_name, username),
        None => username.to_string(),
    }
}

fn print_areas(areas: &[FeatureArea]) {
    if areas.is_empty() {
        println!("No areas available for this account");
        return;
    }
    let labels: Vec<&str> = areas.iter().map(|area| area.label()).collect();
    println!("Areas:       {}", labels.join(", "));
}

async fn products(console: &Console, search: Option<&str>, filters: ListFilters) -> Result<()> {
    let page = console.services.products.list(&filters).await?;
    let matches = search_products(&page.content, search.unwrap_or_default());

    for product in &matches {
        println!(
            "{:>6}  {:<32} {:<12} {:>10.2}  stock {}{}",
            product.id,
            product.name,
            product.sku.as_deref().unwrap_or("-"),
            product.selling_price(),
            product.stock.map_or("-".to_string(), |stock| stock.to_string()),
            if product.active { "" } else { "  (inactive)" }
        );
    }
    println!("{} shown, {} in catalog", matches.len(), page.total);
    Ok(())
}

async fn categories(console: &Console) -> Result<()> {
    let page = console.services.categories.list(&ListFilters::new()).await?;
    for category in &page.content {
        println!(
            "{:>6}  {:<24} {}",
            category.id,
            category.name,
            category.description.as_deref().unwrap_or("")
        );
    }
    Ok(())
}

async fn countries(console: &Console) -> Result<()> {
    let page = console.services.countries.list(&ListFilters::new()).await?;
    for country in &page.content {
        println!(
            "{:<4} {}",
            country.code.as_deref().unwrap_or("-"),
            country.name
        );
    }
    Ok(())
}

async fn sales(console: &Console, filters: ListFilters) -> Result<()> {
    let page = console.services.sales.list(&filters).await?;
    for sale in &page.content {
        println!(
            "{:>6}  {:<25} {:>3} item(s) {:>10.2}",
            sale.id,
            sale.date.as_deref().unwrap_or("-"),
            sale.items.len(),
            sale.total.unwrap_or_default()
        );
    }
    println!("{} sale(s)", page.total);
    Ok(())
}

/// `PRODUCT_ID` or `PRODUCT_ID:QUANTITY`
fn parse_item(raw: &str) -> Result<(EntityId, i64)> {
    let (id, quantity) = match raw.split_once(':') {
        Some((id, quantity)) => (
            id,
            quantity
                .trim()
                .parse::<i64>()
                .with_context(|| format!("Invalid quantity in {:?}", raw))?,
        ),
        None => (raw, 1),
    };

    let id = id.trim();
    if id.is_empty() {
        bail!("Missing product id in {:?}", raw);
    }
    Ok((EntityId::from_str(id).unwrap_or_else(|never| match never {}), quantity))
}

/// Add `quantity` more of `product`; a product named twice accumulates
fn add_units(cart: &mut Cart, product: &Product, quantity: i64) {
    let already = cart
        .lines()
        .iter()
        .find(|line| line.product_id == product.id)
        .map_or(0, |line| i64::from(line.quantity));
    cart.add(product);
    cart.update_quantity(&product.id, already.saturating_add(quantity));
}

async fn sell(console: &Console, items: &[String]) -> Result<()> {
    let wanted = items
        .iter()
        .map(|raw| parse_item(raw))
        .collect::<Result<Vec<_>>>()?;

    let catalog = console
        .services
        .products
        .list(&ListFilters::new().page(1).size(SELL_CATALOG_SIZE))
        .await?;

    let mut cart = Cart::new();
    for (id, quantity) in wanted {
        let product = catalog
            .content
            .iter()
            .find(|product| product.id == id)
            .with_context(|| format!("Unknown product: {}", id))?;

        add_units(&mut cart, product, quantity);
    }
    debug!("Cart holds {} line(s), total {:.2}", cart.len(), cart.total());

    let invoice = cart.checkout(&console.services.sales, Utc::now()).await?;

    let theme = console.themes.load()?;
    println!("{}", theme.company_name);
    match &invoice.invoice_number {
        Some(number) => println!("Invoice #{}", number),
        None => println!("Invoice (number pending)"),
    }
    println!("Date: {}", invoice.sale.date.format("%Y-%m-%d %H:%M"));
    for line in &invoice.lines {
        println!(
            "  {:<32} {:>4} x {:>10.2} = {:>10.2}",
            line.name,
            line.quantity,
            line.unit_price,
            line.subtotal()
        );
    }
    println!("Total: {:.2}", invoice.sale.total);
    Ok(())
}

fn parse_status(value: &str) -> Result<ConsignmentStatus> {
    ConsignmentStatus::ALL
        .into_iter()
        .find(|status| status.as_str().eq_ignore_ascii_case(value.trim()))
        .with_context(|| format!("Unknown consignment status: {}", value))
}

async fn consignments(console: &Console, command: ConsignmentCommand) -> Result<()> {
    let repository = &console.services.consignments;

    match command {
        ConsignmentCommand::List { status, page } => {
            let status = status.as_deref().map(parse_status).transpose()?;
            let filters = page.filters().filter("status", status);
            let page = repository.list(&filters).await?;

            for consignment in &page.content {
                let tag = consignment.status.tag();
                println!(
                    "{:>6}  {:<24} {:<12} [{}] {:>10.2}",
                    consignment.id,
                    consignment
                        .supplier
                        .as_ref()
                        .and_then(|supplier| supplier.name.as_deref())
                        .unwrap_or("-"),
                    tag.label,
                    tag.color,
                    consignment.value.unwrap_or_default()
                );
            }
            println!("{} consignment(s)", page.total);
        }
        ConsignmentCommand::SetStatus { id, status } => {
            let status = parse_status(&status)?;
            let id = EntityId::from_str(&id).unwrap_or_else(|never| match never {});

            let known = repository.list(&ListFilters::new()).await?;
            if let Some(current) = known.content.iter().find(|c| c.id == id) {
                if !current.status.allows_status_change() {
                    bail!("Consignment {} is {} and can no longer change", id, current.status);
                }
            }

            repository.update_status(&id, status).await?;
            info!("Consignment {} moved to {}", id, status);
            println!("Consignment {} is now {}", id, status);
        }
        ConsignmentCommand::Summary => {
            let page = repository.list(&ListFilters::new()).await?;
            let summary = ConsignmentSummary::from_consignments(&page.content);
            println!("Total:      {}", summary.total);
            println!("Received:   {}", summary.received);
            println!("Processing: {}", summary.processing);
            println!("Exported:   {}", summary.exported);
        }
    }
    Ok(())
}

async fn users(console: &Console, command: UserCommand) -> Result<()> {
    match command {
        UserCommand::List { page } => {
            let page = console.services.users.list(&page.filters()).await?;
            for user in &page.content {
                println!(
                    "{:>6}  {:<20} {:<28} {:<10} {}",
                    user.id,
                    user.username,
                    user.email.as_deref().unwrap_or("-"),
                    user.role.as_deref().unwrap_or("-"),
                    if user.active { "active" } else { "inactive" }
                );
            }
            println!("{} user(s)", page.total);
        }
        UserCommand::Permissions => {
            for permission in Permission::assignable() {
                println!("{}", permission);
            }
        }
    }
    Ok(())
}

async fn transactions(console: &Console, command: TransactionCommand) -> Result<()> {
    match command {
        TransactionCommand::List { page } => {
            let page = console.services.transactions.list(&page.filters()).await?;
            for entry in &page.content {
                println!(
                    "{:>6}  {:<12} {:<8} {:>10.2}  {}",
                    entry.id,
                    entry.date.as_deref().unwrap_or("-"),
                    kind_label(entry.kind),
                    entry.amount,
                    entry.description.as_deref().unwrap_or("")
                );
            }
            println!("{} entr(ies)", page.total);
        }
        TransactionCommand::Totals => {
            let page = console
                .services
                .transactions
                .list(&ListFilters::new())
                .await?;
            print_totals(&LedgerTotals::from_transactions(&page.content));
        }
    }
    Ok(())
}

fn kind_label(kind: TransactionType) -> &'static str {
    match kind {
        TransactionType::Income => "INCOME",
        TransactionType::Expense => "EXPENSE",
        TransactionType::Other => "OTHER",
    }
}

fn print_totals(totals: &LedgerTotals) {
    println!("Paid out: {:>12.2}", totals.paid_out);
    println!("Received: {:>12.2}", totals.received);
    println!("Net:      {:>12.2}", totals.net);
}

fn theme(console: &Console, command: ThemeCommand) -> Result<()> {
    let theme = match command {
        ThemeCommand::Show => console.themes.load()?,
        ThemeCommand::Set {
            primary,
            secondary,
            company,
        } => console.themes.update(ThemeUpdate {
            primary_color: primary,
            secondary_color: secondary,
            company_name: company,
        })?,
    };

    println!("{}", serde_json::to_string_pretty(&theme)?);
    Ok(())
}

fn report<T>(label: &str, result: Option<ApiResult<Page<T>>>, describe: impl FnOnce(&Page<T>) -> String) {
    match result {
        None => {}
        Some(Ok(page)) => println!("{:<14} {}", label, describe(&page)),
        Some(Err(e)) => println!("{:<14} unavailable: {}", label, e),
    }
}

/// Load every visible area at once; one failing load does not hide the others
async fn overview(console: &Console) {
    let recent = ListFilters::recent_first(5);
    let everything = ListFilters::new();
    let services = &console.services;

    let (products, sales, consignments, transactions) = tokio::join!(
        async {
            if console.allows(FeatureArea::Products) {
                Some(services.products.list(&recent).await)
            } else {
                None
            }
        },
        async {
            if console.allows(FeatureArea::Sales) {
                Some(services.sales.list(&recent).await)
            } else {
                None
            }
        },
        async {
            if console.allows(FeatureArea::Exports) {
                Some(services.consignments.list(&everything).await)
            } else {
                None
            }
        },
        async {
            if console.allows(FeatureArea::Accounting) {
                Some(services.transactions.list(&everything).await)
            } else {
                None
            }
        },
    );

    report("Products", products, |page| format!("{} in catalog", page.total));
    report("Sales", sales, |page| {
        let recent: f64 = page
            .content
            .iter()
            .map(|sale| sale.total.unwrap_or_default())
            .sum();
        format!("{} recorded, last {} total {:.2}", page.total, page.len(), recent)
    });
    report("Consignments", consignments, |page| {
        let summary = ConsignmentSummary::from_consignments(&page.content);
        format!(
            "{} total, {} received, {} processing, {} exported",
            summary.total, summary.received, summary.processing, summary.exported
        )
    });
    report("Ledger", transactions, |page| {
        let totals = LedgerTotals::from_transactions(&page.content);
        format!("net {:.2}", totals.net)
    });
}
