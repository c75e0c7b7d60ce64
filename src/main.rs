use anyhow::{anyhow, bail, Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::str::FromStr;
use tokio::sync::watch;
use tracing::info;

use resto_order::config;
use resto_order::gateway::{HttpGateway, OrderGateway};
use resto_order::menu::{self, format_rupiah};
use resto_order::model::Transaction;
use resto_order::order::OrderSession;
use resto_order::tables::watch_tables;

const RECOMMENDATION_LIMIT: usize = 6;

#[derive(Debug, Parser)]
#[command(author, version, about)]
struct Args {
    /// Path to YAML config file
    #[arg(long, default_value = "config.yaml")]
    config: PathBuf,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// List tables, marking those held by active transactions as occupied
    Tables {
        /// Keep refreshing on the configured interval
        #[arg(long)]
        watch: bool,
    },
    /// List the menu
    Menu {
        #[arg(long)]
        category: Option<String>,
        #[arg(long, default_value = "")]
        search: String,
        /// Suggest other dishes from the same category as this menu item
        #[arg(long)]
        similar: Option<i64>,
    },
    /// Place an order; without --table it is a take-away
    Order {
        #[arg(long)]
        name: String,
        #[arg(long)]
        table: Option<i64>,
        /// MENU_ID:QTY or MENU_ID:QTY:NOTE, repeatable
        #[arg(long = "item", required = true)]
        items: Vec<ItemSpec>,
    },
    /// Show one transaction
    Show { id: i64 },
    /// Cancel one transaction
    Cancel { id: i64 },
}

#[derive(Debug, Clone)]
struct ItemSpec {
    menu_id: i64,
    quantity: u32,
    note: String,
}

impl FromStr for ItemSpec {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut parts = s.splitn(3, ':');
        let menu_id = parts
            .next()
            .and_then(|p| p.trim().parse().ok())
            .ok_or_else(|| format!("invalid menu id in '{s}'"))?;
        let quantity = parts
            .next()
            .and_then(|p| p.trim().parse().ok())
            .ok_or_else(|| format!("invalid quantity in '{s}'"))?;
        let note = parts.next().unwrap_or_default().to_string();
        Ok(Self {
            menu_id,
            quantity,
            note,
        })
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_target(false)
        .compact()
        .init();

    let args = Args::parse();
    let mut cfg = config::load(Some(&args.config))?;
    if let Ok(base_url) = std::env::var("RESTO_BASE_URL") {
        cfg.backend.base_url = base_url;
        config::validate(&cfg)?;
    }
    let gateway = HttpGateway::new(&cfg.backend)?;
    info!(base_url = gateway.base_url(), "using backend");

    match args.command {
        Command::Tables { watch: false } => {
            for table in gateway.list_tables_with_occupancy().await? {
                println!(
                    "#{:<4} {:<8} seats {:<3} {}",
                    table.id,
                    table.label,
                    table.capacity,
                    table.status.as_str()
                );
            }
        }
        Command::Tables { watch: true } => {
            let (tx, mut rx) = watch::channel(Vec::new());
            let every = cfg.ordering.table_refresh_interval();
            let watcher = gateway.clone();
            tokio::spawn(async move { watch_tables(&watcher, every, tx).await });
            while rx.changed().await.is_ok() {
                let tables = rx.borrow_and_update().clone();
                let free = tables.iter().filter(|t| t.is_available()).count();
                println!("{} tables, {} available", tables.len(), free);
                for table in tables.iter().filter(|t| !t.is_available()) {
                    println!("  {} {}", table.label, table.status.as_str());
                }
            }
        }
        Command::Menu {
            category,
            search,
            similar,
        } => {
            let items = gateway.list_menu().await?;
            println!("categories: {}", menu::categories(&items).join(", "));
            for item in menu::filter(&items, category.as_deref(), &search) {
                println!(
                    "#{:<4} {:<24} {:<12} {:>12} {}",
                    item.id,
                    item.name,
                    item.category,
                    format_rupiah(item.price),
                    if item.available { "" } else { "(sold out)" }
                );
            }
            if let Some(id) = similar {
                let current = items
                    .iter()
                    .find(|m| m.id == id)
                    .ok_or_else(|| anyhow!("menu item {id} not found"))?;
                println!("you may also like:");
                for item in menu::recommendations(&items, current, RECOMMENDATION_LIMIT) {
                    println!("  #{:<4} {} {}", item.id, item.name, format_rupiah(item.price));
                }
            }
        }
        Command::Order { name, table, items } => {
            let transaction = place_order(&gateway, name, table, &items).await?;
            println!("Order placed! Total: {}", format_rupiah(transaction.total));
            print_transaction(&transaction);
        }
        Command::Show { id } => print_transaction(&gateway.get_transaction(id).await?),
        Command::Cancel { id } => {
            gateway.cancel_transaction(id).await?;
            println!("transaction {id} cancelled");
        }
    }

    Ok(())
}

async fn place_order(
    gateway: &HttpGateway,
    name: String,
    table: Option<i64>,
    items: &[ItemSpec],
) -> Result<Transaction> {
    let mut session = match table {
        Some(table_id) if table_id > 0 => {
            let mut session = OrderSession::dine_in(name);
            let tables = gateway.list_tables_with_occupancy().await?;
            session.select_table(&tables, table_id)?;
            session
        }
        _ => OrderSession::take_away(name),
    };

    let catalog = gateway.list_menu().await?;
    for spec in items {
        let item = catalog
            .iter()
            .find(|m| m.id == spec.menu_id)
            .ok_or_else(|| anyhow!("menu item {} not found", spec.menu_id))?;
        session
            .add_item(item, spec.quantity, &spec.note)
            .with_context(|| format!("cannot add menu item {}", spec.menu_id))?;
    }
    if session.cart().is_empty() {
        bail!("nothing to order");
    }
    println!(
        "submitting {} line(s), {}",
        session.cart().item_count(),
        format_rupiah(session.cart().total())
    );
    Ok(session.checkout(gateway).await?)
}

fn print_transaction(t: &Transaction) {
    println!(
        "transaction #{} for {} ({}) status {}",
        t.id,
        t.customer_name,
        t.kind.as_str(),
        t.status.as_str()
    );
    if let Some(table_id) = t.table_id {
        println!("  table #{table_id}");
    }
    for line in &t.lines {
        println!(
            "  {} x{} {} {}",
            line.item_name,
            line.quantity,
            format_rupiah(line.subtotal),
            line.note
        );
    }
    println!("  total {}", format_rupiah(t.total));
}
