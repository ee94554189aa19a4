#![forbid(unsafe_code)]
//! OrderChain CLI - scripted order lifecycle and digest inspection

use clap::{Parser, Subcommand};
use colored::*;
use comfy_table::presets::UTF8_FULL;
use comfy_table::Color as TableColor;
use comfy_table::{Attribute, Cell, ContentArrangement, Table};
use orderchain::blockchain::Ledger;
use orderchain::config::{load_config, Config, DEFAULT_CONFIG_PATH};
use orderchain::crypto::hash_to_hex;
use orderchain::transaction::{OrderStatus, PartyId, Transaction};

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to the TOML configuration file
    #[arg(long, default_value = DEFAULT_CONFIG_PATH)]
    config: String,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Runs a manufacturer -> distributor -> client order lifecycle and prints the chain
    Demo {
        /// Overrides ledger.difficulty from the configuration
        #[arg(long)]
        difficulty: Option<u32>,
    },
    /// Prints the digest of a transaction for interoperability checks
    HashTx {
        #[arg(long)]
        order_id: u64,
        /// Milliseconds since the Unix epoch
        #[arg(long)]
        timestamp: u64,
    },
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let config = load_config(&cli.config)?;

    tracing_subscriber::fmt()
        .with_max_level(config.logging.tracing_level()?)
        .init();

    match cli.command {
        Commands::Demo { difficulty } => demo(config, difficulty)?,
        Commands::HashTx {
            order_id,
            timestamp,
        } => {
            println!("{}", Transaction::hash_preimage(order_id, timestamp).dimmed());
            println!(
                "{}",
                hash_to_hex(&Transaction::calculate_hash(order_id, timestamp)).bright_green()
            );
        }
    }

    Ok(())
}

fn demo(mut config: Config, difficulty: Option<u32>) -> Result<(), Box<dyn std::error::Error>> {
    if let Some(difficulty) = difficulty {
        config.ledger.difficulty = difficulty;
    }
    let mut ledger = Ledger::from_config(&config.ledger)?;

    let manufacturer = PartyId::new("manufacturer");
    let alice = PartyId::new("alice");
    let bob = PartyId::new("bob");
    let dave = PartyId::new("dave");

    println!(
        "{}",
        format!("⛏️  Mining at difficulty {}", ledger.difficulty()).bright_cyan()
    );

    // Clients place orders.
    for (order_id, product, client) in [(1, "chips", &alice), (2, "biscuit", &bob)] {
        ledger.add_transaction(
            Transaction::now(order_id, product, OrderStatus::Ordered)
                .with_manufacturer(manufacturer.clone())
                .with_client(client.clone()),
        );
    }
    ledger.mine_pending()?;

    // A distributor picks up order 1 and ships it on.
    ledger.add_transaction(
        Transaction::now(1, "chips", OrderStatus::InTransitToDistributor)
            .with_manufacturer(manufacturer.clone())
            .with_distributor(dave.clone())
            .with_client(alice.clone()),
    );
    ledger.add_transaction(
        Transaction::now(1, "chips", OrderStatus::InTransitToClient)
            .with_distributor(dave.clone())
            .with_client(alice.clone()),
    );
    ledger.mine_pending()?;

    // The client confirms delivery.
    ledger.add_transaction(
        Transaction::now(1, "chips", OrderStatus::Delivered)
            .with_distributor(dave)
            .with_client(alice),
    );
    ledger.mine_pending()?;

    print_chain(&ledger);

    for order_id in [1, 2] {
        if let Some(receipt) = ledger.order_receipt(order_id) {
            println!(
                "{} {}",
                format!("📦 Order {}:", order_id).bright_yellow(),
                receipt.to_json()?
            );
        }
    }

    match ledger.validate_chain() {
        Ok(()) => println!("{}", "✅ Chain is valid".bright_green().bold()),
        Err(e) => println!("{}", format!("❌ {}", e).red().bold()),
    }
    Ok(())
}

fn print_chain(ledger: &Ledger) {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(
            ["Block", "Hash", "Nonce", "Order", "Product", "Status"]
                .into_iter()
                .map(|h| {
                    Cell::new(h)
                        .fg(TableColor::Cyan)
                        .add_attribute(Attribute::Bold)
                }),
        );

    for (height, block) in ledger.blocks().iter().enumerate() {
        let hash = block.hash_str();
        for tx in block.transactions() {
            table.add_row(vec![
                Cell::new(format!("#{}", height)).fg(TableColor::White),
                Cell::new(format!("{}…", &hash[..16])).fg(TableColor::Grey),
                Cell::new(block.nonce()).fg(TableColor::Grey),
                Cell::new(tx.order_id()).fg(TableColor::White),
                Cell::new(tx.product_name()).fg(TableColor::White),
                Cell::new(tx.status()).fg(status_color(tx.status())),
            ]);
        }
    }

    println!("{}", table);
}

fn status_color(status: OrderStatus) -> TableColor {
    match status {
        OrderStatus::Ordered => TableColor::Yellow,
        OrderStatus::InTransitToDistributor | OrderStatus::InTransitToClient => {
            TableColor::Magenta
        }
        OrderStatus::Delivered => TableColor::Green,
    }
}
