//! RocketShoes CLI - Inspect and edit the local cart.
//!
//! # Usage
//!
//! ```bash
//! # Show the cart with subtotals and total
//! rs-cli show
//!
//! # Add one unit of product 3
//! rs-cli add 3
//!
//! # Set product 3 to two units
//! rs-cli update 3 2
//!
//! # Remove product 3
//! rs-cli remove 3
//! ```
//!
//! # Commands
//!
//! - `show` - Print the cart (`--json` prints the stored representation)
//! - `add` - Add one unit of a product
//! - `remove` - Remove a product's line
//! - `update` - Set a product's amount
//!
//! Configuration comes from `ROCKETSHOES_*` environment variables (see
//! `rocketshoes_cart::config`). Set `ROCKETSHOES_LOG_JSON=1` for JSON logs.

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;

#[derive(Parser)]
#[command(name = "rs-cli")]
#[command(author, version, about = "RocketShoes cart tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the current cart
    Show {
        /// Print the stored JSON instead of a table
        #[arg(long)]
        json: bool,
    },
    /// Add one unit of a product
    Add {
        /// Product ID
        product_id: i32,
    },
    /// Remove a product from the cart
    Remove {
        /// Product ID
        product_id: i32,
    },
    /// Set the amount of a product already in the cart
    Update {
        /// Product ID
        product_id: i32,

        /// New amount (0 is ignored)
        amount: u32,
    },
}

#[tokio::main]
async fn main() {
    // Defaults to info level for our crates if RUST_LOG is not set
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "rocketshoes_cart=info,rocketshoes_cli=info".into());

    // JSON lines for log collectors, text for terminals; both go to stderr
    let json_logs = std::env::var("ROCKETSHOES_LOG_JSON").is_ok_and(|v| v == "1" || v == "true");
    let json_layer = json_logs.then(|| {
        tracing_subscriber::fmt::layer()
            .json()
            .flatten_event(true)
            .with_writer(std::io::stderr)
    });
    let text_layer = (!json_logs).then(|| tracing_subscriber::fmt::layer().with_writer(std::io::stderr));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(json_layer)
        .with(text_layer)
        .init();

    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), commands::CommandError> {
    let session = commands::Session::from_env()?;

    match cli.command {
        Commands::Show { json } => session.show(json).await?,
        Commands::Add { product_id } => session.add(product_id.into()).await?,
        Commands::Remove { product_id } => session.remove(product_id.into()).await?,
        Commands::Update { product_id, amount } => {
            session.update(product_id.into(), amount).await?;
        }
    }
    Ok(())
}
