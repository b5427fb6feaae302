use clap::{Parser, Subcommand};
use miette::{IntoDiagnostic, Result};
use paypal_express::application::facade::CheckoutFacade;
use paypal_express::config::{CheckoutConfig, GatewayConfig};
use paypal_express::domain::ports::{LegacyTransactionLogBox, TransactionStoreBox};
use paypal_express::infrastructure::in_memory::{InMemoryLegacyLog, InMemoryTransactionStore};
use paypal_express::infrastructure::paypal::PayPalGateway;
#[cfg(feature = "storage-rocksdb")]
use paypal_express::infrastructure::rocksdb::RocksDBStore;
use paypal_express::interfaces::csv::transaction_writer::TransactionWriter;
use paypal_express::interfaces::json::checkout_request::CheckoutRequest;
use paypal_express::logging::setup_logging;
use std::fs::File;
use std::io;
use std::path::PathBuf;
use serde::Serialize;
use tracing::warn;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to persistent database (optional). If provided, uses RocksDB.
    #[arg(long, global = true)]
    db_path: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Register a basket with PayPal and print the buyer approval URL
    Initiate {
        /// JSON file holding the basket and any shipping choices
        #[arg(long)]
        basket: PathBuf,
        /// Host used to build the return and cancel URLs
        #[arg(long)]
        host: Option<String>,
    },
    /// Record payer details (and authorize, for AUTHORIZE intent)
    Fetch { token: String },
    /// Capture the order's funds
    Capture { token: String },
    /// Refund the captured amount
    Refund { token: String },
    /// Void an authorization
    Void { token: String },
    /// Print all recorded transactions as CSV, newest first
    List,
    /// Print the legacy NVP audit log as JSON, or a single record by id
    Legacy { id: Option<u64> },
}

struct Stores {
    transactions: TransactionStoreBox,
    legacy: LegacyTransactionLogBox,
    /// Whether records outlive this process.
    persistent: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    setup_logging();

    let stores = open_stores(cli.db_path)?;

    match cli.command {
        Command::Initiate { basket, host } => {
            if !stores.persistent {
                warn!(
                    "No persistent storage configured; the transaction recorded for this checkout will not be kept after exit."
                );
            }
            let facade = checkout_facade(stores.transactions)?;
            let file = File::open(basket).into_diagnostic()?;
            let request = CheckoutRequest::from_reader(file).into_diagnostic()?;
            let approve_url = facade
                .initiate_checkout(
                    &request.basket,
                    request.buyer.as_ref(),
                    request.shipping_address.as_ref(),
                    request.shipping_method.as_ref(),
                    host.as_deref(),
                )
                .await
                .into_diagnostic()?;
            match approve_url {
                Some(url) => println!("{}", url),
                None => miette::bail!("PayPal did not return an approval link"),
            }
        }
        Command::Fetch { token } => {
            let facade = stored_checkout_facade("fetch", stores)?;
            let tx = facade.fetch_transaction_details(&token).await.into_diagnostic()?;
            print_json(&tx)?
        }
        Command::Capture { token } => {
            let facade = stored_checkout_facade("capture", stores)?;
            print_json(&facade.capture_order(&token).await.into_diagnostic()?)?
        }
        Command::Refund { token } => {
            let facade = stored_checkout_facade("refund", stores)?;
            print_json(&facade.refund_order(&token).await.into_diagnostic()?)?
        }
        Command::Void { token } => {
            let facade = stored_checkout_facade("void", stores)?;
            print_json(&facade.void_authorization(&token).await.into_diagnostic()?)?
        }
        // Listing only reads the store, so it needs no gateway credentials.
        Command::List => {
            let transactions = stores.transactions.list().await.into_diagnostic()?;
            let stdout = io::stdout();
            let mut writer = TransactionWriter::new(stdout.lock());
            writer.write_transactions(&transactions).into_diagnostic()?;
        }
        Command::Legacy { id: Some(id) } => {
            match stores.legacy.get(id).await.into_diagnostic()? {
                Some(record) => print_json(&record)?,
                None => miette::bail!("No legacy transaction with id {}", id),
            }
        }
        Command::Legacy { id: None } => {
            print_json(&stores.legacy.list().await.into_diagnostic()?)?
        }
    }

    Ok(())
}

// Token commands act on a transaction written by an earlier `initiate` run.
fn stored_checkout_facade(command: &str, stores: Stores) -> Result<CheckoutFacade> {
    if !stores.persistent {
        miette::bail!("{} needs --db-path with the storage-rocksdb feature", command);
    }
    checkout_facade(stores.transactions)
}

fn checkout_facade(store: TransactionStoreBox) -> Result<CheckoutFacade> {
    let checkout_config = CheckoutConfig::from_env().into_diagnostic()?;
    let gateway_config = GatewayConfig::from_env().into_diagnostic()?;
    let gateway = PayPalGateway::new(gateway_config).into_diagnostic()?;
    Ok(CheckoutFacade::new(checkout_config, Box::new(gateway), store))
}

fn open_stores(db_path: Option<PathBuf>) -> Result<Stores> {
    match db_path {
        #[cfg(feature = "storage-rocksdb")]
        Some(path) => {
            let store = RocksDBStore::open(path).into_diagnostic()?;
            Ok(Stores {
                transactions: Box::new(store.clone()),
                legacy: Box::new(store),
                persistent: true,
            })
        }
        #[cfg(not(feature = "storage-rocksdb"))]
        Some(_) => {
            warn!(
                "Persistent storage requested via --db-path, but the storage-rocksdb feature is not enabled. Falling back to in-memory storage."
            );
            Ok(in_memory_stores())
        }
        None => Ok(in_memory_stores()),
    }
}

fn in_memory_stores() -> Stores {
    Stores {
        transactions: Box::new(InMemoryTransactionStore::new()),
        legacy: Box::new(InMemoryLegacyLog::new()),
        persistent: false,
    }
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value).into_diagnostic()?;
    println!("{}", json);
    Ok(())
}
