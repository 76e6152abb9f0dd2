use std::error::Error;
use std::fs;
use std::path::Path;
use std::process::exit;
use std::sync::{Arc, Mutex};

use clap::Parser;
use rusqlite::Connection;

use sales_report::{SQLiteTransactionStore, TransactionStore, initialize_db, parse_feed};

/// A utility for creating a test database for the sales report server.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// File path to save the SQLite database to.
    #[arg(long, short)]
    output_path: String,

    /// File path to a local copy of the JSON transaction feed.
    #[arg(long, short)]
    feed_path: String,
}

/// Create and populate a database for manual testing.
fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();

    let output_path = Path::new(&args.output_path);

    match output_path.extension() {
        None => {
            eprintln!("Output path must include a file extension (e.g., 'my_database.db').");
            exit(1);
        }
        Some(extension) if extension.is_empty() => {
            eprintln!("Output path must include a file extension (e.g., 'my_database.db').");
            exit(1);
        }
        _ => {}
    }

    if output_path.is_file() {
        eprintln!("File already exists at {output_path:#?}!");
        exit(1);
    }

    println!("Reading feed from {:#?}", args.feed_path);
    let transactions = parse_feed(&fs::read(&args.feed_path)?)?;

    println!("Creating database at {output_path:#?}");
    let conn = Connection::open(output_path)?;

    initialize_db(&conn)?;

    println!("Inserting {} transactions...", transactions.len());
    let store = SQLiteTransactionStore::new(Arc::new(Mutex::new(conn)));
    let count = store.replace_all(transactions)?;

    println!("Success! Stored {count} transactions.");

    Ok(())
}
