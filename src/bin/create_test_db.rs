use std::error::Error;
use std::path::Path;
use std::process::exit;
use std::sync::{Arc, Mutex};

use clap::Parser;
use rusqlite::Connection;
use time::{Date, Duration, OffsetDateTime, macros::time};

use ledgerly::{
    SQLiteTransactionStore, Transaction, TransactionStore, TransactionType, initialize_db,
};

/// A utility for creating a test database for the Ledgerly server.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// File path to save the SQLite database to.
    #[arg(long, short)]
    output_path: String,

    /// How many months of transactions to generate, ending with the current month.
    #[arg(long, short, default_value_t = 6)]
    months: u8,
}

/// (type, amount, day of month, category, description) for each transaction in a month.
const MONTHLY_TRANSACTIONS: [(TransactionType, f64, u8, &str, &str); 12] = [
    (TransactionType::Income, 5200.0, 1, "Salary", "Monthly salary"),
    (TransactionType::Expense, 1850.0, 1, "Rent", "Apartment rent"),
    (TransactionType::Expense, 142.37, 3, "Food", "Weekly groceries"),
    (TransactionType::Expense, 64.5, 6, "Transport", "Fuel"),
    (TransactionType::Expense, 118.9, 10, "Food", "Weekly groceries"),
    (TransactionType::Expense, 210.0, 12, "Bills", "Electricity"),
    (TransactionType::Income, 750.0, 14, "Freelance", "Website contract"),
    (TransactionType::Expense, 45.0, 15, "Entertainment", "Concert tickets"),
    (TransactionType::Expense, 96.15, 17, "Food", "Weekly groceries"),
    (TransactionType::Expense, 89.99, 20, "Shopping", "Running shoes"),
    (TransactionType::Expense, 60.0, 22, "Health", "Pharmacy"),
    (TransactionType::Income, 32.4, 28, "Investment", "Dividends"),
];

/// Create and populate a database for manual testing.
fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();

    let output_path = Path::new(&args.output_path);

    match output_path.extension() {
        Some(extension) if !extension.is_empty() => {}
        _ => {
            eprintln!("Output path must include a file extension (e.g., 'my_database.db').");
            exit(1);
        }
    }

    if output_path.is_file() {
        eprintln!("File already exists at {output_path:#?}!");
        exit(1);
    }

    println!("Creating database at {output_path:#?}");
    let conn = Connection::open(output_path)?;

    initialize_db(&conn)?;

    let store = SQLiteTransactionStore::new(Arc::new(Mutex::new(conn)));
    let today = OffsetDateTime::now_utc().date();
    let mut month_start = today.replace_day(1)?;
    let mut count = 0;

    println!("Creating transactions for the last {} months...", args.months);

    for _ in 0..args.months {
        for (type_, amount, day, category, description) in MONTHLY_TRANSACTIONS {
            let date = month_start.replace_day(day)?;

            if date > today {
                continue;
            }

            store.insert(
                Transaction::build(type_, amount, midday(date))
                    .category(category)
                    .description(description),
            )?;
            count += 1;
        }

        month_start = (month_start - Duration::days(1)).replace_day(1)?;
    }

    println!("Created {count} transactions. Success!");

    Ok(())
}

fn midday(date: Date) -> OffsetDateTime {
    date.with_time(time!(12:00)).assume_utc()
}
