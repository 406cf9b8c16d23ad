//! nsdb CLI
//!
//! Command-line interface for inspecting and editing an nsdb store.

use std::process::ExitCode;

use clap::{Parser, Subcommand};
use nsdb::{Index, Store, Table, Value};
use tracing_subscriber::{fmt, EnvFilter};

/// nsdb CLI
#[derive(Parser, Debug)]
#[command(name = "nsdb-cli")]
#[command(about = "CLI for the nsdb file-per-key store")]
#[command(version)]
struct Args {
    /// Root directory of the store
    #[arg(short, long, default_value = "./nsdb_data")]
    root: String,

    /// Table to operate on
    table: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Print the raw value of a key
    Get {
        /// The key to get
        key: String,
    },

    /// Set a key to a string value
    Set {
        /// The key to set
        key: String,

        /// The value to set
        value: String,
    },

    /// Delete a key
    Del {
        /// The key to delete
        key: String,
    },

    /// Print the entry path of a key if it exists
    Exists {
        /// The key to check
        key: String,
    },

    /// Push a string onto a list
    Push {
        /// The list key
        key: String,

        /// The value to push
        value: String,

        /// Explicit index (appends when omitted)
        #[arg(short, long)]
        index: Option<String>,
    },

    /// Print the elements of a list
    List {
        /// The list key
        key: String,
    },

    /// Print the number of elements in a list
    Count {
        /// The list key
        key: String,
    },

    /// Delete the whole table
    Drop,
}

fn main() -> ExitCode {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn,nsdb=info"));

    fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("{}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(args: Args) -> nsdb::Result<()> {
    let store = Store::open_path(&args.root)?;
    let open = || -> nsdb::Result<Table> {
        store.init()?;
        store.table(&args.table)
    };

    match args.command {
        Commands::Get { key } => match open()?.get_value(&key)? {
            Some(bytes) => println!("{}", String::from_utf8_lossy(&bytes)),
            None => println!("(nil)"),
        },
        Commands::Set { key, value } => {
            open()?.set_string(&key, &value)?;
            println!("OK");
        }
        Commands::Del { key } => {
            open()?.unset(&key)?;
            println!("OK");
        }
        Commands::Exists { key } => match open()?.exists(&key)? {
            Some(path) => println!("{}", path.display()),
            None => println!("(nil)"),
        },
        Commands::Push { key, value, index } => {
            let index = open()?.push_array(&key, value, index.map(Index::from))?;
            println!("{}", index);
        }
        Commands::List { key } => match open()?.get_array(&key)? {
            Some(array) => {
                for (index, value) in array.iter() {
                    println!("{} => {}", index, describe(value));
                }
            }
            None => println!("(nil)"),
        },
        Commands::Count { key } => println!("{}", open()?.count_array(&key)?),
        Commands::Drop => {
            let removed = store.drop_table(&args.table)?;
            println!("removed {} files", removed);
        }
    }

    Ok(())
}

fn describe(value: &Value) -> String {
    match value {
        Value::Null => "null".to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Int(i) => i.to_string(),
        Value::Float(f) => f.to_string(),
        Value::Str(s) => format!("{:?}", s),
        Value::Bytes(b) => format!("<{} bytes>", b.len()),
        Value::Array(a) => format!("[array of {}]", a.len()),
    }
}
