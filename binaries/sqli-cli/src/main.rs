//! SQL Injection Lab CLI
//!
//! ## Usage
//!
//! ```bash
//! sqli-lab serve                          # Start on http://127.0.0.1:3000
//! sqli-lab serve --port 8080 --db lab.db  # Custom port and database
//! sqli-lab seed                           # Recreate the demo database
//! sqli-lab detect "admin' OR '1'='1"      # Classify a string
//! sqli-lab routes                         # Print the route table
//! ```

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use sqli_config::LabConfig;
use sqli_core::Detector;
use sqli_db::UserStore;
use sqli_web::{serve, AppState};

const DEFAULT_LOG_FILTER: &str = "sqli_web=info,sqli_core=info,sqli_db=info,tower_http=info";

#[derive(Parser)]
#[command(name = "sqli-lab")]
#[command(about = "SQL Injection Lab - vulnerable vs parameterized login with live attack monitoring")]
#[command(version)]
struct Cli {
    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    log_json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the web server
    Serve {
        /// Host to bind to
        #[arg(long)]
        host: Option<String>,

        /// Port to listen on
        #[arg(short, long)]
        port: Option<u16>,

        /// SQLite database file
        #[arg(long)]
        db: Option<PathBuf>,

        /// YAML config file
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Maximum number of attempts kept in the log
        #[arg(long)]
        capacity: Option<usize>,

        /// Do not create the users table on startup
        #[arg(long)]
        no_seed: bool,
    },

    /// Drop and recreate the demo users table
    Seed {
        /// SQLite database file
        #[arg(long)]
        db: Option<PathBuf>,

        /// YAML config file
        #[arg(short, long)]
        config: Option<PathBuf>,
    },

    /// Run the injection detector over a string
    Detect {
        /// Text to classify
        text: String,
    },

    /// Print the HTTP route table
    Routes,
}

fn init_tracing(json: bool) {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| DEFAULT_LOG_FILTER.into());
    let registry = tracing_subscriber::registry().with(filter);

    if json {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.log_json);

    match cli.command {
        Commands::Serve { host, port, db, config, capacity, no_seed } => {
            cmd_serve(host, port, db, config, capacity, no_seed).await
        }
        Commands::Seed { db, config } => cmd_seed(db, config),
        Commands::Detect { text } => cmd_detect(&text),
        Commands::Routes => {
            sqli_web::routes::print_routes();
            Ok(())
        }
    }
}

async fn cmd_serve(
    host: Option<String>,
    port: Option<u16>,
    db: Option<PathBuf>,
    config: Option<PathBuf>,
    capacity: Option<usize>,
    no_seed: bool,
) -> Result<()> {
    let mut config = LabConfig::load(config.as_deref())?;

    // Flags win over file and environment
    if let Some(host) = host {
        config.host = host;
    }
    if let Some(port) = port {
        config.port = port;
    }
    if let Some(db) = db {
        config.database_path = db;
    }
    if let Some(capacity) = capacity {
        config.log_capacity = capacity;
    }
    if no_seed {
        config.seed_on_start = false;
    }
    config.validate()?;

    let addr = config.bind_addr();

    println!(
        r#"
+------------------------------------------------------------+
|                                                            |
|                    SQL INJECTION LAB                       |
|          vulnerable vs parameterized login demo            |
|                                                            |
+------------------------------------------------------------+
"#
    );

    let state = Arc::new(AppState::from_config(&config)?);
    tracing::info!(
        db = %config.database_path.display(),
        capacity = config.log_capacity,
        "lab state ready"
    );

    sqli_web::routes::print_routes();

    println!("Lab:       http://{}", addr);
    println!("Dashboard: http://{}/monitor", addr);
    println!();

    serve(state, &addr).await?;
    Ok(())
}

fn cmd_seed(db: Option<PathBuf>, config: Option<PathBuf>) -> Result<()> {
    let mut config = LabConfig::load(config.as_deref())?;
    if let Some(db) = db {
        config.database_path = db;
    }

    let store = UserStore::open(&config.database_path)?;
    store.seed()?;

    println!(
        "Seeded {} with {} users",
        config.database_path.display(),
        store.count_users()?
    );
    for (username, password, role) in sqli_db::SEED_USERS {
        println!("  {:10} {:10} {}", username, password, role);
    }
    Ok(())
}

fn cmd_detect(text: &str) -> Result<()> {
    let detection = Detector::new().detect(text);

    if detection.is_attack() {
        println!("ATTACK: {} rule(s) matched", detection.matched_rules().len());
        for rule in detection.matched_rules() {
            println!("  - {}", rule);
        }
    } else {
        println!("clean: no rules matched");
    }
    Ok(())
}
