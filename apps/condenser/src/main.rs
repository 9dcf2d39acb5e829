use anyhow::Result;
use clap::{Parser, Subcommand};
use serde_json::Value;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use condenser::config::Config;
use condenser::db::create_pool;
use condenser::legacy::{build_accounts, build_posts, PgRowSource, RowSource};
use condenser::CondenserError;

#[derive(Parser)]
#[command(name = "condenser")]
#[command(about = "Render hive cache rows as legacy condenser_api objects")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Legacy account objects for the given account names
    Accounts {
        #[arg(required = true)]
        names: Vec<String>,
    },

    /// Legacy post objects for the given post ids, in request order
    Posts {
        #[arg(required = true)]
        ids: Vec<i32>,

        /// Cut bodies to this many characters (0 keeps the full body)
        #[arg(short, long, default_value = "0")]
        truncate_body: usize,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load configuration first (fails on missing required env vars)
    let config = Config::from_env()?;

    // Logs go to stderr so stdout stays valid JSON
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    info!("Starting condenser v{}", env!("CARGO_PKG_VERSION"));

    let pool = create_pool(&config).await?;
    let source = PgRowSource::new(pool);

    match render(&source, cli.command).await {
        Ok(objects) => {
            println!("{}", serde_json::to_string_pretty(&objects)?);
            Ok(())
        }
        Err(e) => {
            println!("{}", serde_json::to_string_pretty(&e.to_error_body())?);
            Err(e.into())
        }
    }
}

async fn render(source: &dyn RowSource, command: Command) -> Result<Value, CondenserError> {
    let objects = match command {
        Command::Accounts { names } => {
            serde_json::to_value(build_accounts(source, &names).await?)
        }
        Command::Posts { ids, truncate_body } => {
            serde_json::to_value(build_posts(source, &ids, truncate_body).await?)
        }
    };
    objects.map_err(|e| CondenserError::Internal(e.into()))
}
