//! Clinic queue server binary

use anyhow::Result;
use clap::Parser;
use clinic_queue_engine::config::ClinicConfig;
use clinic_queue_engine::server::ClinicServerBuilder;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "clinic-queued", about = "Clinic walk-in queue server")]
struct Args {
    /// Address to listen on (e.g. 127.0.0.1:8080)
    #[arg(long)]
    bind: Option<std::net::SocketAddr>,

    /// SQLite database URL (e.g. sqlite://clinic.db?mode=rwc)
    #[arg(long)]
    database: Option<String>,

    /// Use a throwaway in-memory database
    #[arg(long)]
    in_memory: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();

    let mut config = ClinicConfig::from_env();
    if let Some(bind) = args.bind {
        config.general.bind_addr = bind;
    }
    if let Some(database) = args.database {
        config.database.database_url = database;
    }

    let mut builder = ClinicServerBuilder::new().with_config(config);
    if args.in_memory {
        builder = builder.with_in_memory_database();
    }

    let server = builder.build().await?;
    server.run().await?;

    Ok(())
}
