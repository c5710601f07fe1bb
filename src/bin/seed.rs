//! Gives a user the starter pack of shared clips, straight against the
//! database.

use std::process::ExitCode;
use std::sync::Arc;

use clap::Parser;

use vsdeck::config::Config;
use vsdeck::db::{self, SqliteSoundRepository, SqliteStreamDeckKeyRepository};
use vsdeck::seed::provision_starter_pack;

#[derive(Parser)]
#[command(name = "vsdeck-seed", about = "Provision the starter sound pack for a user")]
struct Args {
    /// Id of the user receiving the clips.
    user_id: String,

    /// Database to write to. Defaults to `DATABASE_URL`.
    #[arg(long)]
    database_url: Option<String>,

    /// Base of the published object URLs. Defaults to `VSD_PUBLIC_URL`.
    #[arg(long)]
    public_url: Option<String>,
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "vsdeck=info".into()),
        )
        .init();

    let args = Args::parse();
    let config = Config::from_env();
    let database_url = args.database_url.unwrap_or(config.database_url);
    let public_url = args
        .public_url
        .map(|url| url.trim_end_matches('/').to_string())
        .unwrap_or(config.public_url);

    let pool = match db::create_pool(&database_url).await {
        Ok(pool) => pool,
        Err(e) => {
            eprintln!("failed to open {database_url}: {e}");
            return ExitCode::FAILURE;
        }
    };

    let result = provision_starter_pack(
        Arc::new(SqliteSoundRepository::new(pool.clone())),
        Arc::new(SqliteStreamDeckKeyRepository::new(pool)),
        &public_url,
        &config.bucket,
        &args.user_id,
    )
    .await;

    match result {
        Ok(provisioned) => {
            for outcome in &provisioned {
                println!(
                    "{}\t{}\t{}",
                    outcome.key.position(),
                    outcome.sound.name(),
                    outcome.sound.url()
                );
            }
            eprintln!("seeded {} sound(s) for {}", provisioned.len(), args.user_id);
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("seeding failed: {e}");
            ExitCode::FAILURE
        }
    }
}
