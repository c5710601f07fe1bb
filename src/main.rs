use tokio::net::TcpListener;

use vsdeck::config::Config;
use vsdeck::state::AppState;
use vsdeck::storage::LocalSoundStorage;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "vsdeck=debug,tower_http=debug".into()),
        )
        .init();

    let config = Config::from_env();
    print_banner(&config);

    let db = vsdeck::db::create_pool(&config.database_url)
        .await
        .expect("failed to create database pool");

    let storage = LocalSoundStorage::new(&config.storage_path, &config.bucket, &config.public_url);
    if let Err(e) = storage.ensure_layout().await {
        tracing::error!(path = ?config.storage_path, "failed to prepare storage: {e}");
    }

    let state = AppState::new(db, &config);
    let app = vsdeck::routes::router(state);

    let listener = TcpListener::bind(("0.0.0.0", config.port))
        .await
        .expect("failed to bind");

    let actual_port = listener
        .local_addr()
        .expect("failed to get local address")
        .port();
    eprintln!("  \x1b[32m→ listening on 0.0.0.0:{actual_port}\x1b[0m");
    eprintln!();

    axum::serve(listener, app).await.expect("server error");
}

fn print_banner(config: &Config) {
    let version = env!("CARGO_PKG_VERSION");

    eprintln!();
    eprintln!("  \x1b[1;36mvsdeck\x1b[0m \x1b[2mv{version}\x1b[0m");
    eprintln!();
    eprintln!("  \x1b[2mport\x1b[0m         {}", config.port);
    eprintln!("  \x1b[2mdatabase\x1b[0m     {}", config.database_url);
    eprintln!("  \x1b[2mstorage\x1b[0m      {}", config.storage_path.display());
    eprintln!("  \x1b[2mbucket\x1b[0m       {}", config.bucket);
    eprintln!("  \x1b[2mpublic url\x1b[0m   {}", config.public_url);
    eprintln!(
        "  \x1b[2mmax upload\x1b[0m   {} bytes",
        config.max_sound_bytes
    );

    if config.seed_enabled {
        eprintln!();
        eprintln!("  \x1b[33m! seed route enabled\x1b[0m");
    }

    eprintln!();
}
