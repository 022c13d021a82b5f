mod app;
mod config;
mod handlers;
mod identities;
mod server;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use taramock_oidc::{OidcState, SigningKeys};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::{app::create_app, config::Config, identities::load_identities};

/// TARA-Mock - OpenID Connect identity provider mock for local development
#[derive(Parser, Debug)]
#[command(name = "taramock")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Path to the JSON configuration file
    #[arg(long, default_value = "config.json", env = "TARAMOCK_CONF")]
    conf: PathBuf,

    /// Host address to bind the server to (overrides the config file)
    #[arg(long, short = 'H', env = "HOST")]
    host: Option<String>,

    /// Port to listen on (overrides the config file)
    #[arg(long, short, env = "PORT")]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = Config::load(&cli.conf)?.with_overrides(cli.host, cli.port);

    // RUST_LOG wins over the configured level
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.log_level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!(conf = %cli.conf.display(), issuer = %config.issuer, "Loaded configuration");

    let keys = SigningKeys::load(
        config.id_token_key_id.clone(),
        &config.id_token_priv_key_path,
        &config.id_token_pub_key_path,
    )
    .context("failed to load ID token signing keys")?;

    let identities = load_identities(&config.identities_file)?;

    let state = OidcState::new(config.oidc_config(), keys, identities);
    let app = create_app(state, &config.static_dir);

    server::serve(app, &config).await?;

    tracing::info!("Server stopped");
    Ok(())
}
