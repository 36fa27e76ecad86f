//! likesd: likes server.
//!
//! Usage:
//!   likesd -c <context-name>     # loads /etc/likes/<name>.toml
//!   likesd -c /path/to/config.toml
//!   likesd -c dev.toml --in-memory --locale de

mod bootstrap;
mod config;
mod routes;

use std::sync::Arc;
use std::time::Duration;

use anyhow::anyhow;
use clap::Parser;
use likes::{LikesModule, LikesService};
use likes_content::{
    ContentRepository, ContentWriter, MemoryRepository, PostTypeRegistry, RedbRepository,
};
use likes_core::{HmacNonces, HookRegistry, I18nStore, Module, NonceVerifier};
use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::config::ServerConfig;

#[derive(Parser)]
#[command(name = "likesd", about = "Likes server")]
struct Cli {
    /// Context name or path to config file.
    #[arg(short = 'c', long = "config")]
    config: String,

    /// Override listen address.
    #[arg(long)]
    listen: Option<String>,

    /// Override the configured locale.
    #[arg(long)]
    locale: Option<String>,

    /// Keep records in memory instead of the redb file.
    #[arg(long)]
    in_memory: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let cli = Cli::parse();

    let config_path = ServerConfig::resolve_path(&cli.config);
    info!("Loading config from {}", config_path.display());
    let server_config = ServerConfig::load(&config_path)?;
    bootstrap::verify_config(&server_config)?;

    let core_config = server_config.service_config(cli.listen.clone());

    let repo: Arc<dyn ContentRepository> = if cli.in_memory {
        info!("Using in-memory content store");
        Arc::new(MemoryRepository::new())
    } else {
        let db_path = core_config.resolve_db_path();
        if let Some(parent) = db_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        info!("Opening content store at {}", db_path.display());
        Arc::new(
            RedbRepository::open(&db_path)
                .map_err(|e| anyhow!("failed to open content store: {e}"))?,
        )
    };

    let nonces: Arc<dyn NonceVerifier> = Arc::new(HmacNonces::new(
        server_config.nonce.secret.as_bytes(),
        Duration::from_secs(server_config.nonce.lifetime_secs),
    )?);

    let i18n = Arc::new(I18nStore::new(&server_config.i18n.locale));
    if let Some(locale) = &cli.locale {
        i18n.set_locale(locale);
    }
    let i18n_dir = core_config.resolve_i18n_dir();
    let catalogs = i18n.load_dir(&i18n_dir)?;
    info!(locale = %i18n.locale(), catalogs, "Translations loaded from {}", i18n_dir.display());

    let hooks = Arc::new(HookRegistry::new());
    let post_types = Arc::new(PostTypeRegistry::new());
    let writer = Arc::new(ContentWriter::new(Arc::clone(&repo), Arc::clone(&hooks)));

    let likes = LikesModule::new(
        LikesService::new(repo, nonces, i18n),
        writer,
        Arc::clone(&hooks),
        Arc::clone(&post_types),
    );

    let modules: Vec<&dyn Module> = vec![&likes];
    for module in &modules {
        module.register(&hooks);
    }
    info!(types = ?post_types.names(), "Record types registered");

    let app = routes::build_router(modules.iter().map(|m| (m.name(), m.routes())).collect());

    info!("Listening on {}", core_config.listen);
    let listener = tokio::net::TcpListener::bind(&core_config.listen).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
