//! Bootstrap: first-start checks.

use crate::config::ServerConfig;

/// Refuse to start on a config that cannot work.
pub fn verify_config(config: &ServerConfig) -> anyhow::Result<()> {
    if config.nonce.secret.is_empty() {
        anyhow::bail!("Nonce secret is empty in configuration.");
    }
    if config.nonce.lifetime_secs < 2 {
        anyhow::bail!("Nonce lifetime_secs must be at least 2.");
    }
    if config.storage.data_dir.is_empty() {
        anyhow::bail!("Storage data_dir is empty in configuration.");
    }
    Ok(())
}
