//! `seed-channels` command: upsert channels from the YAML seed file.

use std::path::Path;

pub(crate) async fn run_seed_channels(pool: &sqlx::PgPool, path: &Path) -> anyhow::Result<()> {
    let channels_file = clipcart_core::load_channels(path)?;
    let total = channels_file.channels.len();

    for seed in &channels_file.channels {
        let id = clipcart_db::upsert_channel_seed(pool, seed).await?;
        println!("SEEDED {} [{}] -> {id}", seed.name, seed.platform);
    }

    println!("seeded {total} channels from {}", path.display());
    Ok(())
}
