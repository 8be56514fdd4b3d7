//! `collect` command: idempotent intake of listing URLs.

use std::path::{Path, PathBuf};
use std::str::FromStr;

use clipcart_core::{CollectedProduct, Track};

/// Gathers URLs from the positional argument, `--urls`, and `--file`,
/// de-duplicates them preserving order, and inserts each if absent.
/// Re-collecting a URL is a no-op that reports the existing row unless
/// `--update` asks for an in-place refresh.
#[allow(clippy::too_many_arguments)]
pub(crate) async fn run_collect(
    pool: &sqlx::PgPool,
    origin_url: Option<String>,
    urls: Vec<String>,
    file: Option<PathBuf>,
    title: Option<&str>,
    track: &str,
    affiliate_url: Option<&str>,
    update: bool,
) -> anyhow::Result<()> {
    let track = Track::from_str(track)
        .map_err(|_| anyhow::anyhow!("track must be AUTO or MANUAL, got '{track}'"))?;

    let mut gathered: Vec<String> = Vec::new();
    if let Some(url) = origin_url {
        gathered.push(url);
    }
    gathered.extend(urls);
    if let Some(path) = file {
        gathered.extend(read_urls_from_file(&path)?);
    }

    let gathered = normalize_urls(gathered);
    if gathered.is_empty() {
        anyhow::bail!("no URLs provided; pass a URL, --urls, or --file");
    }

    let collected_date = chrono::Utc::now().format("%Y%m%d").to_string();
    for url in &gathered {
        let mut product = CollectedProduct::pending(url, title, track);
        product.collected_date.clone_from(&collected_date);
        if let Some(affiliate_url) = affiliate_url {
            product.affiliate_url = Some(affiliate_url.to_string());
        }

        let (row, created) = if update {
            (clipcart_db::upsert_product(pool, &product).await?, false)
        } else {
            clipcart_db::insert_product_if_absent(pool, &product).await?
        };

        if let Some(affiliate_url) = affiliate_url {
            clipcart_db::upsert_affiliate_link(pool, row.id, affiliate_url, None, None, None, true)
                .await?;
        }

        if created {
            println!("INSERTED {}", row.origin_url);
        } else if update {
            println!("UPDATED {}", row.origin_url);
        } else {
            println!("EXISTS {}", row.origin_url);
        }
    }

    Ok(())
}

/// Reads one URL per line, skipping blanks and `#` comments.
fn read_urls_from_file(path: &Path) -> anyhow::Result<Vec<String>> {
    let content = std::fs::read_to_string(path)
        .map_err(|e| anyhow::anyhow!("failed to read {}: {e}", path.display()))?;
    Ok(content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(str::to_string)
        .collect())
}

/// De-duplicates URLs preserving first-seen order.
fn normalize_urls(urls: Vec<String>) -> Vec<String> {
    let mut seen = std::collections::HashSet::new();
    urls.into_iter().filter(|u| seen.insert(u.clone())).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_preserves_order_and_drops_duplicates() {
        let urls = vec![
            "https://site/b".to_string(),
            "https://site/a".to_string(),
            "https://site/b".to_string(),
        ];
        assert_eq!(
            normalize_urls(urls),
            vec!["https://site/b".to_string(), "https://site/a".to_string()]
        );
    }

    #[test]
    fn file_parsing_skips_comments_and_blanks() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("urls.txt");
        std::fs::write(&path, "# seed list\nhttps://site/a\n\n  https://site/b  \n").unwrap();

        let urls = read_urls_from_file(&path).unwrap();
        assert_eq!(
            urls,
            vec!["https://site/a".to_string(), "https://site/b".to_string()]
        );
    }
}
