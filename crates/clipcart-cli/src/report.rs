//! `report` command: per-status counts for operator visibility.

pub(crate) async fn run_report(pool: &sqlx::PgPool) -> anyhow::Result<()> {
    let report = clipcart_db::status_report(pool).await?;

    println!("products:");
    print_counts(&report.products);
    println!("video assets:");
    print_counts(&report.video_assets);
    println!("upload logs:");
    print_counts(&report.upload_logs);

    Ok(())
}

fn print_counts(counts: &[clipcart_db::StatusCount]) {
    if counts.is_empty() {
        println!("  (none)");
        return;
    }
    for entry in counts {
        println!("  {:<20} {}", entry.status, entry.count);
    }
}
