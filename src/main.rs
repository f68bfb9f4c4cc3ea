mod config;
mod error;
mod estimator;
mod fetcher;
mod parser;
mod report;
mod types;

use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use crate::config::Config;
use crate::error::Result;
use crate::estimator::compute_row;
use crate::fetcher::FindingClient;
use crate::types::{ActiveListing, FeeModel, OpportunityRow, Thresholds};

#[tokio::main]
async fn main() {
    let cfg = match Config::from_env() {
        Ok(c) => c,
        Err(e) => {
            // Caller misconfiguration, reported before any network activity.
            eprintln!("Config error: {e}");
            std::process::exit(2);
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(&cfg.log_level))
        .init();

    if let Err(e) = run(cfg).await {
        error!("Fatal error: {e}");
        std::process::exit(1);
    }
}

async fn run(cfg: Config) -> Result<()> {
    let client = FindingClient::new(&cfg)?;
    let thresholds = Thresholds::default();

    info!(
        "Scanning {} keyword(s) on {} (active_limit={}, sold_limit={}, lookback={}d)",
        cfg.keywords.len(),
        cfg.global_id,
        cfg.active_limit,
        cfg.sold_limit,
        cfg.lookback_days,
    );

    let mut rows: Vec<OpportunityRow> = Vec::new();

    for keyword in &cfg.keywords {
        let scan = scan_keyword(&client, &cfg, keyword).await;
        append_keyword_rows(&mut rows, keyword, scan, &cfg.fees, &thresholds);
    }

    report::write_report(&cfg.output, &rows)?;
    info!("Wrote {} row(s) to {}", rows.len(), cfg.output);

    Ok(())
}

/// Fold one keyword's scan outcome into the accumulated rows. A fetch
/// failure is logged and contributes zero rows; it never halts the batch.
fn append_keyword_rows(
    rows: &mut Vec<OpportunityRow>,
    keyword: &str,
    scan: Result<(Vec<ActiveListing>, Vec<f64>)>,
    fees: &FeeModel,
    thresholds: &Thresholds,
) {
    let (active_items, sold_totals) = match scan {
        Ok(pair) => pair,
        Err(e) => {
            warn!("[{keyword}] fetch failed, skipping: {e}");
            return;
        }
    };

    let before = rows.len();
    for active in &active_items {
        if let Some(row) = compute_row(keyword, active, &sold_totals, fees, thresholds) {
            rows.push(row);
        }
    }
    info!(
        "[{keyword}] {} active, {} sold totals, {} opportunities",
        active_items.len(),
        sold_totals.len(),
        rows.len() - before,
    );
}

/// Fetch both sides of one keyword: active listings (single page) and the
/// paged sold sample. Either failure aborts the whole keyword.
async fn scan_keyword(
    client: &FindingClient,
    cfg: &Config,
    keyword: &str,
) -> Result<(Vec<ActiveListing>, Vec<f64>)> {
    let active = client.find_active(keyword, cfg.active_limit).await?;
    let sold = client
        .find_sold_totals(keyword, cfg.sold_limit, cfg.lookback_days)
        .await?;
    Ok((active, sold))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AppError;

    fn listing(price: f64) -> ActiveListing {
        ActiveListing {
            title: "Nintendo Game Boy".to_string(),
            item_id: "256001234567".to_string(),
            url: "https://www.ebay.co.uk/itm/256001234567".to_string(),
            price,
            shipping: 0.0,
        }
    }

    #[test]
    fn failed_keyword_contributes_zero_rows_and_later_keywords_proceed() {
        let fees = FeeModel::default();
        let thresholds = Thresholds::default();
        let mut rows = Vec::new();

        append_keyword_rows(
            &mut rows,
            "good one",
            Ok((vec![listing(20.0)], vec![80.0, 85.0, 90.0])),
            &fees,
            &thresholds,
        );
        append_keyword_rows(
            &mut rows,
            "bad one",
            Err(AppError::Api("10001: Service call has exceeded limit.".to_string())),
            &fees,
            &thresholds,
        );
        append_keyword_rows(
            &mut rows,
            "another good one",
            Ok((vec![listing(20.0)], vec![80.0, 85.0, 90.0])),
            &fees,
            &thresholds,
        );

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].keyword, "good one");
        assert_eq!(rows[1].keyword, "another good one");
        assert!(rows.iter().all(|r| r.keyword != "bad one"));
    }

    #[test]
    fn empty_scan_results_are_not_errors() {
        let fees = FeeModel::default();
        let thresholds = Thresholds::default();
        let mut rows = Vec::new();

        // No active listings, and an empty sold sample against a real
        // listing: both contribute zero rows without failing.
        append_keyword_rows(&mut rows, "kw", Ok((vec![], vec![85.0])), &fees, &thresholds);
        append_keyword_rows(&mut rows, "kw", Ok((vec![listing(20.0)], vec![])), &fees, &thresholds);

        assert!(rows.is_empty());
    }
}
