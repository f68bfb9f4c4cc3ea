//! Profitability estimation for one (keyword, active listing) pair.
//!
//! Pure: same inputs always produce the same row or rejection. Fees are
//! charged against the median sold price; rounding happens only when an
//! accepted row is built, never inside the arithmetic.

use crate::types::{ActiveListing, FeeModel, OpportunityRow, Thresholds};

/// Standard statistical median. Even counts average the two middle values.
/// Returns None for an empty sample.
fn median(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.total_cmp(b));
    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        Some((sorted[mid - 1] + sorted[mid]) / 2.0)
    } else {
        Some(sorted[mid])
    }
}

fn round2(x: f64) -> f64 {
    (x * 100.0).round() / 100.0
}

fn round1(x: f64) -> f64 {
    (x * 10.0).round() / 10.0
}

/// Estimate resale profit for an active listing against a sold sample.
/// Returns None when the sample is empty or either acceptance threshold
/// fails; both minimum profit and minimum margin must hold.
pub fn compute_row(
    keyword: &str,
    active: &ActiveListing,
    sold_totals: &[f64],
    fees: &FeeModel,
    thresholds: &Thresholds,
) -> Option<OpportunityRow> {
    let median_sold = median(sold_totals)?;

    let ebay_fee = median_sold * fees.marketplace_fee_rate;
    let payment_fee = median_sold * fees.payment_fee_rate + fees.payment_fixed_fee;

    let buy_price = active.buy_price();
    let expected_profit =
        median_sold - ebay_fee - payment_fee - fees.outbound_shipping_cost - buy_price;

    // Non-positive buy price gets a sentinel margin that can never pass
    // the margin threshold.
    let margin = if buy_price > 0.0 {
        expected_profit / buy_price
    } else {
        -1.0
    };

    if expected_profit < thresholds.min_profit || margin < thresholds.min_margin {
        return None;
    }

    Some(OpportunityRow {
        keyword: keyword.to_string(),
        active_title: active.title.clone(),
        active_item_id: active.item_id.clone(),
        active_url: active.url.clone(),
        active_buy_price_gbp: round2(buy_price),
        median_sold_price_gbp: round2(median_sold),
        sold_sample_size: sold_totals.len(),
        ebay_fee_gbp: round2(ebay_fee),
        payment_fee_gbp: round2(payment_fee),
        shipping_out_gbp: round2(fees.outbound_shipping_cost),
        expected_profit_gbp: round2(expected_profit),
        margin_percent: round1(margin * 100.0),
    })
}
