//! CSV report sink. One header row, then one row per accepted
//! opportunity in processing order. The file is written in full at the
//! end of the run, even when no rows qualified.

use std::path::Path;

use crate::error::Result;
use crate::types::OpportunityRow;

const COLUMNS: [&str; 12] = [
    "keyword",
    "active_title",
    "active_item_id",
    "active_url",
    "active_buy_price_gbp",
    "median_sold_price_gbp",
    "sold_sample_size",
    "ebay_fee_gbp",
    "payment_fee_gbp",
    "shipping_out_gbp",
    "expected_profit_gbp",
    "margin_percent",
];

/// Quote a field when it contains a delimiter, quote, or line break;
/// inner quotes are doubled per RFC 4180.
fn csv_field(s: &str) -> String {
    if s.contains(',') || s.contains('"') || s.contains('\n') || s.contains('\r') {
        format!("\"{}\"", s.replace('"', "\"\""))
    } else {
        s.to_string()
    }
}

fn format_row(row: &OpportunityRow) -> String {
    [
        csv_field(&row.keyword),
        csv_field(&row.active_title),
        csv_field(&row.active_item_id),
        csv_field(&row.active_url),
        format!("{:.2}", row.active_buy_price_gbp),
        format!("{:.2}", row.median_sold_price_gbp),
        row.sold_sample_size.to_string(),
        format!("{:.2}", row.ebay_fee_gbp),
        format!("{:.2}", row.payment_fee_gbp),
        format!("{:.2}", row.shipping_out_gbp),
        format!("{:.2}", row.expected_profit_gbp),
        format!("{:.1}", row.margin_percent),
    ]
    .join(",")
}

/// Render the full report as CSV text.
pub fn render(rows: &[OpportunityRow]) -> String {
    let mut out = String::new();
    out.push_str(&COLUMNS.join(","));
    out.push('\n');
    for row in rows {
        out.push_str(&format_row(row));
        out.push('\n');
    }
    out
}

/// Write the report to disk in one shot.
pub fn write_report(path: impl AsRef<Path>, rows: &[OpportunityRow]) -> Result<()> {
    std::fs::write(path, render(rows))?;
    Ok(())
}
