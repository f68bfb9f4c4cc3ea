// ---------------------------------------------------------------------------
// Active listing
// ---------------------------------------------------------------------------

/// A currently-available listing parsed from a findItemsByKeywords response.
/// All amounts are in the marketplace currency (GBP for EBAY-GB).
#[derive(Debug, Clone)]
pub struct ActiveListing {
    pub title: String,
    pub item_id: String,
    pub url: String,
    pub price: f64,
    pub shipping: f64,
}

impl ActiveListing {
    /// Total acquisition cost: item price plus inbound shipping.
    pub fn buy_price(&self) -> f64 {
        self.price + self.shipping
    }
}

// ---------------------------------------------------------------------------
// Fee model and acceptance thresholds
// ---------------------------------------------------------------------------

/// Seller-side cost parameters applied against the median sold price.
#[derive(Debug, Clone, Copy)]
pub struct FeeModel {
    /// Marketplace final-value fee as a fraction of sale price.
    pub marketplace_fee_rate: f64,
    /// Payment processing fee as a fraction of sale price.
    pub payment_fee_rate: f64,
    /// Fixed per-transaction payment fee.
    pub payment_fixed_fee: f64,
    /// Cost of shipping the item to the eventual buyer.
    pub outbound_shipping_cost: f64,
}

impl Default for FeeModel {
    fn default() -> Self {
        use crate::config::default_fees::*;
        Self {
            marketplace_fee_rate: EBAY_FEE_RATE,
            payment_fee_rate: PAYMENT_FEE_RATE,
            payment_fixed_fee: PAYMENT_FIXED_FEE,
            outbound_shipping_cost: SHIPPING_OUT,
        }
    }
}

/// Accept/reject bounds for the estimator. Both must hold simultaneously.
#[derive(Debug, Clone, Copy)]
pub struct Thresholds {
    pub min_profit: f64,
    pub min_margin: f64,
}

impl Default for Thresholds {
    fn default() -> Self {
        use crate::config::thresholds::*;
        Self {
            min_profit: MIN_PROFIT_GBP,
            min_margin: MIN_MARGIN,
        }
    }
}

// ---------------------------------------------------------------------------
// Opportunity row
// ---------------------------------------------------------------------------

/// One accepted (keyword, active listing) pair, ready for the CSV report.
/// Currency fields are rounded to 2 dp, margin_percent to 1 dp.
#[derive(Debug, Clone, PartialEq)]
pub struct OpportunityRow {
    pub keyword: String,
    pub active_title: String,
    pub active_item_id: String,
    pub active_url: String,
    pub active_buy_price_gbp: f64,
    pub median_sold_price_gbp: f64,
    pub sold_sample_size: usize,
    pub ebay_fee_gbp: f64,
    pub payment_fee_gbp: f64,
    pub shipping_out_gbp: f64,
    pub expected_profit_gbp: f64,
    pub margin_percent: f64,
}
