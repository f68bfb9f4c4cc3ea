//! Extraction of listing records from Finding API response JSON.
//!
//! The Finding API wraps every scalar and nested object in a one-element
//! array (`"title": ["Game Boy"]`). These helpers normalize that shape at
//! the boundary so nothing downstream ever sees a wrapper.

use serde_json::Value;

use crate::types::ActiveListing;

/// Unwrap the Finding API's one-element-array convention: `field[key][0]`.
/// Absent key, non-array, or empty array all yield None.
pub(crate) fn first<'a>(v: &'a Value, key: &str) -> Option<&'a Value> {
    v.get(key)?.as_array()?.first()
}

/// `field[key][0]` as a string slice.
pub(crate) fn first_str<'a>(v: &'a Value, key: &str) -> Option<&'a str> {
    first(v, key)?.as_str()
}

/// Parse a Finding API money object (`{"@currencyId": "GBP", "__value__": "40.0"}`).
/// The value is usually a string but tolerate a bare number.
fn amount(v: &Value) -> Option<f64> {
    let raw = v.get("__value__")?;
    raw.as_f64().or_else(|| raw.as_str()?.trim().parse().ok())
}

/// Current price of one item record: `sellingStatus[0].currentPrice[0]`.
fn item_price(item: &Value) -> Option<f64> {
    let selling = first(item, "sellingStatus")?;
    amount(first(selling, "currentPrice")?)
}

/// Shipping cost of one item record, defaulting to 0.0 when absent or
/// malformed. A missing shipping figure is never fatal.
fn item_shipping(item: &Value) -> f64 {
    first(item, "shippingInfo")
        .and_then(|info| first(info, "shippingServiceCost"))
        .and_then(amount)
        .unwrap_or(0.0)
}

/// The item array of a search response: `searchResult[0].item[]`.
fn search_items(root: &Value) -> &[Value] {
    first(root, "searchResult")
        .and_then(|sr| sr.get("item"))
        .and_then(|i| i.as_array())
        .map(Vec::as_slice)
        .unwrap_or(&[])
}

/// Parse active listings from a findItemsByKeywords response root.
/// Records with a missing or non-numeric price are dropped silently.
pub fn parse_active_items(root: &Value) -> Vec<ActiveListing> {
    search_items(root)
        .iter()
        .filter_map(|item| {
            let price = item_price(item)?;
            Some(ActiveListing {
                title: first_str(item, "title").unwrap_or("").trim().to_string(),
                item_id: first_str(item, "itemId").unwrap_or("").trim().to_string(),
                url: first_str(item, "viewItemURL").unwrap_or("").trim().to_string(),
                price,
                shipping: item_shipping(item),
            })
        })
        .collect()
}

/// Parse total-paid amounts (price + shipping) from a findCompletedItems
/// response root, in API-returned order.
pub fn parse_sold_totals(root: &Value) -> Vec<f64> {
    search_items(root)
        .iter()
        .filter_map(|item| Some(item_price(item)? + item_shipping(item)))
        .collect()
}

/// Total page count reported by the API: `paginationOutput[0].totalPages[0]`.
/// Defaults to 1 when absent so pagination terminates after the first page.
pub fn total_pages(root: &Value) -> usize {
    first(root, "paginationOutput")
        .and_then(|p| first_str(p, "totalPages"))
        .and_then(|s| s.parse().ok())
        .unwrap_or(1)
}
