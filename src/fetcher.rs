use std::time::Duration;

use chrono::{DateTime, Utc};
use serde_json::Value;
use tracing::debug;

use crate::config::{Config, FINDING_ENDPOINT, HTTP_TIMEOUT_SECS, MAX_ENTRIES_PER_PAGE,
    PAGE_FETCH_PAUSE_MS, SERVICE_VERSION};
use crate::error::{AppError, Result};
use crate::parser::{first, first_str, parse_active_items, parse_sold_totals, total_pages};
use crate::types::ActiveListing;

/// Thin client over the eBay Finding API. Credentials and marketplace
/// selection ride along on every call as query parameters.
pub struct FindingClient {
    client: reqwest::Client,
    endpoint: String,
    app_id: String,
    global_id: String,
}

impl FindingClient {
    pub fn new(cfg: &Config) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(HTTP_TIMEOUT_SECS))
            .build()?;
        Ok(Self {
            client,
            endpoint: FINDING_ENDPOINT.to_string(),
            app_id: cfg.app_id.clone(),
            global_id: cfg.global_id.clone(),
        })
    }

    /// Issue one Finding API call and return the unwrapped response root.
    /// A non-success/warning ack becomes an `AppError::Api`.
    async fn call(&self, operation: &str, params: &[(&str, String)]) -> Result<Value> {
        let base = [
            ("OPERATION-NAME", operation.to_string()),
            ("SERVICE-VERSION", SERVICE_VERSION.to_string()),
            ("SECURITY-APPNAME", self.app_id.clone()),
            ("GLOBAL-ID", self.global_id.clone()),
            ("RESPONSE-DATA-FORMAT", "JSON".to_string()),
            ("REST-PAYLOAD", "true".to_string()),
        ];

        let data: Value = self
            .client
            .get(&self.endpoint)
            .query(&base)
            .query(params)
            .send()
            .await?
            .error_for_status()?
            .json()
            .await?;

        response_root(&data, operation)
    }

    /// Fetch up to `limit` active listings for a keyword (single page,
    /// best-match order).
    pub async fn find_active(&self, keyword: &str, limit: usize) -> Result<Vec<ActiveListing>> {
        let root = self
            .call(
                "findItemsByKeywords",
                &[
                    ("keywords", keyword.to_string()),
                    ("paginationInput.entriesPerPage", limit.to_string()),
                    ("sortOrder", "BestMatch".to_string()),
                ],
            )
            .await?;
        let listings = parse_active_items(&root);
        debug!("[{keyword}] {} active listings", listings.len());
        Ok(listings)
    }

    /// Fetch total-paid amounts for completed sold listings within the
    /// lookback window, paging until `target` totals are accumulated or
    /// the API runs out of pages. Never returns more than `target`.
    pub async fn find_sold_totals(
        &self,
        keyword: &str,
        target: usize,
        lookback_days: i64,
    ) -> Result<Vec<f64>> {
        let end_time_from = iso_utc_millis(Utc::now() - chrono::Duration::days(lookback_days));

        let mut root = self
            .call(
                "findCompletedItems",
                &sold_params(keyword, &end_time_from, target.min(MAX_ENTRIES_PER_PAGE), None),
            )
            .await?;
        let mut totals = parse_sold_totals(&root);

        let mut page = 1usize;
        while let Some(next) = next_page(totals.len(), target, page, total_pages(&root)) {
            page = next;

            // rate-limit courtesy between page fetches
            tokio::time::sleep(Duration::from_millis(PAGE_FETCH_PAUSE_MS)).await;

            root = self
                .call(
                    "findCompletedItems",
                    &sold_params(keyword, &end_time_from, MAX_ENTRIES_PER_PAGE, Some(page)),
                )
                .await?;
            totals.extend(parse_sold_totals(&root));
        }

        let totals = cap_to_target(totals, target);
        debug!("[{keyword}] {} sold totals (target {target})", totals.len());
        Ok(totals)
    }
}

/// Decide the next completed-items page to request. None once the target
/// sample size is met or the next page would exceed the API-reported
/// total page count.
fn next_page(
    accumulated: usize,
    target: usize,
    current_page: usize,
    total_pages: usize,
) -> Option<usize> {
    if accumulated >= target {
        return None;
    }
    let next = current_page + 1;
    (next <= total_pages).then_some(next)
}

/// Over-fetching a full last page is expected; keep the first `target`
/// totals in API-returned order, fewer if the pages ran out.
fn cap_to_target(mut totals: Vec<f64>, target: usize) -> Vec<f64> {
    totals.truncate(target);
    totals
}

/// Query parameters for one findCompletedItems page.
fn sold_params(
    keyword: &str,
    end_time_from: &str,
    entries_per_page: usize,
    page_number: Option<usize>,
) -> Vec<(&'static str, String)> {
    let mut params = vec![
        ("keywords", keyword.to_string()),
        ("paginationInput.entriesPerPage", entries_per_page.to_string()),
        ("sortOrder", "EndTimeSoonest".to_string()),
        ("itemFilter(0).name", "SoldItemsOnly".to_string()),
        ("itemFilter(0).value", "true".to_string()),
        ("itemFilter(1).name", "EndTimeFrom".to_string()),
        ("itemFilter(1).value", end_time_from.to_string()),
    ];
    if let Some(page) = page_number {
        params.push(("paginationInput.pageNumber", page.to_string()));
    }
    params
}

/// ISO-8601 UTC with millisecond precision, the format the Finding API
/// expects for time-valued item filters.
fn iso_utc_millis(dt: DateTime<Utc>) -> String {
    dt.format("%Y-%m-%dT%H:%M:%S%.3fZ").to_string()
}

/// Unwrap `{operation}Response[0]` and check the ack field. The ack is a
/// wrapped string; anything other than success/warning (case-insensitive)
/// is a protocol-level failure carrying the API's own error list.
fn response_root(data: &Value, operation: &str) -> Result<Value> {
    let key = format!("{operation}Response");
    let root = data
        .get(&key)
        .and_then(|v| v.as_array())
        .and_then(|a| a.first())
        .cloned()
        .unwrap_or_else(|| Value::Object(Default::default()));

    let ack = first_str(&root, "ack").unwrap_or("").to_ascii_lowercase();
    match ack.as_str() {
        "success" | "warning" => Ok(root),
        _ => Err(AppError::Api(api_error_message(&root))),
    }
}

/// Join the response's errorMessage entries into "id: message; id: message".
fn api_error_message(root: &Value) -> String {
    let msg = first(root, "errorMessage")
        .and_then(|m| m.get("error"))
        .and_then(|e| e.as_array())
        .map(|errs| {
            errs.iter()
                .map(|e| {
                    format!(
                        "{}: {}",
                        first_str(e, "errorId").unwrap_or("?"),
                        first_str(e, "message").unwrap_or(""),
                    )
                })
                .collect::<Vec<_>>()
                .join("; ")
        })
        .unwrap_or_default();

    if msg.is_empty() {
        "unknown Finding API error".to_string()
    } else {
        msg
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn response_root_accepts_success_and_warning() {
        for ack in ["Success", "Warning", "success"] {
            let data = json!({
                "findCompletedItemsResponse": [{ "ack": [ack], "searchResult": [{}] }]
            });
            let root = response_root(&data, "findCompletedItems").unwrap();
            assert!(root.get("searchResult").is_some());
        }
    }

    #[test]
    fn response_root_rejects_failure_ack() {
        let data = json!({
            "findItemsByKeywordsResponse": [{
                "ack": ["Failure"],
                "errorMessage": [{
                    "error": [
                        { "errorId": ["10001"], "message": ["Service call has exceeded limit."] },
                        { "errorId": ["2"], "message": ["Bad appid"] },
                    ],
                }],
            }]
        });
        let err = response_root(&data, "findItemsByKeywords").unwrap_err();
        let msg = err.to_string();
        assert!(msg.contains("10001: Service call has exceeded limit."));
        assert!(msg.contains("2: Bad appid"));
    }

    #[test]
    fn response_root_rejects_missing_envelope() {
        let err = response_root(&json!({}), "findCompletedItems").unwrap_err();
        assert!(err.to_string().contains("unknown Finding API error"));
    }

    #[test]
    fn sold_params_first_page_omits_page_number() {
        let params = sold_params("game boy", "2026-01-01T00:00:00.000Z", 100, None);
        assert!(params.iter().all(|(k, _)| *k != "paginationInput.pageNumber"));
        assert!(params.contains(&("itemFilter(0).name", "SoldItemsOnly".to_string())));
        assert!(params.contains(&("itemFilter(1).value", "2026-01-01T00:00:00.000Z".to_string())));
    }

    #[test]
    fn sold_params_later_pages_carry_page_number() {
        let params = sold_params("game boy", "2026-01-01T00:00:00.000Z", 100, Some(3));
        assert!(params.contains(&("paginationInput.pageNumber", "3".to_string())));
        assert!(params.contains(&("paginationInput.entriesPerPage", "100".to_string())));
    }

    #[test]
    fn next_page_stops_once_target_met() {
        assert_eq!(next_page(120, 120, 2, 10), None);
        assert_eq!(next_page(150, 120, 2, 10), None);
    }

    #[test]
    fn next_page_never_exceeds_total_pages() {
        assert_eq!(next_page(40, 120, 1, 1), None);
        assert_eq!(next_page(80, 120, 2, 2), None);
        assert_eq!(next_page(80, 120, 2, 3), Some(3));
    }

    #[test]
    fn next_page_advances_while_short_of_target() {
        assert_eq!(next_page(0, 120, 1, 5), Some(2));
        assert_eq!(next_page(100, 120, 1, 5), Some(2));
    }

    #[test]
    fn cap_keeps_first_n_in_order() {
        let totals = cap_to_target(vec![80.0, 85.0, 90.0, 95.0], 3);
        assert_eq!(totals, vec![80.0, 85.0, 90.0]);
    }

    #[test]
    fn cap_returns_fewer_when_exhausted() {
        let totals = cap_to_target(vec![80.0, 85.0], 120);
        assert_eq!(totals, vec![80.0, 85.0]);
    }

    #[test]
    fn iso_utc_millis_format() {
        let dt = DateTime::parse_from_rfc3339("2026-08-26T09:30:05.251Z")
            .unwrap()
            .with_timezone(&Utc);
        assert_eq!(iso_utc_millis(dt), "2026-08-26T09:30:05.251Z");
    }
}
