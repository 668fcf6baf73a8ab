//! Cost response aggregation.
//!
//! The Cost Management API returns a column/row table whose column set
//! varies with the query (and has drifted across API versions), so columns
//! are located by name against known alias sets and every optional field
//! degrades to a soft default. Only a malformed top-level payload is an
//! error.

use std::collections::{BTreeMap, HashMap};

use azlens_core::{CostSummary, DailyCost, DateRange, ServiceCost, UNKNOWN};
use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

use crate::currency::{self, CurrencyContext};
use crate::error::QueryError;

// ============================================================================
// Response View
// ============================================================================

/// Column name aliases, per field.
const COST_ALIASES: &[&str] = &["PreTaxCost", "Cost"];
const DATE_ALIASES: &[&str] = &["UsageDate", "Date"];
const SERVICE_ALIASES: &[&str] = &["ServiceName", "Service"];
const CURRENCY_ALIASES: &[&str] = &["Currency", "BillingCurrency"];

/// A Cost Management query response.
#[derive(Debug, Default, Deserialize)]
pub struct CostResponse {
    #[serde(default)]
    properties: Option<CostProperties>,
    #[serde(default)]
    currency: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
struct CostProperties {
    #[serde(default)]
    columns: Vec<CostColumn>,
    #[serde(default)]
    rows: Vec<Vec<Value>>,
    #[serde(default, rename = "nextLink")]
    next_link: Option<String>,
    #[serde(default)]
    currency: Option<String>,
}

/// One column descriptor.
#[derive(Debug, Deserialize)]
pub struct CostColumn {
    /// Column name as reported by the API.
    pub name: String,
}

impl CostResponse {
    fn columns(&self) -> &[CostColumn] {
        self.properties.as_ref().map_or(&[], |p| &p.columns)
    }

    fn rows(&self) -> &[Vec<Value>] {
        self.properties.as_ref().map_or(&[], |p| &p.rows)
    }

    /// Response-level currency metadata, wherever the API put it.
    pub fn metadata_currency(&self) -> Option<&str> {
        self.currency
            .as_deref()
            .or_else(|| self.properties.as_ref()?.currency.as_deref())
    }

    /// Pagination link, if the result was truncated.
    pub fn next_link(&self) -> Option<&str> {
        self.properties.as_ref()?.next_link.as_deref()
    }
}

/// Parses a Cost Management response. Blank input is an empty response.
pub fn parse_cost_response(raw: &str) -> Result<CostResponse, QueryError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(CostResponse::default());
    }
    Ok(serde_json::from_str(trimmed)?)
}

// ============================================================================
// Aggregation
// ============================================================================

/// Aggregates a response into per-service and per-day totals.
///
/// The grand total is accumulated independently of both groupings and
/// still equals each group's sum, up to float drift from the source rows.
pub fn aggregate(response: &CostResponse, range: &DateRange, ctx: &CurrencyContext) -> CostSummary {
    let columns = response.columns();
    let cost_idx = find_column(columns, COST_ALIASES);
    let date_idx = find_column(columns, DATE_ALIASES);
    let service_idx = find_column(columns, SERVICE_ALIASES);
    let currency_idx = find_column(columns, CURRENCY_ALIASES);

    debug!(
        rows = response.rows().len(),
        cost_col = ?cost_idx,
        date_col = ?date_idx,
        service_col = ?service_idx,
        "Aggregating cost rows"
    );

    let mut total = 0.0_f64;
    let mut services: HashMap<String, (f64, u32)> = HashMap::new();
    let mut daily: BTreeMap<String, f64> = BTreeMap::new();
    let mut row_currency: Option<String> = None;

    for row in response.rows() {
        let cost = cost_idx.map_or(0.0, |i| cell_f64(row.get(i)));
        let date = date_idx
            .and_then(|i| cell_date(row.get(i)))
            .unwrap_or_else(|| range.start.clone());
        let service = service_idx
            .and_then(|i| cell_str(row.get(i)))
            .unwrap_or_else(|| UNKNOWN.to_string());

        if row_currency.is_none() {
            row_currency = currency_idx.and_then(|i| cell_str(row.get(i)));
        }

        total += cost;

        let bucket = services.entry(service).or_insert((0.0, 0));
        bucket.0 += cost;
        bucket.1 += 1;

        *daily.entry(date).or_insert(0.0) += cost;
    }

    let resolved = currency::resolve(
        row_currency.as_deref(),
        response.metadata_currency(),
        response.next_link(),
        ctx,
    );

    let mut services: Vec<ServiceCost> = services
        .into_iter()
        .map(|(name, (cost, usage_count))| ServiceCost {
            name,
            cost,
            usage_count,
            currency: resolved.clone(),
        })
        .collect();
    services.sort_by(|a, b| {
        b.cost
            .partial_cmp(&a.cost)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then_with(|| a.name.cmp(&b.name))
    });

    let daily = daily
        .into_iter()
        .map(|(date, cost)| DailyCost::new(date, cost))
        .collect();

    CostSummary {
        total_cost: total,
        currency: resolved,
        services,
        daily,
        period: range.clone(),
    }
}

// ============================================================================
// Cell Coercion
// ============================================================================

fn find_column(columns: &[CostColumn], aliases: &[&str]) -> Option<usize> {
    columns
        .iter()
        .position(|c| aliases.iter().any(|a| c.name.eq_ignore_ascii_case(a)))
}

fn cell_f64(value: Option<&Value>) -> f64 {
    match value {
        Some(Value::Number(n)) => n.as_f64().unwrap_or(0.0),
        Some(Value::String(s)) => s.trim().parse().unwrap_or(0.0),
        _ => 0.0,
    }
}

fn cell_str(value: Option<&Value>) -> Option<String> {
    match value {
        Some(Value::String(s)) if !s.is_empty() => Some(s.clone()),
        _ => None,
    }
}

/// Usage dates arrive as `20240101` integers or ISO strings.
fn cell_date(value: Option<&Value>) -> Option<String> {
    match value {
        Some(Value::Number(n)) => format_compact_date(&n.to_string()),
        Some(Value::String(s)) => {
            let s = s.trim();
            if s.len() >= 10 && s.as_bytes().get(4) == Some(&b'-') {
                Some(s[..10].to_string())
            } else {
                format_compact_date(s)
            }
        }
        _ => None,
    }
}

/// `"20240101"` to `"2024-01-01"`.
fn format_compact_date(s: &str) -> Option<String> {
    if s.len() == 8 && s.bytes().all(|b| b.is_ascii_digit()) {
        Some(format!("{}-{}-{}", &s[..4], &s[4..6], &s[6..8]))
    } else {
        None
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn range() -> DateRange {
        DateRange::new("2024-01-01", "2024-01-02").unwrap()
    }

    fn response(columns: &[&str], rows: serde_json::Value) -> CostResponse {
        let cols: Vec<serde_json::Value> = columns
            .iter()
            .map(|c| serde_json::json!({"name": c, "type": "Number"}))
            .collect();
        let raw = serde_json::json!({"properties": {"columns": cols, "rows": rows}});
        parse_cost_response(&raw.to_string()).unwrap()
    }

    #[test]
    fn test_scenario_three_rows() {
        let response = response(
            &["PreTaxCost", "UsageDate", "ServiceName"],
            serde_json::json!([
                [12.5, "2024-01-01", "VM"],
                [7.5, "2024-01-01", "Storage"],
                [5.0, "2024-01-02", "VM"]
            ]),
        );

        let summary = aggregate(&response, &range(), &CurrencyContext::default());

        assert!((summary.total_cost - 25.0).abs() < 1e-9);

        // VM before Storage, cost descending.
        assert_eq!(summary.services.len(), 2);
        assert_eq!(summary.services[0].name, "VM");
        assert!((summary.services[0].cost - 17.5).abs() < 1e-9);
        assert_eq!(summary.services[0].usage_count, 2);
        assert_eq!(summary.services[1].name, "Storage");
        assert!((summary.services[1].cost - 7.5).abs() < 1e-9);

        // Date ascending.
        assert_eq!(
            summary.daily,
            vec![
                DailyCost::new("2024-01-01", 20.0),
                DailyCost::new("2024-01-02", 5.0),
            ]
        );

        assert_eq!(summary.currency, "USD");
    }

    #[test]
    fn test_column_aliases() {
        let response = response(
            &["Cost", "Date", "Service"],
            serde_json::json!([[3.0, 20240101, "VM"]]),
        );

        let summary = aggregate(&response, &range(), &CurrencyContext::default());
        assert!((summary.total_cost - 3.0).abs() < 1e-9);
        assert_eq!(summary.daily[0].date, "2024-01-01");
        assert_eq!(summary.services[0].name, "VM");
    }

    #[test]
    fn test_numeric_usage_dates() {
        let response = response(
            &["PreTaxCost", "UsageDate"],
            serde_json::json!([[1.0, 20240102], [2.0, 20240101]]),
        );

        let summary = aggregate(&response, &range(), &CurrencyContext::default());
        let dates: Vec<_> = summary.daily.iter().map(|d| d.date.as_str()).collect();
        assert_eq!(dates, ["2024-01-01", "2024-01-02"]);
    }

    #[test]
    fn test_missing_columns_use_defaults() {
        // No cost column: every row costs 0. No date: everything lands on
        // the query start. No service: "Unknown".
        let response = response(&["SomethingElse"], serde_json::json!([["x"], ["y"]]));

        let summary = aggregate(&response, &range(), &CurrencyContext::default());
        assert!((summary.total_cost - 0.0).abs() < f64::EPSILON);
        assert_eq!(summary.daily.len(), 1);
        assert_eq!(summary.daily[0].date, "2024-01-01");
        assert_eq!(summary.services.len(), 1);
        assert_eq!(summary.services[0].name, "Unknown");
        assert_eq!(summary.services[0].usage_count, 2);
    }

    #[test]
    fn test_row_currency_propagates() {
        let response = response(
            &["PreTaxCost", "UsageDate", "ServiceName", "Currency"],
            serde_json::json!([[1.0, "2024-01-01", "VM", "NOK"]]),
        );

        let summary = aggregate(&response, &range(), &CurrencyContext::default());
        assert_eq!(summary.currency, "NOK");
        assert_eq!(summary.services[0].currency, "NOK");
    }

    #[test]
    fn test_string_costs_parse() {
        let response = response(
            &["PreTaxCost", "UsageDate"],
            serde_json::json!([["2.25", "2024-01-01"], ["garbage", "2024-01-01"]]),
        );

        let summary = aggregate(&response, &range(), &CurrencyContext::default());
        assert!((summary.total_cost - 2.25).abs() < 1e-9);
    }

    #[test]
    fn test_blank_response_is_empty() {
        let response = parse_cost_response("   ").unwrap();
        let summary = aggregate(&response, &range(), &CurrencyContext::default());
        assert!((summary.total_cost).abs() < f64::EPSILON);
        assert!(summary.services.is_empty());
        assert!(summary.daily.is_empty());
    }

    #[test]
    fn test_malformed_response_is_a_parse_error() {
        assert!(matches!(
            parse_cost_response("{broken"),
            Err(QueryError::Parse(_))
        ));
    }

    #[test]
    fn test_iso_datetime_truncated_to_date() {
        let response = response(
            &["PreTaxCost", "UsageDate"],
            serde_json::json!([[1.0, "2024-01-01T00:00:00Z"]]),
        );

        let summary = aggregate(&response, &range(), &CurrencyContext::default());
        assert_eq!(summary.daily[0].date, "2024-01-01");
    }

    #[test]
    fn test_service_tie_breaks_by_name() {
        let response = response(
            &["PreTaxCost", "UsageDate", "ServiceName"],
            serde_json::json!([
                [5.0, "2024-01-01", "Zeta"],
                [5.0, "2024-01-01", "Alpha"]
            ]),
        );

        let summary = aggregate(&response, &range(), &CurrencyContext::default());
        assert_eq!(summary.services[0].name, "Alpha");
        assert_eq!(summary.services[1].name, "Zeta");
    }

    mod properties {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn total_equals_sum_of_rows(
                costs in proptest::collection::vec(0.0_f64..1000.0, 0..50),
                day_offsets in proptest::collection::vec(0_u8..2, 0..50),
                service_ids in proptest::collection::vec(0_u8..5, 0..50),
            ) {
                let n = costs.len().min(day_offsets.len()).min(service_ids.len());
                let rows: Vec<serde_json::Value> = (0..n)
                    .map(|i| {
                        serde_json::json!([
                            costs[i],
                            format!("2024-01-{:02}", day_offsets[i] + 1),
                            format!("Service{}", service_ids[i])
                        ])
                    })
                    .collect();

                let response = response(
                    &["PreTaxCost", "UsageDate", "ServiceName"],
                    serde_json::Value::Array(rows),
                );
                let summary = aggregate(&response, &range(), &CurrencyContext::default());

                let expected: f64 = costs[..n].iter().sum();
                prop_assert!((summary.total_cost - expected).abs() < 1e-6);
                prop_assert!((summary.service_total() - expected).abs() < 1e-6);
                prop_assert!((summary.daily_total() - expected).abs() < 1e-6);
            }
        }
    }
}
