//! Cost Management query bodies.
//!
//! The query shape is fixed by the Cost Management API: actual costs over
//! a custom period at daily granularity, summed over `PreTaxCost`.
//! Subscription-wide queries group by service name; per-resource queries
//! filter to the resource group instead (the API does not break costs
//! down per resource at this granularity).

use azlens_core::DateRange;
use serde::Serialize;

/// Dimension used for the subscription-wide service grouping.
const SERVICE_DIMENSION: &str = "ServiceName";

/// Dimension used for the resource-group filter.
const RESOURCE_GROUP_DIMENSION: &str = "ResourceGroupName";

// ============================================================================
// Query Body
// ============================================================================

/// The POST body for a Cost Management query.
#[derive(Debug, Clone, Serialize)]
pub struct CostQuery {
    #[serde(rename = "type")]
    query_type: &'static str,
    timeframe: &'static str,
    #[serde(rename = "timePeriod")]
    time_period: TimePeriod,
    dataset: Dataset,
}

#[derive(Debug, Clone, Serialize)]
struct TimePeriod {
    from: String,
    to: String,
}

#[derive(Debug, Clone, Serialize)]
struct Dataset {
    granularity: &'static str,
    aggregation: Aggregation,
    #[serde(skip_serializing_if = "Option::is_none")]
    grouping: Option<Vec<Grouping>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    filter: Option<Filter>,
}

#[derive(Debug, Clone, Serialize)]
struct Aggregation {
    #[serde(rename = "totalCost")]
    total_cost: AggregationFunction,
}

#[derive(Debug, Clone, Serialize)]
struct AggregationFunction {
    name: &'static str,
    function: &'static str,
}

#[derive(Debug, Clone, Serialize)]
struct Grouping {
    #[serde(rename = "type")]
    kind: &'static str,
    name: &'static str,
}

#[derive(Debug, Clone, Serialize)]
struct Filter {
    dimensions: DimensionFilter,
}

#[derive(Debug, Clone, Serialize)]
struct DimensionFilter {
    name: &'static str,
    operator: &'static str,
    values: Vec<String>,
}

impl CostQuery {
    /// Subscription-wide query, grouped by service name.
    pub fn subscription(range: &DateRange) -> Self {
        Self::build(
            range,
            Some(vec![Grouping {
                kind: "Dimension",
                name: SERVICE_DIMENSION,
            }]),
            None,
        )
    }

    /// Query filtered to one resource group, no grouping.
    pub fn resource_group(range: &DateRange, group: &str) -> Self {
        Self::build(
            range,
            None,
            Some(Filter {
                dimensions: DimensionFilter {
                    name: RESOURCE_GROUP_DIMENSION,
                    operator: "In",
                    values: vec![group.to_string()],
                },
            }),
        )
    }

    fn build(range: &DateRange, grouping: Option<Vec<Grouping>>, filter: Option<Filter>) -> Self {
        Self {
            query_type: "ActualCost",
            timeframe: "Custom",
            time_period: TimePeriod {
                from: range.start_datetime(),
                to: range.end_datetime(),
            },
            dataset: Dataset {
                granularity: "Daily",
                aggregation: Aggregation {
                    total_cost: AggregationFunction {
                        name: "PreTaxCost",
                        function: "Sum",
                    },
                },
                grouping,
                filter,
            },
        }
    }

    /// Serializes the body for `az rest --body`.
    pub fn to_body(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }
}

// ============================================================================
// Tests
// ============================================================================
