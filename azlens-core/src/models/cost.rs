//! Cost aggregation outputs.
//!
//! This module contains the types produced by cost aggregation:
//! - [`CostSummary`] - Per-service and per-day totals for a date range
//! - [`ServiceCost`] / [`DailyCost`] - The two groupings
//! - [`ResourceCostDetail`] - Resource-group approximation for one resource
//! - [`TrendReport`] - Spend trend over the daily series

use serde::{Deserialize, Serialize};

use super::date_range::DateRange;

// ============================================================================
// Cost Summary
// ============================================================================

/// Aggregated cost data for one subscription and date range.
///
/// Invariant: `total_cost` equals the sum of `services[].cost` and the sum
/// of `daily[].cost` within floating-point tolerance.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CostSummary {
    /// Grand total across all usage rows.
    pub total_cost: f64,
    /// ISO-4217 currency code.
    pub currency: String,
    /// Per-service totals, sorted by cost descending.
    pub services: Vec<ServiceCost>,
    /// Per-day totals, sorted by date ascending.
    pub daily: Vec<DailyCost>,
    /// The queried period.
    pub period: DateRange,
}

impl CostSummary {
    /// Returns an empty summary for the given period.
    pub fn empty(currency: impl Into<String>, period: DateRange) -> Self {
        Self {
            total_cost: 0.0,
            currency: currency.into(),
            services: Vec::new(),
            daily: Vec::new(),
            period,
        }
    }

    /// Sum of the per-service totals.
    pub fn service_total(&self) -> f64 {
        self.services.iter().map(|s| s.cost).sum()
    }

    /// Sum of the per-day totals.
    pub fn daily_total(&self) -> f64 {
        self.daily.iter().map(|d| d.cost).sum()
    }

    /// Average cost per day with data.
    pub fn average_daily_cost(&self) -> Option<f64> {
        if self.daily.is_empty() {
            return None;
        }
        Some(self.daily_total() / self.daily.len() as f64)
    }

    /// The most expensive service, if any.
    pub fn top_service(&self) -> Option<&ServiceCost> {
        self.services.first()
    }

    /// Computes the spend trend over the daily series.
    pub fn trend(&self) -> TrendReport {
        TrendReport::compute(&self.daily)
    }
}

// ============================================================================
// Groupings
// ============================================================================

/// Accumulated cost for one service.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceCost {
    /// Service name (e.g. "Virtual Machines").
    pub name: String,
    /// Total cost attributed to this service.
    pub cost: f64,
    /// Number of usage rows that contributed.
    pub usage_count: u32,
    /// ISO-4217 currency code.
    pub currency: String,
}

/// Accumulated cost for one day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyCost {
    /// Date in `YYYY-MM-DD` format.
    pub date: String,
    /// Total cost for this day.
    pub cost: f64,
}

impl DailyCost {
    /// Creates a new daily entry.
    pub fn new(date: impl Into<String>, cost: f64) -> Self {
        Self {
            date: date.into(),
            cost,
        }
    }
}

// ============================================================================
// Resource Cost Detail
// ============================================================================

/// Approximated cost for a single resource.
///
/// The Cost Management API does not expose per-resource costs at this query
/// granularity, so the figure is the total for the resource's resource
/// group; `note` explains the approximation to the user.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResourceCostDetail {
    /// Id of the resource the detail was requested for.
    pub resource_id: String,
    /// The resource group the costs were filtered to.
    pub resource_group: String,
    /// Total cost of the resource group over the period.
    pub group_cost: f64,
    /// Per-day totals for the group, sorted by date ascending.
    pub daily: Vec<DailyCost>,
    /// ISO-4217 currency code.
    pub currency: String,
    /// The queried period.
    pub period: DateRange,
    /// Explanation of the resource-group approximation.
    pub note: String,
}

// ============================================================================
// Trend
// ============================================================================

/// Classification of the recent spend direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CostTrend {
    /// Recent average more than 10% above the previous window.
    Up,
    /// Recent average more than 10% below the previous window.
    Down,
    /// Within the ±10% band.
    Stable,
    /// Fewer than two days of data.
    InsufficientData,
}

impl CostTrend {
    /// Returns the display label for this trend.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Up => "up",
            Self::Down => "down",
            Self::Stable => "stable",
            Self::InsufficientData => "insufficient data",
        }
    }
}

/// Preferred window length for trend comparison, in days.
const TREND_WINDOW_DAYS: usize = 7;

/// Percent band treated as stable.
const TREND_STABLE_BAND: f64 = 10.0;

/// Result of comparing recent spend against the preceding window.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrendReport {
    /// The classified direction.
    pub trend: CostTrend,
    /// Percent change of the recent window over the previous one.
    pub percent_change: f64,
    /// Mean daily cost of the recent window.
    pub recent_avg: f64,
    /// Mean daily cost of the previous window.
    pub previous_avg: f64,
}

impl TrendReport {
    /// Compares the mean of the most recent days against the mean of the
    /// preceding equal-length window.
    ///
    /// Both windows share one length: at most [`TREND_WINDOW_DAYS`], shrunk
    /// so a full preceding window exists (half the series when fewer than
    /// two windows fit at the preferred length). `daily` must be sorted by
    /// date ascending.
    pub fn compute(daily: &[DailyCost]) -> Self {
        let n = daily.len();
        if n < 2 {
            return Self {
                trend: CostTrend::InsufficientData,
                percent_change: 0.0,
                recent_avg: 0.0,
                previous_avg: 0.0,
            };
        }

        let preferred = TREND_WINDOW_DAYS.min(n);
        let older_available = n - preferred;
        let len = if older_available == 0 {
            n / 2
        } else {
            preferred.min(older_available)
        };

        let recent = &daily[n - len..];
        let older = &daily[n - 2 * len..n - len];

        let recent_avg = mean(recent);
        let previous_avg = mean(older);

        let percent_change = if previous_avg == 0.0 {
            if recent_avg > 0.0 { 100.0 } else { 0.0 }
        } else {
            (recent_avg - previous_avg) / previous_avg * 100.0
        };

        let trend = if percent_change > TREND_STABLE_BAND {
            CostTrend::Up
        } else if percent_change < -TREND_STABLE_BAND {
            CostTrend::Down
        } else {
            CostTrend::Stable
        };

        Self {
            trend,
            percent_change,
            recent_avg,
            previous_avg,
        }
    }
}

fn mean(days: &[DailyCost]) -> f64 {
    if days.is_empty() {
        return 0.0;
    }
    days.iter().map(|d| d.cost).sum::<f64>() / days.len() as f64
}

// ============================================================================
// Tests
// ============================================================================
