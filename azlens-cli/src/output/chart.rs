//! ASCII bar charts for cost series.
//!
//! Pure formatting over numbers: proportional fixed-width bars, truncated
//! labels, a row cap with a summary line. Deterministic given identical
//! input; no colors here so the output stays stable under `--no-color`
//! and in tests.

use azlens_core::{CostTrend, DailyCost, ServiceCost, TrendReport};

/// Bar fill character.
const BAR_FULL: char = '█';

/// Marker for truncated labels and the overflow row.
const ELLIPSIS: char = '…';

/// Renders cost series as fixed-width bar rows.
#[derive(Debug, Clone)]
pub struct ChartRenderer {
    /// Maximum bar length in characters.
    bar_width: usize,
    /// Maximum number of rendered rows.
    max_rows: usize,
    /// Character budget for service labels.
    label_width: usize,
}

impl Default for ChartRenderer {
    fn default() -> Self {
        Self {
            bar_width: 30,
            max_rows: 20,
            label_width: 20,
        }
    }
}

impl ChartRenderer {
    /// Creates a renderer with default dimensions.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the maximum bar length.
    pub fn with_bar_width(mut self, width: usize) -> Self {
        self.bar_width = width;
        self
    }

    /// Sets the row cap.
    pub fn with_max_rows(mut self, rows: usize) -> Self {
        self.max_rows = rows;
        self
    }

    /// Renders the per-day series, one row per day, dates as labels.
    pub fn render_daily(&self, daily: &[DailyCost], currency: &str) -> String {
        let max = daily.iter().map(|d| d.cost).fold(0.0_f64, f64::max);
        let rows = daily
            .iter()
            .take(self.max_rows)
            .map(|d| {
                format!(
                    "{} {:<width$} {:>8.2} {}",
                    d.date,
                    self.bar(d.cost, max),
                    d.cost,
                    currency,
                    width = self.bar_width
                )
            })
            .collect::<Vec<_>>();

        self.with_overflow(rows, daily.len())
    }

    /// Renders the per-service series, labels truncated to the budget.
    pub fn render_services(&self, services: &[ServiceCost], currency: &str) -> String {
        let max = services.iter().map(|s| s.cost).fold(0.0_f64, f64::max);
        let rows = services
            .iter()
            .take(self.max_rows)
            .map(|s| {
                format!(
                    "{:<label$} {:<width$} {:>8.2} {}",
                    truncate_label(&s.name, self.label_width),
                    self.bar(s.cost, max),
                    s.cost,
                    currency,
                    label = self.label_width,
                    width = self.bar_width
                )
            })
            .collect::<Vec<_>>();

        self.with_overflow(rows, services.len())
    }

    /// One-line trend indicator.
    pub fn trend_line(&self, report: &TrendReport) -> String {
        match report.trend {
            CostTrend::InsufficientData => "Trend: insufficient data".to_string(),
            trend => {
                let arrow = match trend {
                    CostTrend::Up => "↑",
                    CostTrend::Down => "↓",
                    _ => "→",
                };
                format!(
                    "Trend: {} {} {:+.1}% (recent avg {:.2} vs {:.2})",
                    arrow,
                    trend.label(),
                    report.percent_change,
                    report.recent_avg,
                    report.previous_avg
                )
            }
        }
    }

    /// `bar_len = floor(value / max * bar_width)`.
    fn bar(&self, value: f64, max: f64) -> String {
        if max <= 0.0 || value <= 0.0 {
            return String::new();
        }
        let len = ((value / max) * self.bar_width as f64).floor() as usize;
        BAR_FULL.to_string().repeat(len.min(self.bar_width))
    }

    fn with_overflow(&self, mut rows: Vec<String>, total: usize) -> String {
        if total > self.max_rows {
            rows.push(format!("{ELLIPSIS} {} more", total - self.max_rows));
        }
        rows.join("\n")
    }
}

/// Truncates a label to `budget` characters, ellipsis included.
fn truncate_label(label: &str, budget: usize) -> String {
    if label.chars().count() <= budget {
        return label.to_string();
    }
    let kept: String = label.chars().take(budget.saturating_sub(1)).collect();
    format!("{kept}{ELLIPSIS}")
}

// ============================================================================
// Tests
// ============================================================================
