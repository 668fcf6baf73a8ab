//! Text output formatting with colors.

use azlens_core::{CostSummary, Resource, ResourceCostDetail};
use azlens_query::RefreshReport;

use super::chart::ChartRenderer;

// ============================================================================
// ANSI Colors
// ============================================================================

const RESET: &str = "\x1b[0m";
const BOLD: &str = "\x1b[1m";
const DIM: &str = "\x1b[2m";
const GREEN: &str = "\x1b[32m";
const YELLOW: &str = "\x1b[33m";
const RED: &str = "\x1b[31m";
const CYAN: &str = "\x1b[36m";

/// Text formatter with optional colors.
pub struct TextFormatter {
    use_colors: bool,
    chart: ChartRenderer,
}

impl TextFormatter {
    /// Creates a new text formatter.
    pub fn new(use_colors: bool) -> Self {
        Self {
            use_colors,
            chart: ChartRenderer::new(),
        }
    }

    /// Formats a refresh report.
    pub fn format_refresh(&self, report: &RefreshReport) -> String {
        let mut lines = Vec::new();

        if let Some(error) = &report.error {
            lines.push(format!("{} {}", self.red("Refresh failed:"), error));
        } else {
            lines.push(format!(
                "{} {} resources, {} directory objects",
                self.green("Refreshed:"),
                report.resource_count,
                report.ad_count
            ));
        }

        for warning in &report.warnings {
            lines.push(format!("{} {}", self.yellow("warning:"), warning));
        }

        lines.join("\n")
    }

    /// Formats a resource listing, grouped view.
    pub fn format_resources(&self, resources: &[Resource]) -> String {
        if resources.is_empty() {
            return self.dim("No resources.");
        }

        let mut lines = Vec::new();
        lines.push(format!(
            "{:<30} {:<40} {:<16} {}",
            self.bold("Name"),
            self.bold("Type"),
            self.bold("Location"),
            self.bold("Resource Group")
        ));

        for r in resources {
            lines.push(format!(
                "{:<30} {:<40} {:<16} {}",
                r.name, r.resource_type, r.location, r.resource_group
            ));
        }

        lines.push(String::new());
        lines.push(self.dim(&format!("{} resources", resources.len())));
        lines.join("\n")
    }

    /// Formats a cost summary with optional charts.
    pub fn format_costs(&self, summary: &CostSummary, with_charts: bool) -> String {
        let mut lines = Vec::new();

        lines.push(format!(
            "{} ({})",
            self.bold("Subscription Cost Report"),
            summary.period
        ));
        lines.push("─".repeat(50));
        lines.push(format!(
            "Total: {}",
            self.green(&format!("{:.2} {}", summary.total_cost, summary.currency))
        ));

        if let Some(avg) = summary.average_daily_cost() {
            lines.push(format!(
                "Daily average: {:.2} {}",
                avg, summary.currency
            ));
        }

        lines.push(self.cyan(&self.chart.trend_line(&summary.trend())));

        if !summary.services.is_empty() {
            lines.push(String::new());
            lines.push(self.bold("By service"));
            if with_charts {
                lines.push(self.chart.render_services(&summary.services, &summary.currency));
            } else {
                for s in &summary.services {
                    lines.push(format!(
                        "  {:<30} {:>10.2} {} {}",
                        s.name,
                        s.cost,
                        s.currency,
                        self.dim(&format!("({} rows)", s.usage_count))
                    ));
                }
            }
        }

        if with_charts && !summary.daily.is_empty() {
            lines.push(String::new());
            lines.push(self.bold("By day"));
            lines.push(self.chart.render_daily(&summary.daily, &summary.currency));
        }

        lines.join("\n")
    }

    /// Formats a per-resource cost detail.
    pub fn format_resource_costs(&self, detail: &ResourceCostDetail) -> String {
        let mut lines = Vec::new();

        lines.push(format!(
            "{} ({})",
            self.bold(&format!("Costs for resource group '{}'", detail.resource_group)),
            detail.period
        ));
        lines.push("─".repeat(50));
        lines.push(format!(
            "Total: {}",
            self.green(&format!("{:.2} {}", detail.group_cost, detail.currency))
        ));

        if !detail.daily.is_empty() {
            lines.push(String::new());
            lines.push(self.chart.render_daily(&detail.daily, &detail.currency));
        }

        lines.push(String::new());
        lines.push(self.yellow(&detail.note));
        lines.join("\n")
    }

    // ========================================================================
    // Color/style helpers
    // ========================================================================

    fn bold(&self, text: &str) -> String {
        self.styled(BOLD, text)
    }

    fn dim(&self, text: &str) -> String {
        self.styled(DIM, text)
    }

    fn green(&self, text: &str) -> String {
        self.styled(GREEN, text)
    }

    fn yellow(&self, text: &str) -> String {
        self.styled(YELLOW, text)
    }

    fn red(&self, text: &str) -> String {
        self.styled(RED, text)
    }

    fn cyan(&self, text: &str) -> String {
        self.styled(CYAN, text)
    }

    fn styled(&self, code: &str, text: &str) -> String {
        if self.use_colors {
            format!("{code}{text}{RESET}")
        } else {
            text.to_string()
        }
    }
}

// ============================================================================
// Tests
// ============================================================================
