//! JSON output formatting.

use anyhow::Result;
use serde::Serialize;

/// JSON formatter for scripting consumers.
pub struct JsonFormatter {
    pretty: bool,
}

impl JsonFormatter {
    /// Creates a new JSON formatter.
    pub fn new(pretty: bool) -> Self {
        Self { pretty }
    }

    /// Serializes any value.
    pub fn format<T: Serialize>(&self, value: &T) -> Result<String> {
        let out = if self.pretty {
            serde_json::to_string_pretty(value)?
        } else {
            serde_json::to_string(value)?
        };
        Ok(out)
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use azlens_core::{CostSummary, DateRange};

    #[test]
    fn test_compact_and_pretty() {
        let summary = CostSummary::empty(
            "USD",
            DateRange::new("2024-01-01", "2024-01-31").unwrap(),
        );

        let compact = JsonFormatter::new(false).format(&summary).unwrap();
        assert!(!compact.contains('\n'));

        let pretty = JsonFormatter::new(true).format(&summary).unwrap();
        assert!(pretty.contains('\n'));

        let parsed: serde_json::Value = serde_json::from_str(&pretty).unwrap();
        assert_eq!(parsed["currency"], "USD");
    }
}
