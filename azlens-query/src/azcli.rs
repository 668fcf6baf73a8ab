//! Argument tables for az invocations.
//!
//! Every command the engine runs is assembled here, so the full external
//! surface is visible in one place and the executors in tests can match
//! on stable argument shapes.

use std::time::Duration;

use azlens_core::ObjectCategory;
use azlens_fetch::{CommandExecutor, RateLimiter};

use crate::error::{QueryError, classify_az_failure};

/// The Azure CLI binary name.
pub const AZ: &str = "az";

/// Runs one az invocation through the rate-limit gate.
///
/// The limiter is acquired (and the request recorded) immediately before
/// dispatch. A non-zero exit is classified from stderr; success returns
/// raw stdout for the category parsers.
pub async fn run_gated(
    executor: &dyn CommandExecutor,
    limiter: &RateLimiter,
    args: Vec<String>,
    timeout: Duration,
) -> Result<String, QueryError> {
    limiter.acquire().await;

    let output = executor.execute(AZ, &args, timeout).await?;
    if output.success() {
        Ok(output.stdout)
    } else {
        Err(classify_az_failure(&output.stderr))
    }
}

/// Cost Management API version used by `az rest` queries.
pub const COST_API_VERSION: &str = "2023-03-01";

fn to_args(parts: &[&str]) -> Vec<String> {
    parts.iter().map(ToString::to_string).collect()
}

/// `az resource list` - the cloud resource listing.
pub fn resource_list() -> Vec<String> {
    to_args(&["resource", "list", "--output", "json"])
}

/// `az account show` - the active subscription context.
pub fn account_show() -> Vec<String> {
    to_args(&["account", "show", "--output", "json"])
}

/// `az ad signed-in-user show` - the directory access probe.
pub fn directory_probe() -> Vec<String> {
    to_args(&["ad", "signed-in-user", "show", "--output", "json"])
}

/// The listing command for one directory-object category.
pub fn directory_list(category: ObjectCategory) -> Vec<String> {
    match category {
        ObjectCategory::Applications => to_args(&["ad", "app", "list", "--all", "--output", "json"]),
        ObjectCategory::Users => to_args(&["ad", "user", "list", "--output", "json"]),
        ObjectCategory::Groups => to_args(&["ad", "group", "list", "--output", "json"]),
        ObjectCategory::RoleAssignments => {
            to_args(&["role", "assignment", "list", "--all", "--output", "json"])
        }
    }
}

/// The Cost Management query endpoint for a subscription.
pub fn cost_management_url(subscription_id: &str) -> String {
    format!(
        "https://management.azure.com/subscriptions/{subscription_id}/providers/Microsoft.CostManagement/query?api-version={COST_API_VERSION}"
    )
}

/// `az rest` POST against the Cost Management query endpoint.
pub fn cost_query(subscription_id: &str, body: &str) -> Vec<String> {
    vec![
        "rest".to_string(),
        "--method".to_string(),
        "post".to_string(),
        "--url".to_string(),
        cost_management_url(subscription_id),
        "--body".to_string(),
        body.to_string(),
        "--headers".to_string(),
        "Content-Type=application/json".to_string(),
        "--output".to_string(),
        "json".to_string(),
    ]
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_directory_list_shapes() {
        assert_eq!(
            directory_list(ObjectCategory::Applications)[..3],
            ["ad", "app", "list"]
        );
        assert_eq!(
            directory_list(ObjectCategory::RoleAssignments)[..3],
            ["role", "assignment", "list"]
        );
    }

    #[test]
    fn test_cost_url_embeds_subscription() {
        let url = cost_management_url("1111-2222");
        assert!(url.contains("/subscriptions/1111-2222/"));
        assert!(url.contains("Microsoft.CostManagement/query"));
        assert!(url.ends_with(COST_API_VERSION));
    }

    #[test]
    fn test_cost_query_carries_body() {
        let args = cost_query("s", r#"{"type":"ActualCost"}"#);
        let body_pos = args.iter().position(|a| a == "--body").unwrap();
        assert_eq!(args[body_pos + 1], r#"{"type":"ActualCost"}"#);
    }
}
