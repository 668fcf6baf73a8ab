//! The engine facade consumed by presentation code.
//!
//! [`AzureClient`] bundles the injected host capabilities (executor,
//! limiter, cache) behind the four operations the presentation layer
//! needs: refresh, subscription costs, per-resource costs, and cache
//! clearing. Every capability is constructor-injected so tests run
//! against scripted executors and fresh state.

use std::sync::Arc;
use std::time::Duration;

use azlens_core::{CoreError, CostSummary, DateRange, Resource, ResourceCostDetail, SubscriptionInfo};
use azlens_fetch::{AzCliRunner, CommandExecutor, RateLimiter, DEFAULT_TIMEOUT};
use azlens_store::{AzureCache, Config};
use serde::Deserialize;
use tracing::{debug, info};

use crate::aggregate::{self, parse_cost_response};
use crate::azcli;
use crate::costquery::CostQuery;
use crate::currency::CurrencyContext;
use crate::error::QueryError;
use crate::refresh::{RefreshCoordinator, RefreshReport};

// ============================================================================
// Azure Client
// ============================================================================

/// The data-refresh and cost engine.
pub struct AzureClient {
    executor: Arc<dyn CommandExecutor>,
    limiter: Arc<RateLimiter>,
    cache: Arc<AzureCache>,
    timeout: Duration,
    coordinator: RefreshCoordinator,
}

impl AzureClient {
    /// Creates a builder for customizing the client.
    pub fn builder() -> AzureClientBuilder {
        AzureClientBuilder::new()
    }

    /// Creates a client from application configuration, with the
    /// production az runner.
    pub fn from_config(config: &Config) -> Self {
        let cache = AzureCache::new(config.cache_ttl());
        let cache = if config.cache.sweep_cost_entries {
            cache
        } else {
            cache.without_sweep()
        };

        Self::builder()
            .limiter(RateLimiter::new(config.rate_limit_config()))
            .cache(cache)
            .timeout(config.command_timeout())
            .include_directory_objects(config.general.include_directory_objects)
            .build()
    }

    /// The shared cache, for presentation reads.
    pub fn cache(&self) -> &Arc<AzureCache> {
        &self.cache
    }

    /// Returns true while a refresh cycle is in flight.
    pub fn is_refreshing(&self) -> bool {
        self.coordinator.is_loading()
    }

    // ========================================================================
    // Operations
    // ========================================================================

    /// Runs one refresh cycle (see [`RefreshCoordinator::refresh`]).
    pub async fn refresh(&self) -> Result<RefreshReport, QueryError> {
        self.coordinator.refresh().await
    }

    /// The active subscription, cached.
    pub async fn subscription(&self) -> Result<SubscriptionInfo, QueryError> {
        if let Some(info) = self.cache.subscription().await {
            return Ok(info);
        }

        let raw = self.run(azcli::account_show()).await?;
        let view: AccountView = serde_json::from_str(raw.trim())?;
        let info = SubscriptionInfo {
            id: view.id,
            name: view.name,
            tenant_id: view.tenant_id,
            user_email: view.user.and_then(|u| u.name),
        };

        self.cache.set_subscription(info.clone()).await;
        debug!(subscription = %info.name, "Subscription context updated");
        Ok(info)
    }

    /// Aggregated costs for the whole subscription over `range`.
    pub async fn subscription_costs(&self, range: &DateRange) -> Result<CostSummary, QueryError> {
        let key = range.cache_key();
        if let Some(hit) = self.cache.costs(&key).await {
            debug!(key = %key, "Cost cache hit");
            return Ok(hit);
        }

        let subscription = self.subscription().await?;
        let body = CostQuery::subscription(range).to_body()?;
        let raw = self.run(azcli::cost_query(&subscription.id, &body)).await?;
        let response = parse_cost_response(&raw)?;

        let ctx = CurrencyContext {
            session: self.cache.currency().await,
            email_domain: subscription.email_domain().map(ToString::to_string),
        };
        let summary = aggregate::aggregate(&response, range, &ctx);

        self.cache.set_currency(summary.currency.clone()).await;
        self.cache.set_costs(key, summary.clone()).await;
        info!(
            total = summary.total_cost,
            currency = %summary.currency,
            period = %summary.period,
            "Subscription costs aggregated"
        );
        Ok(summary)
    }

    /// Approximated costs for one resource over `range`.
    ///
    /// The Cost Management API cannot attribute costs to a single resource
    /// at this granularity, so the query filters to the resource's group
    /// and the result carries an explanatory note instead of failing.
    pub async fn resource_costs(
        &self,
        resource: &Resource,
        range: &DateRange,
    ) -> Result<ResourceCostDetail, QueryError> {
        let group = &resource.resource_group;
        if resource.is_directory_object() || group == azlens_core::UNKNOWN {
            return Err(QueryError::Core(CoreError::InvalidData(format!(
                "resource {} has no resource group to attribute costs to",
                resource.id
            ))));
        }

        let subscription = self.subscription().await?;
        let body = CostQuery::resource_group(range, group).to_body()?;
        let raw = self.run(azcli::cost_query(&subscription.id, &body)).await?;
        let response = parse_cost_response(&raw)?;

        let ctx = CurrencyContext {
            session: self.cache.currency().await,
            email_domain: subscription.email_domain().map(ToString::to_string),
        };
        let summary = aggregate::aggregate(&response, range, &ctx);
        self.cache.set_currency(summary.currency.clone()).await;

        Ok(ResourceCostDetail {
            resource_id: resource.id.clone(),
            resource_group: group.clone(),
            group_cost: summary.total_cost,
            daily: summary.daily,
            currency: summary.currency,
            period: range.clone(),
            note: format!(
                "Costs cover the entire resource group '{group}'; per-resource attribution is not available from the Cost Management API."
            ),
        })
    }

    /// Empties every cache scope.
    pub async fn clear_cache(&self) {
        self.cache.clear().await;
        info!("Cache cleared");
    }

    async fn run(&self, args: Vec<String>) -> Result<String, QueryError> {
        azcli::run_gated(self.executor.as_ref(), &self.limiter, args, self.timeout).await
    }
}

/// Typed view over `az account show`.
#[derive(Debug, Deserialize)]
struct AccountView {
    id: String,
    name: String,
    #[serde(default, rename = "tenantId")]
    tenant_id: Option<String>,
    #[serde(default)]
    user: Option<AccountUser>,
}

#[derive(Debug, Deserialize)]
struct AccountUser {
    #[serde(default)]
    name: Option<String>,
}

// ============================================================================
// Builder
// ============================================================================

/// Builder for constructing an [`AzureClient`].
pub struct AzureClientBuilder {
    executor: Option<Arc<dyn CommandExecutor>>,
    limiter: Option<Arc<RateLimiter>>,
    cache: Option<Arc<AzureCache>>,
    timeout: Duration,
    include_directory_objects: bool,
}

impl AzureClientBuilder {
    /// Creates a new builder with defaults.
    pub fn new() -> Self {
        Self {
            executor: None,
            limiter: None,
            cache: None,
            timeout: DEFAULT_TIMEOUT,
            include_directory_objects: true,
        }
    }

    /// Sets the command executor.
    pub fn executor(mut self, executor: Arc<dyn CommandExecutor>) -> Self {
        self.executor = Some(executor);
        self
    }

    /// Sets the rate limiter.
    pub fn limiter(mut self, limiter: RateLimiter) -> Self {
        self.limiter = Some(Arc::new(limiter));
        self
    }

    /// Sets the cache.
    pub fn cache(mut self, cache: AzureCache) -> Self {
        self.cache = Some(Arc::new(cache));
        self
    }

    /// Sets the per-command timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Enables or disables directory-object fetching.
    pub fn include_directory_objects(mut self, include: bool) -> Self {
        self.include_directory_objects = include;
        self
    }

    /// Builds the client.
    pub fn build(self) -> AzureClient {
        let executor = self
            .executor
            .unwrap_or_else(|| Arc::new(AzCliRunner::new()));
        let limiter = self.limiter.unwrap_or_else(|| Arc::new(RateLimiter::default()));
        let cache = self.cache.unwrap_or_else(|| Arc::new(AzureCache::default()));

        let coordinator = RefreshCoordinator::new(
            executor.clone(),
            limiter.clone(),
            cache.clone(),
            self.timeout,
            self.include_directory_objects,
        );

        AzureClient {
            executor,
            limiter,
            cache,
            timeout: self.timeout,
            coordinator,
        }
    }
}

impl Default for AzureClientBuilder {
    fn default() -> Self {
        Self::new()
    }
}
