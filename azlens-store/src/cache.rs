//! Scoped time-to-live cache.
//!
//! Holds everything the engine fetches so that presentation reads never
//! trigger an az invocation of their own: subscription context, the
//! resolved billing currency, cost summaries per date range, and resource
//! listings per category. Entries expire lazily; only the cost scope is
//! swept, on each cost lookup, because distinct date ranges accumulate
//! keys over a long session.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use azlens_core::{CostSummary, ObjectCategory, Resource, SubscriptionInfo};
use tokio::sync::RwLock;
use tracing::debug;

/// Default entry lifetime.
pub const DEFAULT_TTL: Duration = Duration::from_secs(300);

// ============================================================================
// Cache Entry
// ============================================================================

/// A value plus the instant it was stored.
#[derive(Debug, Clone)]
struct CacheEntry<T> {
    data: T,
    stored_at: Instant,
}

impl<T> CacheEntry<T> {
    fn new(data: T) -> Self {
        Self {
            data,
            stored_at: Instant::now(),
        }
    }

    /// An entry is valid strictly inside its lifetime: `age < ttl`.
    fn is_valid(&self, ttl: Duration) -> bool {
        self.stored_at.elapsed() < ttl
    }
}

// ============================================================================
// Listing Scope
// ============================================================================

/// Key for a cached listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ListingScope {
    /// The cloud resource listing.
    Resources,
    /// One directory-object category.
    Directory(ObjectCategory),
}

// ============================================================================
// Azure Cache
// ============================================================================

#[derive(Debug, Default)]
struct CacheInner {
    subscription: Option<CacheEntry<SubscriptionInfo>>,
    currency: Option<CacheEntry<String>>,
    costs: HashMap<String, CacheEntry<CostSummary>>,
    listings: HashMap<ListingScope, CacheEntry<Vec<Resource>>>,
}

/// Process-wide cache with one TTL across all scopes.
///
/// Interior mutability through an async `RwLock` keeps read-modify-write
/// sequences exclusive under multi-threaded runtimes.
#[derive(Debug)]
pub struct AzureCache {
    inner: RwLock<CacheInner>,
    ttl: Duration,
    sweep_costs: bool,
}

impl AzureCache {
    /// Creates a cache with the given entry lifetime.
    pub fn new(ttl: Duration) -> Self {
        Self {
            inner: RwLock::new(CacheInner::default()),
            ttl,
            sweep_costs: true,
        }
    }

    /// Disables the cost-scope sweep (entries still expire lazily).
    pub fn without_sweep(mut self) -> Self {
        self.sweep_costs = false;
        self
    }

    /// The configured entry lifetime.
    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    // ========================================================================
    // Subscription
    // ========================================================================

    /// Gets the cached subscription context, if still valid.
    pub async fn subscription(&self) -> Option<SubscriptionInfo> {
        let inner = self.inner.read().await;
        inner
            .subscription
            .as_ref()
            .filter(|e| e.is_valid(self.ttl))
            .map(|e| e.data.clone())
    }

    /// Stores the subscription context.
    pub async fn set_subscription(&self, info: SubscriptionInfo) {
        let mut inner = self.inner.write().await;
        inner.subscription = Some(CacheEntry::new(info));
    }

    // ========================================================================
    // Currency
    // ========================================================================

    /// Gets the cached billing currency, if still valid.
    pub async fn currency(&self) -> Option<String> {
        let inner = self.inner.read().await;
        inner
            .currency
            .as_ref()
            .filter(|e| e.is_valid(self.ttl))
            .map(|e| e.data.clone())
    }

    /// Stores the resolved billing currency.
    pub async fn set_currency(&self, currency: impl Into<String>) {
        let mut inner = self.inner.write().await;
        inner.currency = Some(CacheEntry::new(currency.into()));
    }

    // ========================================================================
    // Costs
    // ========================================================================

    /// Gets a cached cost summary by range key (`"<start>_<end>"`).
    ///
    /// Each lookup also sweeps expired cost entries so that a long session
    /// querying many distinct ranges does not grow without bound.
    pub async fn costs(&self, key: &str) -> Option<CostSummary> {
        let mut inner = self.inner.write().await;

        if self.sweep_costs {
            let before = inner.costs.len();
            inner.costs.retain(|_, e| e.is_valid(self.ttl));
            let swept = before - inner.costs.len();
            if swept > 0 {
                debug!(swept, "Swept expired cost entries");
            }
        }

        inner
            .costs
            .get(key)
            .filter(|e| e.is_valid(self.ttl))
            .map(|e| e.data.clone())
    }

    /// Stores a cost summary under its range key.
    pub async fn set_costs(&self, key: impl Into<String>, summary: CostSummary) {
        let mut inner = self.inner.write().await;
        inner.costs.insert(key.into(), CacheEntry::new(summary));
    }

    // ========================================================================
    // Listings
    // ========================================================================

    /// Gets a cached listing, if still valid.
    pub async fn listing(&self, scope: ListingScope) -> Option<Vec<Resource>> {
        let inner = self.inner.read().await;
        inner
            .listings
            .get(&scope)
            .filter(|e| e.is_valid(self.ttl))
            .map(|e| e.data.clone())
    }

    /// Stores a listing.
    pub async fn set_listing(&self, scope: ListingScope, items: Vec<Resource>) {
        let mut inner = self.inner.write().await;
        inner.listings.insert(scope, CacheEntry::new(items));
    }

    // ========================================================================
    // Clear
    // ========================================================================

    /// Empties every scope; the next request on any key is a hard miss.
    pub async fn clear(&self) {
        let mut inner = self.inner.write().await;
        *inner = CacheInner::default();
        debug!("Cache cleared");
    }
}

impl Default for AzureCache {
    fn default() -> Self {
        Self::new(DEFAULT_TTL)
    }
}

#[cfg(test)]
impl AzureCache {
    async fn cost_entry_count(&self) -> usize {
        self.inner.read().await.costs.len()
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use azlens_core::DateRange;

    fn sample_summary() -> CostSummary {
        CostSummary::empty("USD", DateRange::new("2024-01-01", "2024-01-31").unwrap())
    }

    fn sample_subscription() -> SubscriptionInfo {
        SubscriptionInfo {
            id: "sub-1".to_string(),
            name: "Dev".to_string(),
            tenant_id: None,
            user_email: None,
        }
    }

    #[tokio::test]
    async fn test_hit_within_ttl() {
        let cache = AzureCache::new(Duration::from_secs(300));

        cache.set_currency("EUR").await;
        assert_eq!(cache.currency().await.as_deref(), Some("EUR"));

        cache.set_subscription(sample_subscription()).await;
        assert_eq!(cache.subscription().await.unwrap().id, "sub-1");
    }

    #[tokio::test]
    async fn test_zero_ttl_is_always_a_miss() {
        // age >= ttl invalidates; with ttl 0 even a fresh entry is stale.
        let cache = AzureCache::new(Duration::ZERO);

        cache.set_currency("EUR").await;
        assert_eq!(cache.currency().await, None);
    }

    #[tokio::test]
    async fn test_expiry() {
        let cache = AzureCache::new(Duration::from_millis(30));

        cache.set_costs("2024-01-01_2024-01-31", sample_summary()).await;
        assert!(cache.costs("2024-01-01_2024-01-31").await.is_some());

        tokio::time::sleep(Duration::from_millis(50)).await;
        assert!(cache.costs("2024-01-01_2024-01-31").await.is_none());
    }

    #[tokio::test]
    async fn test_distinct_ranges_never_collide() {
        let cache = AzureCache::default();

        cache.set_costs("2024-01-01_2024-01-31", sample_summary()).await;
        assert!(cache.costs("2024-01-01_2024-02-01").await.is_none());
        assert!(cache.costs("2024-01-01_2024-01-31").await.is_some());
    }

    #[tokio::test]
    async fn test_sweep_drops_expired_cost_entries() {
        let cache = AzureCache::new(Duration::from_millis(30));

        cache.set_costs("a_b", sample_summary()).await;
        cache.set_costs("c_d", sample_summary()).await;
        assert_eq!(cache.cost_entry_count().await, 2);

        tokio::time::sleep(Duration::from_millis(50)).await;

        // Any cost lookup sweeps the whole scope.
        assert!(cache.costs("e_f").await.is_none());
        assert_eq!(cache.cost_entry_count().await, 0);
    }

    #[tokio::test]
    async fn test_clear_makes_every_scope_miss() {
        let cache = AzureCache::default();

        cache.set_subscription(sample_subscription()).await;
        cache.set_currency("GBP").await;
        cache.set_costs("2024-01-01_2024-01-31", sample_summary()).await;
        cache.set_listing(ListingScope::Resources, Vec::new()).await;

        cache.clear().await;

        assert!(cache.subscription().await.is_none());
        assert!(cache.currency().await.is_none());
        assert!(cache.costs("2024-01-01_2024-01-31").await.is_none());
        assert!(cache.listing(ListingScope::Resources).await.is_none());
    }

    #[tokio::test]
    async fn test_listing_scopes_are_independent() {
        let cache = AzureCache::default();

        cache
            .set_listing(ListingScope::Directory(ObjectCategory::Users), Vec::new())
            .await;

        assert!(cache.listing(ListingScope::Resources).await.is_none());
        assert!(
            cache
                .listing(ListingScope::Directory(ObjectCategory::Users))
                .await
                .is_some()
        );
    }
}
