//! The refresh cycle.
//!
//! One refresh fans out the cloud resource listing and, when directory
//! objects are enabled, a permission probe followed by four parallel
//! category fetches. The branches race internally but the cycle reports
//! exactly once, after every branch has terminated. A branch failure
//! becomes a warning; only a failed primary resource listing is fatal,
//! and even then previously cached listings stay in place.
//!
//! Only one cycle may be in flight: a refresh request while loading is
//! rejected, not queued.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use azlens_core::ObjectCategory;
use azlens_fetch::{CommandExecutor, RateLimiter};
use azlens_store::{AzureCache, ListingScope};
use tracing::{debug, info, warn};

use crate::azcli;
use crate::error::QueryError;
use crate::normalize;

// ============================================================================
// Refresh Report
// ============================================================================

/// The single completion notification of one refresh cycle.
#[derive(Debug, Clone, Default, serde::Serialize)]
pub struct RefreshReport {
    /// Cloud resources fetched.
    pub resource_count: usize,
    /// Directory objects fetched across all categories.
    pub ad_count: usize,
    /// Non-fatal branch failures.
    pub warnings: Vec<String>,
    /// Fatal failure of the primary resource listing, if any.
    pub error: Option<String>,
}

impl RefreshReport {
    /// Returns true if the primary listing succeeded.
    pub fn is_success(&self) -> bool {
        self.error.is_none()
    }
}

// ============================================================================
// Refresh Coordinator
// ============================================================================

/// Coordinates one refresh cycle at a time.
pub struct RefreshCoordinator {
    executor: Arc<dyn CommandExecutor>,
    limiter: Arc<RateLimiter>,
    cache: Arc<AzureCache>,
    timeout: Duration,
    include_directory_objects: bool,
    loading: AtomicBool,
}

/// Resets the loading flag when the cycle ends, on every exit path.
struct LoadingGuard<'a>(&'a AtomicBool);

impl Drop for LoadingGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

impl RefreshCoordinator {
    /// Creates a coordinator over the given host capabilities.
    pub fn new(
        executor: Arc<dyn CommandExecutor>,
        limiter: Arc<RateLimiter>,
        cache: Arc<AzureCache>,
        timeout: Duration,
        include_directory_objects: bool,
    ) -> Self {
        Self {
            executor,
            limiter,
            cache,
            timeout,
            include_directory_objects,
            loading: AtomicBool::new(false),
        }
    }

    /// Returns true while a cycle is in flight.
    pub fn is_loading(&self) -> bool {
        self.loading.load(Ordering::SeqCst)
    }

    /// Runs one refresh cycle.
    ///
    /// Returns [`QueryError::RefreshInProgress`] when a cycle is already
    /// in flight; callers treat that as a no-op.
    pub async fn refresh(&self) -> Result<RefreshReport, QueryError> {
        if self.loading.swap(true, Ordering::SeqCst) {
            debug!("Refresh requested while loading, ignoring");
            return Err(QueryError::RefreshInProgress);
        }
        let _guard = LoadingGuard(&self.loading);

        info!(
            directory_objects = self.include_directory_objects,
            "Starting refresh cycle"
        );

        let report = if self.include_directory_objects {
            let (resources, (ad_count, warnings)) =
                tokio::join!(self.fetch_resources(), self.fetch_directory());
            assemble(resources, ad_count, warnings)
        } else {
            let resources = self.fetch_resources().await;
            assemble(resources, 0, Vec::new())
        };

        info!(
            resources = report.resource_count,
            directory_objects = report.ad_count,
            warnings = report.warnings.len(),
            success = report.is_success(),
            "Refresh cycle complete"
        );
        Ok(report)
    }

    // ========================================================================
    // Branches
    // ========================================================================

    async fn fetch_resources(&self) -> Result<usize, QueryError> {
        let raw = self.run(azcli::resource_list()).await?;
        let resources = normalize::parse_resources(&raw)?;
        let count = resources.len();

        self.cache.set_listing(ListingScope::Resources, resources).await;
        debug!(count, "Resource listing updated");
        Ok(count)
    }

    /// Probes directory access, then fetches the four categories in
    /// parallel. Never fails; every problem becomes a warning.
    async fn fetch_directory(&self) -> (usize, Vec<String>) {
        if let Err(e) = self.probe_directory_access().await {
            warn!(error = %e, "Directory access probe failed");
            return (0, vec![format!("Directory objects unavailable: {e}")]);
        }

        let (apps, users, groups, roles) = tokio::join!(
            self.fetch_category(ObjectCategory::Applications),
            self.fetch_category(ObjectCategory::Users),
            self.fetch_category(ObjectCategory::Groups),
            self.fetch_category(ObjectCategory::RoleAssignments),
        );

        let mut count = 0;
        let mut warnings = Vec::new();
        for (category, outcome) in ObjectCategory::ALL.into_iter().zip([apps, users, groups, roles])
        {
            match outcome {
                Ok(n) => count += n,
                Err(e) => {
                    warn!(category = %category, error = %e, "Category fetch failed");
                    warnings.push(format!("Failed to fetch {category}: {e}"));
                }
            }
        }

        (count, warnings)
    }

    async fn fetch_category(&self, category: ObjectCategory) -> Result<usize, QueryError> {
        let raw = self.run(azcli::directory_list(category)).await?;
        let objects = normalize::parse_directory_objects(category, &raw)?;
        let count = objects.len();

        self.cache
            .set_listing(ListingScope::Directory(category), objects)
            .await;
        debug!(category = %category, count, "Directory listing updated");
        Ok(count)
    }

    /// A failed probe means the signed-in principal cannot read the
    /// directory; auth failures keep their own kind.
    async fn probe_directory_access(&self) -> Result<(), QueryError> {
        match self.run(azcli::directory_probe()).await {
            Ok(_) => Ok(()),
            Err(e @ QueryError::Auth(_)) => Err(e),
            Err(QueryError::Execution(msg) | QueryError::Permission(msg)) => {
                Err(QueryError::Permission(msg))
            }
            Err(other) => Err(other),
        }
    }

    async fn run(&self, args: Vec<String>) -> Result<String, QueryError> {
        azcli::run_gated(self.executor.as_ref(), &self.limiter, args, self.timeout).await
    }
}

fn assemble(
    resources: Result<usize, QueryError>,
    ad_count: usize,
    warnings: Vec<String>,
) -> RefreshReport {
    match resources {
        Ok(resource_count) => RefreshReport {
            resource_count,
            ad_count,
            warnings,
            error: None,
        },
        Err(e) => RefreshReport {
            resource_count: 0,
            ad_count,
            warnings,
            error: Some(e.to_string()),
        },
    }
}
