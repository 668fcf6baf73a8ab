//! Domain models for azlens.
//!
//! This module contains the data structures flowing between the fetch,
//! aggregation, and presentation layers.
//!
//! ## Submodules
//!
//! - [`resource`] - The uniform resource/directory-object entity
//! - [`cost`] - Cost aggregation outputs and trend analysis
//! - [`date_range`] - `YYYY-MM-DD` query windows
//! - [`subscription`] - Subscription context from `az account show`

mod cost;
mod date_range;
mod resource;
mod subscription;

// Re-export everything at the models level
pub use cost::{CostSummary, CostTrend, DailyCost, ResourceCostDetail, ServiceCost, TrendReport};
pub use date_range::DateRange;
pub use resource::{AZURE_AD_LOCATION, ObjectCategory, Resource, UNKNOWN};
pub use subscription::SubscriptionInfo;
