// Lint configuration for this crate
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

//! # `azlens` Core
//!
//! Core types and models for the `azlens` engine.
//!
//! This crate provides the foundational abstractions used across all other
//! `azlens` crates:
//!
//! - The uniform [`Resource`] entity covering both deployed cloud resources
//!   and Azure AD directory objects
//! - Cost aggregation outputs ([`CostSummary`], [`ServiceCost`],
//!   [`DailyCost`]) and trend analysis ([`TrendReport`])
//! - The [`DateRange`] query window
//! - Subscription context ([`SubscriptionInfo`])
//! - Error types

pub mod error;
pub mod models;

// Re-export error types
pub use error::CoreError;

// Re-export all model types
pub use models::{
    // Resource types
    AZURE_AD_LOCATION,
    ObjectCategory,
    Resource,
    UNKNOWN,
    // Cost types
    CostSummary,
    CostTrend,
    DailyCost,
    ResourceCostDetail,
    ServiceCost,
    TrendReport,
    // Query window
    DateRange,
    // Subscription context
    SubscriptionInfo,
};
