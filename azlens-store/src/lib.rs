// Lint configuration for this crate
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

//! # `azlens` Store
//!
//! Process-wide state for the azlens engine:
//!
//! - [`AzureCache`] - the scoped time-to-live cache for subscription
//!   context, billing currency, cost summaries, and listings
//! - [`Config`] - file-backed configuration with serde defaults
//!
//! Both are constructed once by the host application's composition root
//! and injected into the components that use them; nothing in this crate
//! is an ambient global.

pub mod cache;
pub mod config;
pub mod error;

pub use cache::{AzureCache, ListingScope};
pub use config::{CacheConfig, Config, GeneralConfig, RateLimitSettings};
pub use error::StoreError;
