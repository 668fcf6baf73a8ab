// Lint configuration for this crate
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

//! # `azlens` Query
//!
//! The domain engine: everything between the `az` subprocess and the
//! presentation layer.
//!
//! - [`azcli`] - argument tables for every az invocation the engine makes
//! - [`normalize`] - raw listing JSON into the uniform [`azlens_core::Resource`]
//! - [`costquery`] - Cost Management query bodies
//! - [`aggregate`] - cost responses into [`azlens_core::CostSummary`]
//! - [`currency`] - billing currency resolution
//! - [`refresh`] - the fan-out/fan-in refresh cycle
//! - [`client`] - the [`AzureClient`] facade consumed by presentation code

pub mod aggregate;
pub mod azcli;
pub mod client;
pub mod costquery;
pub mod currency;
pub mod error;
pub mod normalize;
pub mod refresh;

pub use client::{AzureClient, AzureClientBuilder};
pub use error::QueryError;
pub use refresh::{RefreshCoordinator, RefreshReport};
