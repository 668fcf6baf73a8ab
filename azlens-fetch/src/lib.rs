// Lint configuration for this crate
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

//! # `azlens` Fetch
//!
//! Host capabilities for the azlens engine:
//!
//! - [`CommandExecutor`] - the asynchronous subprocess seam every external
//!   query goes through, with the production [`AzCliRunner`] implementation
//! - [`RateLimiter`] - the sliding fixed-window gate callers hold before
//!   dispatching a gated command
//!
//! All operations are asynchronous and non-blocking; every executor call
//! and every limiter-induced delay is a suspension point.

pub mod error;
pub mod executor;
pub mod limiter;

pub use error::ProcessError;
pub use executor::{AzCliRunner, CommandExecutor, ProcessOutput, DEFAULT_TIMEOUT};
pub use limiter::{RateLimitConfig, RateLimiter};
