//! # kate-semantha
//!
//! semantha platform API client for K-A-T-E One.
//!
//! The [`SemanthaApi`] trait is the seam between the dashboard and the
//! document-analysis service: [`SemanthaClient`] is the HTTP implementation,
//! [`CachedSemantha`] wraps any implementation with per-operation
//! memoization, and [`MockSemantha`] backs the tests.

pub mod cache;
pub mod client;
pub mod config;
pub mod http;
pub mod mock;

pub use cache::CachedSemantha;
pub use client::{truncate_at_stop_tokens, SemanthaApi};
pub use config::SemanthaConfig;
pub use http::SemanthaClient;
pub use mock::MockSemantha;
