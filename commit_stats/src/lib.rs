//! GitHub profile commit statistics
//!
//! # Overview
//!
//! Shapes what the GitHub REST API tells about a user into display-ready data: the profile, the
//! repository list and a day-by-day commit count over the last year.
//!
//! The `api` feature only exposes the data model and the [`api::Client`] trait implemented by HTTP
//! clients. The `aggregator` feature adds the fetchers, which turn API failures into empty results and
//! user notices, the commit aggregator and the whole profile search flow.

pub mod api;
pub mod calendar;

#[cfg(feature = "aggregator")]
mod aggregator;
#[cfg(feature = "aggregator")]
mod fetcher;
#[cfg(feature = "aggregator")]
mod search;

#[cfg(feature = "aggregator")]
pub use aggregator::{select_repositories, CommitAggregator, DEFAULT_TOP_REPOS};
#[cfg(feature = "aggregator")]
pub use fetcher::{Fetched, Fetcher, Notice};
#[cfg(feature = "aggregator")]
pub use search::{ProfileSearch, SearchOutcome};
