//! Top contributors by location
//!
//! # Overview
//!
//! Given a location (`location`) and a result count tier (`count`, one of 50, 100 or 150), library fetches the users
//! of that location with the most repositories, as ranked by the upstream user search.
//! The upstream search serves at most 100 users per page, so the 150 tier is answered with two sequential requests:
//! the first 100 users (page 1 of size 100) followed by users 101..150 (page 3 of size 50).
//! A short first page means upstream has no more results and no second request is made.
//!
//! The upstream search itself is abstracted by [`api::Client`], so the pagination can run against any transport.

pub mod api;
#[cfg(feature = "aggregator")]
pub mod aggregator;

#[cfg(feature = "aggregator")]
pub use aggregator::TopContributors;
