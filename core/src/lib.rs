//! Citizen-services analytics: complaint aggregation plus the water and
//! energy reference dashboards that sit beside it.

pub mod advisory;
pub mod aggregator;
pub mod buckets;
pub mod clock;
pub mod complaint;
pub mod config;
pub mod consumption;
pub mod error;
pub mod report;
pub mod request;
pub mod resource;
pub mod rng;
pub mod role;
pub mod section;
pub mod types;
pub mod util;
