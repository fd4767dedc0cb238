//! FRED (Federal Reserve Economic Data) integration.

pub mod catalog;
pub mod client;

pub use catalog::{SeriesSpec, default_catalog};
pub use client::{FredClient, parse_observations};
