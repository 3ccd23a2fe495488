//! The two engines behind every subscription request
//!
//! [`NodeMerger`] gathers and deduplicates node links, [`FormatConverter`]
//! shapes the merged list for the requesting client.

pub mod converter;
pub mod merger;

pub use converter::{ConversionBackend, ConvertError, FormatConverter, HttpBackend};
pub use merger::{HttpFetcher, MergeLimits, MergeReport, NodeMerger, SourceFetcher};
