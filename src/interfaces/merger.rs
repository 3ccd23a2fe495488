use std::collections::HashSet;
use std::future::Future;
use std::pin::pin;
use std::time::Duration;

use futures::stream::{self, StreamExt};
use log::{debug, info, warn};
use reqwest::Client;

use crate::utils::base64::{base64_encode, decode_or_plain};
use crate::utils::http::{build_client, web_get_async, FetchError, ProxyConfig};
use crate::utils::string::split_lines;

/// Retrieves the raw body of one subscription source
pub trait SourceFetcher {
    fn fetch(&self, url: &str) -> impl Future<Output = Result<String, FetchError>>;
}

/// Plain HTTP GET fetcher
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    pub fn new(proxy_config: &ProxyConfig, timeout: Duration) -> Result<Self, FetchError> {
        Ok(Self {
            client: build_client(proxy_config, timeout)?,
        })
    }
}

impl SourceFetcher for HttpFetcher {
    async fn fetch(&self, url: &str) -> Result<String, FetchError> {
        web_get_async(&self.client, url).await
    }
}

/// Bounds on the per-request fan-out
#[derive(Debug, Clone, Copy)]
pub struct MergeLimits {
    /// Sources fetched at the same time
    pub max_concurrent: usize,
    /// Budget for a single source
    pub fetch_timeout: Duration,
    /// Budget for the whole merge; sources still pending then are dropped
    pub deadline: Duration,
}

impl Default for MergeLimits {
    fn default() -> Self {
        Self {
            max_concurrent: 8,
            fetch_timeout: Duration::from_secs(10),
            deadline: Duration::from_secs(30),
        }
    }
}

/// Result of one merge, with the visibility the bare content lacks
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergeReport {
    /// Base64 of the newline-joined unique links
    pub content: String,
    pub node_count: usize,
    pub source_count: usize,
    /// Sources that failed, timed out, or missed the deadline
    pub failed_sources: usize,
}

/// Merges the seed links with every subscription source
#[derive(Debug, Clone)]
pub struct NodeMerger<F = HttpFetcher> {
    main_data: String,
    fetcher: F,
    limits: MergeLimits,
}

impl<F: SourceFetcher> NodeMerger<F> {
    pub fn new(main_data: impl Into<String>, fetcher: F, limits: MergeLimits) -> Self {
        Self {
            main_data: main_data.into(),
            fetcher,
            limits,
        }
    }

    /// Merge all nodes and return the Base64 content
    ///
    /// Source failures are absorbed, so this always yields a result; an empty
    /// list is a valid one.
    pub async fn merge_nodes(&self, source_urls: &[String]) -> String {
        self.merge(source_urls).await.content
    }

    /// Merge all nodes: seed links first, then source links in the order the
    /// sources complete, deduplicated by first occurrence.
    pub async fn merge(&self, source_urls: &[String]) -> MergeReport {
        let mut nodes = split_lines(&self.main_data);
        let failed_sources = self.collect_sources(source_urls, &mut nodes).await;

        let unique = remove_duplicates(nodes);
        let node_count = unique.len();
        let content = base64_encode(&unique.join("\n"));

        info!(
            "Merged {} unique nodes from {} sources ({} failed)",
            node_count,
            source_urls.len(),
            failed_sources
        );

        MergeReport {
            content,
            node_count,
            source_count: source_urls.len(),
            failed_sources,
        }
    }

    /// Fetch every source and append its links in completion order
    ///
    /// Returns the number of sources that contributed nothing because of a
    /// failure.
    async fn collect_sources(&self, source_urls: &[String], nodes: &mut Vec<String>) -> usize {
        if source_urls.is_empty() {
            return 0;
        }

        let deadline = tokio::time::Instant::now() + self.limits.deadline;
        let mut results = pin!(stream::iter(source_urls)
            .map(|url| async move { (url, self.fetch_source(url).await) })
            .buffer_unordered(self.limits.max_concurrent.max(1)));

        let mut finished = 0;
        let mut failed = 0;
        loop {
            match tokio::time::timeout_at(deadline, results.next()).await {
                Ok(Some((url, Ok(content)))) => {
                    finished += 1;
                    let lines = parse_content(&content);
                    debug!("Source {} contributed {} lines", url, lines.len());
                    nodes.extend(lines);
                }
                Ok(Some((url, Err(e)))) => {
                    finished += 1;
                    failed += 1;
                    warn!("Skipping subscription source {}: {}", url, e);
                }
                Ok(None) => break,
                Err(_) => {
                    let pending = source_urls.len() - finished;
                    warn!(
                        "Merge deadline of {:?} reached, dropping {} pending sources",
                        self.limits.deadline, pending
                    );
                    failed += pending;
                    break;
                }
            }
        }

        failed
    }

    async fn fetch_source(&self, url: &str) -> Result<String, FetchError> {
        let timeout = self.limits.fetch_timeout;
        tokio::time::timeout(timeout, self.fetcher.fetch(url))
            .await
            .unwrap_or(Err(FetchError::Timeout(timeout)))
    }
}

/// Parse a subscription body into trimmed, non-empty lines, decoding it
/// first when it is a single Base64 blob.
pub fn parse_content(content: &str) -> Vec<String> {
    split_lines(&decode_or_plain(content))
}

/// Remove duplicate links, keeping the first occurrence of each
pub fn remove_duplicates(nodes: Vec<String>) -> Vec<String> {
    let mut seen = HashSet::with_capacity(nodes.len());
    nodes
        .into_iter()
        .filter(|node| seen.insert(node.clone()))
        .collect()
}
