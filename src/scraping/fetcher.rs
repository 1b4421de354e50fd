// src/scraping/fetcher.rs
//! Per-source fetch loop: queries to candidate URLs to parsed postings,
//! under the shared retry policy.

use super::listing_extractor::extract_postings;
use super::request::{request_with_retry, PageFetcher, RetryPolicy};
use super::sources::SourceSpec;
use super::JobPosting;
use std::sync::Arc;
use tokio::sync::mpsc::UnboundedSender;
use tracing::{debug, info};

pub struct SourceFetcher {
    transport: Arc<dyn PageFetcher>,
    policy: RetryPolicy,
}

impl SourceFetcher {
    pub fn new(transport: Arc<dyn PageFetcher>, policy: RetryPolicy) -> Self {
        Self { transport, policy }
    }

    /// Collect up to `limit` postings for one source, streaming each
    /// accepted batch into `sink` as soon as it is parsed so a caller
    /// that gives up mid-run still keeps everything gathered before
    /// that point. URL templates for a query are tried until one
    /// yields at least one posting; queries are tried until the limit
    /// is reached. Individual fetch failures only move the loop along.
    pub async fn fetch_candidates(
        &self,
        spec: &'static SourceSpec,
        top_skills: &[String],
        limit: usize,
        sink: &UnboundedSender<JobPosting>,
    ) {
        if top_skills.is_empty() {
            return;
        }

        let queries = spec.build_queries(top_skills);
        info!(
            "Searching {} with {} queries",
            spec.source.display_name(),
            queries.len()
        );

        let mut gathered = 0usize;

        for (position, query) in queries.iter().enumerate() {
            for url in spec.candidate_urls(query) {
                debug!("Trying {} for '{}'", url, query);

                let Some(page) = request_with_retry(self.transport.as_ref(), &self.policy, &url).await
                else {
                    continue;
                };

                let found = extract_postings(spec, &page.body, query, limit - gathered);

                if !found.is_empty() {
                    debug!(
                        "Accepted {} postings from {} for '{}'",
                        found.len(),
                        url,
                        query
                    );
                    gathered += found.len();
                    for posting in found {
                        // A closed sink means the caller stopped listening.
                        if sink.send(posting).is_err() {
                            return;
                        }
                    }
                    break;
                }
            }

            if gathered >= limit || position + 1 == queries.len() {
                break;
            }

            // Courtesy pause between queries.
            tokio::time::sleep(self.policy.courtesy_pause()).await;
        }

        info!(
            "{}: collected {} postings",
            spec.source.display_name(),
            gathered
        );
    }
}
