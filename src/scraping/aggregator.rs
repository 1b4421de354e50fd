// src/scraping/aggregator.rs
//! Fans fetches out across all sources, then combines, deduplicates and
//! bounds the results in fixed source-priority order.

use super::fetcher::SourceFetcher;
use super::request::{PageFetcher, RetryPolicy};
use super::sources::SourceSpec;
use super::{JobPosting, JobSource};
use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, Semaphore};
use tokio::task::JoinSet;
use tracing::{debug, info, warn};

const DEFAULT_LIMIT_PER_SOURCE: usize = 6;
const DEFAULT_MAX_RESULTS: usize = 15;
const DEFAULT_MAX_CONCURRENT_SOURCES: usize = 3;

pub struct Aggregator {
    transport: Arc<dyn PageFetcher>,
    policy: RetryPolicy,
    limit_per_source: usize,
    max_results: usize,
    max_concurrent_sources: usize,
    deadline: Option<Duration>,
}

impl Aggregator {
    pub fn new(transport: Arc<dyn PageFetcher>) -> Self {
        Self {
            transport,
            policy: RetryPolicy::default(),
            limit_per_source: DEFAULT_LIMIT_PER_SOURCE,
            max_results: DEFAULT_MAX_RESULTS,
            max_concurrent_sources: DEFAULT_MAX_CONCURRENT_SOURCES,
            deadline: None,
        }
    }

    pub fn with_policy(mut self, policy: RetryPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn with_limits(mut self, per_source: usize, max_results: usize) -> Self {
        self.limit_per_source = per_source;
        self.max_results = max_results;
        self
    }

    /// Overall time budget. When it expires, outstanding fetches are
    /// aborted and whatever was gathered is returned as a normal
    /// partial result.
    pub fn with_deadline(mut self, deadline: Duration) -> Self {
        self.deadline = Some(deadline);
        self
    }

    /// Fetch from every source concurrently (bounded by a small pool)
    /// and return at most `max_results` unique postings. Duplicates and
    /// truncation are resolved in fixed source-priority order, not
    /// fetch-completion order. A failing source is logged and skipped.
    pub async fn aggregate(&self, top_skills: &[String]) -> Vec<JobPosting> {
        if top_skills.is_empty() {
            return Vec::new();
        }

        info!("Aggregating listings for top skills: {:?}", top_skills);

        let pool = Arc::new(Semaphore::new(self.max_concurrent_sources));
        let mut tasks: JoinSet<JobSource> = JoinSet::new();
        // One sink per source: partial batches survive an aborted task
        // and still combine in priority order.
        let mut sinks: Vec<mpsc::UnboundedReceiver<JobPosting>> =
            Vec::with_capacity(JobSource::ALL.len());

        for source in JobSource::ALL {
            let (tx, rx) = mpsc::unbounded_channel();
            sinks.push(rx);

            let transport = self.transport.clone();
            let policy = self.policy.clone();
            let skills = top_skills.to_vec();
            let limit = self.limit_per_source;
            let pool = pool.clone();

            tasks.spawn(async move {
                let Ok(_permit) = pool.acquire_owned().await else {
                    return source;
                };
                let fetcher = SourceFetcher::new(transport, policy.clone());
                let spec = SourceSpec::for_source(source);
                fetcher.fetch_candidates(spec, &skills, limit, &tx).await;
                drop(tx);
                // Courtesy pause before releasing the pool slot to the
                // next source.
                tokio::time::sleep(policy.courtesy_pause()).await;
                source
            });
        }

        match self.deadline {
            Some(budget) => {
                let drained = tokio::time::timeout(budget, drain(&mut tasks)).await;
                if drained.is_err() {
                    warn!(
                        "Aggregation deadline of {:.1}s reached, returning partial results",
                        budget.as_secs_f64()
                    );
                    tasks.abort_all();
                    // Wait the aborted tasks out so every sender is gone
                    // before the sinks are read.
                    while tasks.join_next().await.is_some() {}
                }
            }
            None => drain(&mut tasks).await,
        }

        let mut combined: Vec<JobPosting> = Vec::new();
        for mut sink in sinks {
            while let Ok(posting) = sink.try_recv() {
                combined.push(posting);
            }
        }

        let total = combined.len();
        let mut unique = dedup_postings(combined);
        unique.truncate(self.max_results);

        info!(
            "Aggregated {} unique postings ({} before dedup)",
            unique.len(),
            total
        );
        unique
    }
}

async fn drain(tasks: &mut JoinSet<JobSource>) {
    while let Some(joined) = tasks.join_next().await {
        match joined {
            Ok(source) => debug!("{} finished", source.display_name()),
            // One failed source must not abort the aggregation.
            Err(e) => warn!("Source fetch task failed: {}", e),
        }
    }
}

/// Drop later duplicates of the same (title, company) pair, compared
/// lowercased and trimmed. First occurrence wins; input order is
/// otherwise preserved.
pub fn dedup_postings(postings: Vec<JobPosting>) -> Vec<JobPosting> {
    let mut seen: HashSet<(String, String)> = HashSet::new();
    let mut unique = Vec::new();

    for posting in postings {
        let key = (
            posting.title.trim().to_lowercase(),
            posting.company.trim().to_lowercase(),
        );
        if seen.insert(key) {
            unique.push(posting);
        }
    }

    unique
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::MatcherError;
    use crate::scraping::request::testing::StaticPageFetcher;
    use crate::scraping::request::FetchedPage;
    use async_trait::async_trait;

    fn skills(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    fn posting(title: &str, company: &str, source: JobSource) -> JobPosting {
        JobPosting {
            title: title.to_string(),
            company: company.to_string(),
            link: "https://example.com".to_string(),
            source,
            query_used: "python".to_string(),
        }
    }

    fn internshala_markup(entries: &[(&str, &str)]) -> String {
        let mut markup = String::from("<html><body>");
        for (title, company) in entries {
            markup.push_str(&format!(
                r#"<div class="individual_internship">
                     <h3><a href="/internship/detail/x">{}</a></h3>
                     <p class="company_name">{}</p>
                   </div>"#,
                title, company
            ));
        }
        markup.push_str("</body></html>");
        markup
    }

    fn naukri_markup(entries: &[(&str, &str)]) -> String {
        let mut markup = String::from("<html><body>");
        for (title, company) in entries {
            markup.push_str(&format!(
                r#"<article class="jobTuple">
                     <a class="title" href="/job-listings-x">{}</a>
                     <a class="subTitle">{}</a>
                   </article>"#,
                title, company
            ));
        }
        markup.push_str("</body></html>");
        markup
    }

    /// Transport that never resolves, for deadline tests.
    struct HangingFetcher;

    #[async_trait]
    impl PageFetcher for HangingFetcher {
        async fn fetch(
            &self,
            _url: &str,
            _headers: &[(String, String)],
            _timeout: Duration,
        ) -> Result<FetchedPage, MatcherError> {
            std::future::pending().await
        }
    }

    #[test]
    fn test_dedup_collapses_cross_source_duplicates() {
        let postings = vec![
            posting("Backend Engineer", "Acme Corp", JobSource::Internshala),
            posting("Frontend Engineer", "Acme Corp", JobSource::Internshala),
            posting("  backend engineer ", "ACME CORP", JobSource::Naukri),
        ];
        let unique = dedup_postings(postings);
        assert_eq!(unique.len(), 2);
        assert_eq!(unique[0].source, JobSource::Internshala);
        assert_eq!(unique[0].title, "Backend Engineer");
    }

    #[test]
    fn test_dedup_is_idempotent() {
        let postings = vec![
            posting("Backend Engineer", "Acme Corp", JobSource::Internshala),
            posting("Backend Engineer", "Acme Corp", JobSource::Indeed),
            posting("Data Analyst", "Globex", JobSource::Naukri),
        ];
        let once = dedup_postings(postings);
        let twice = dedup_postings(once.clone());
        assert_eq!(once, twice);
    }

    #[tokio::test]
    async fn test_failing_sources_do_not_abort_aggregation() {
        // Only Internshala serves markup; Naukri and Indeed 404 on
        // every URL but the aggregation still returns its postings.
        let transport = Arc::new(StaticPageFetcher::new(vec![(
            "internshala.com",
            internshala_markup(&[("Python Developer Intern", "Acme Corp")]),
        )]));
        let aggregator = Aggregator::new(transport).with_policy(RetryPolicy::immediate());

        let postings = aggregator.aggregate(&skills(&["Python"])).await;
        assert_eq!(postings.len(), 1);
        assert_eq!(postings[0].source, JobSource::Internshala);
    }

    #[tokio::test]
    async fn test_priority_order_and_cross_source_dedup() {
        let transport = Arc::new(StaticPageFetcher::new(vec![
            (
                "internshala.com",
                internshala_markup(&[("Backend Engineer", "Acme Corp")]),
            ),
            (
                "naukri.com",
                naukri_markup(&[
                    ("Backend Engineer", "Acme Corp"),
                    ("Platform Engineer", "Globex"),
                ]),
            ),
        ]));
        let aggregator = Aggregator::new(transport).with_policy(RetryPolicy::immediate());

        let postings = aggregator.aggregate(&skills(&["Python"])).await;
        // The duplicate collapses to the higher-priority source and
        // Internshala results come first regardless of completion order.
        assert_eq!(postings.len(), 2);
        assert_eq!(postings[0].source, JobSource::Internshala);
        assert_eq!(postings[0].title, "Backend Engineer");
        assert_eq!(postings[1].title, "Platform Engineer");
    }

    #[tokio::test]
    async fn test_result_is_bounded() {
        let many: Vec<(String, String)> = (0..8)
            .map(|i| (format!("Engineer Number {}", i), format!("Company {}", i)))
            .collect();
        let many_refs: Vec<(&str, &str)> =
            many.iter().map(|(t, c)| (t.as_str(), c.as_str())).collect();

        let transport = Arc::new(StaticPageFetcher::new(vec![
            ("internshala.com", internshala_markup(&many_refs)),
            ("naukri.com", naukri_markup(&many_refs)),
        ]));
        let aggregator = Aggregator::new(transport)
            .with_policy(RetryPolicy::immediate())
            .with_limits(8, 3);

        let postings = aggregator.aggregate(&skills(&["Python"])).await;
        assert_eq!(postings.len(), 3);
        assert!(postings.iter().all(|p| p.source == JobSource::Internshala));
    }

    #[tokio::test]
    async fn test_deadline_returns_partial_result() {
        let aggregator = Aggregator::new(Arc::new(HangingFetcher))
            .with_policy(RetryPolicy::immediate())
            .with_deadline(Duration::from_millis(50));

        let postings = aggregator.aggregate(&skills(&["Python"])).await;
        assert!(postings.is_empty());
    }

    #[tokio::test]
    async fn test_deadline_keeps_postings_gathered_before_it() {
        // Internshala's first query succeeds instantly, then the long
        // pause before its next query outlives the deadline. What the
        // source already produced must still come back.
        let transport = Arc::new(StaticPageFetcher::new(vec![(
            "internshala.com",
            internshala_markup(&[("Python Developer Intern", "Acme Corp")]),
        )]));
        let policy = RetryPolicy {
            courtesy_delay: (5.0, 5.0),
            ..RetryPolicy::immediate()
        };
        let aggregator = Aggregator::new(transport)
            .with_policy(policy)
            .with_deadline(Duration::from_millis(300));

        let postings = aggregator.aggregate(&skills(&["Python"])).await;
        assert_eq!(postings.len(), 1);
        assert_eq!(postings[0].title, "Python Developer Intern");
        assert_eq!(postings[0].source, JobSource::Internshala);
    }

    #[tokio::test]
    async fn test_empty_skills_skip_fetching() {
        let aggregator = Aggregator::new(Arc::new(HangingFetcher));
        assert!(aggregator.aggregate(&[]).await.is_empty());
    }
}
