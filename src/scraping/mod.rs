// src/scraping/mod.rs
//! Multi-source job listing aggregation: query generation, resilient
//! fetching, selector-chain extraction and cross-source deduplication.

use serde::{Deserialize, Serialize};

pub mod aggregator;
pub mod fetcher;
pub mod listing_extractor;
pub mod request;
pub mod sources;

pub use aggregator::Aggregator;
pub use fetcher::SourceFetcher;
pub use request::{FetchedPage, HttpPageFetcher, PageFetcher, RetryPolicy};
pub use sources::SourceSpec;

/// External listing provider, in fixed aggregation priority order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum JobSource {
    Internshala,
    Naukri,
    Indeed,
}

impl JobSource {
    /// Priority order used for deduplication and truncation.
    pub const ALL: [JobSource; 3] = [JobSource::Internshala, JobSource::Naukri, JobSource::Indeed];

    pub fn display_name(&self) -> &'static str {
        match self {
            JobSource::Internshala => "Internshala",
            JobSource::Naukri => "Naukri",
            JobSource::Indeed => "Indeed",
        }
    }

    pub fn base_origin(&self) -> &'static str {
        match self {
            JobSource::Internshala => "https://internshala.com",
            JobSource::Naukri => "https://www.naukri.com",
            JobSource::Indeed => "https://in.indeed.com",
        }
    }

    /// Company shown when the markup yields nothing usable.
    pub fn placeholder_company(&self) -> String {
        format!("{} Partner Company", self.display_name())
    }
}

/// A single normalized job or internship listing. Title is guaranteed
/// non-empty; company and link always carry a value thanks to
/// source-specific fallbacks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobPosting {
    pub title: String,
    pub company: String,
    pub link: String,
    pub source: JobSource,
    pub query_used: String,
}
